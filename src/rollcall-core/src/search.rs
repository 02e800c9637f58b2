use serde::Serialize;

use crate::models::Person;
use crate::validate::SearchParams;

/// One page of matches, borrowed from the record store
#[derive(Debug, Serialize)]
pub struct Page<'a> {
    pub people: Vec<&'a Person>,
    pub has_more: bool,
}

/// Filter, paginate, then sort.
///
/// Records are scanned in store order. The first `offset` matches are skipped and
/// the next `limit` form the page. Once the page is full the scan continues only
/// until it sees one more match, which sets `has_more`. Sorting touches the page,
/// never the rest of the store.
pub fn evaluate<'a>(records: &'a [Person], params: &SearchParams) -> Page<'a> {
    let mut matches = records
        .iter()
        .filter(|person| person.matches(&params.query))
        .skip(params.offset);

    let mut people: Vec<&Person> = matches.by_ref().take(params.limit).collect();
    let has_more = people.len() == params.limit && matches.next().is_some();

    params.order_by.sort(&mut people, params.order_field);

    tracing::trace!(
        returned = people.len(),
        has_more,
        offset = params.offset,
        "Evaluated search"
    );

    Page { people, has_more }
}
