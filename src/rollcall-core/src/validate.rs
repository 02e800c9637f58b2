use std::cmp::Ordering;
use std::collections::HashMap;
use std::num::IntErrorKind;
use std::str::FromStr;

use thiserror::Error;

use crate::models::{Person, SearchRequest};

/// Largest page a single request may return; bigger limits are clamped
pub const MAX_LIMIT: usize = 25;

/// Reasons a search request is rejected before it reaches the engine.
///
/// The `Display` text is sent back to the caller verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} must be an integer")]
    NotAnInteger(&'static str),

    #[error("limit must be positive")]
    NonPositiveLimit,

    #[error("offset must be non-negative")]
    NegativeOffset,

    #[error("invalid order_by")]
    InvalidOrderBy,

    #[error("invalid order_field")]
    InvalidOrderField,
}

/// Sort key for a page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderField {
    Id,
    Age,
    #[default]
    Name,
}

impl OrderField {
    pub fn compare(self, a: &Person, b: &Person) -> Ordering {
        match self {
            OrderField::Id => a.id.cmp(&b.id),
            OrderField::Age => a.age.cmp(&b.age),
            OrderField::Name => a.name.cmp(&b.name),
        }
    }
}

impl FromStr for OrderField {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Id" => Ok(OrderField::Id),
            "Age" => Ok(OrderField::Age),
            "Name" | "" => Ok(OrderField::Name),
            _ => Err(ValidationError::InvalidOrderField),
        }
    }
}

/// Sort direction for a page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderBy {
    Desc,
    #[default]
    Unordered,
    Asc,
}

impl OrderBy {
    /// Stable sort in either direction; `Unordered` keeps scan order
    pub fn sort(self, page: &mut [&Person], field: OrderField) {
        match self {
            OrderBy::Unordered => {}
            OrderBy::Asc => page.sort_by(|a, b| field.compare(a, b)),
            OrderBy::Desc => page.sort_by(|a, b| field.compare(b, a)),
        }
    }
}

impl TryFrom<i64> for OrderBy {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(OrderBy::Desc),
            0 => Ok(OrderBy::Unordered),
            1 => Ok(OrderBy::Asc),
            _ => Err(ValidationError::InvalidOrderBy),
        }
    }
}

/// SearchParams is a request that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    pub limit: usize, // 1..=MAX_LIMIT
    pub offset: usize,
    pub query: String,
    pub order_field: OrderField,
    pub order_by: OrderBy,
}

impl SearchRequest {
    /// Decode a flat key/value parameter map.
    /// Absent keys take their zero value, so a missing `limit` is rejected.
    ///
    /// Parse failures and the limit/offset rules are checked field by field in
    /// rule order, so a bad `limit` wins over a malformed `offset`.
    pub fn from_params(params: &HashMap<String, String>) -> Result<Self, ValidationError> {
        let limit = int_param(params, "limit")?;
        if limit <= 0 {
            return Err(ValidationError::NonPositiveLimit);
        }
        let offset = int_param(params, "offset")?;
        if offset < 0 {
            return Err(ValidationError::NegativeOffset);
        }
        let order_by = int_param(params, "order_by")?;

        Ok(Self {
            limit,
            offset,
            query: params.get("query").cloned().unwrap_or_default(),
            order_field: params.get("order_field").cloned().unwrap_or_default(),
            order_by,
        })
    }

    /// Check the request and normalize it for the engine.
    ///
    /// Rules run in a fixed order and the first failure wins:
    /// limit, offset, order_by, order_field.
    pub fn validate(&self) -> Result<SearchParams, ValidationError> {
        if self.limit <= 0 {
            return Err(ValidationError::NonPositiveLimit);
        }
        if self.offset < 0 {
            return Err(ValidationError::NegativeOffset);
        }
        let order_by = OrderBy::try_from(self.order_by)?;
        let order_field = self.order_field.parse::<OrderField>()?;

        let limit = usize::try_from(self.limit)
            .unwrap_or(MAX_LIMIT)
            .min(MAX_LIMIT);
        let offset = usize::try_from(self.offset).unwrap_or(usize::MAX);

        Ok(SearchParams {
            limit,
            offset,
            query: self.query.clone(),
            order_field,
            order_by,
        })
    }
}

/// Digit strings outside the `i64` range saturate instead of failing
fn int_param(params: &HashMap<String, String>, name: &'static str) -> Result<i64, ValidationError> {
    match params.get(name).map(|v| v.trim()) {
        None | Some("") => Ok(0),
        Some(value) => value.parse::<i64>().or_else(|e| match e.kind() {
            IntErrorKind::PosOverflow => Ok(i64::MAX),
            IntErrorKind::NegOverflow => Ok(i64::MIN),
            _ => Err(ValidationError::NotAnInteger(name)),
        }),
    }
}
