use serde::{Deserialize, Serialize};

/// Path of the read-only search endpoint
pub const USERS_PATH: &str = "/users";

/// Response header carrying the `has_more` flag ("true" / "false")
pub const HAS_MORE_HEADER: &str = "X-Has-More";

/// Person is a single read-only record from the dataset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: u64,
    pub name: String, // "<first_name> <last_name>"
    pub age: u32,
    pub about: String,
    pub gender: String,
}

impl Person {
    /// Literal, case-sensitive substring match against name or biography.
    /// The empty query matches everyone.
    pub fn matches(&self, query: &str) -> bool {
        self.name.contains(query) || self.about.contains(query)
    }
}

/// PersonRow is one row as stored in the dataset file
#[derive(Debug, Clone, Deserialize)]
pub struct PersonRow {
    pub id: u64,
    pub first_name: String,
    pub last_name: String,
    pub age: u32,
    #[serde(default)]
    pub about: String,
    #[serde(default)]
    pub gender: String,
}

impl From<PersonRow> for Person {
    fn from(row: PersonRow) -> Self {
        Self {
            id: row.id,
            name: format!("{} {}", row.first_name, row.last_name),
            age: row.age,
            about: row.about,
            gender: row.gender,
        }
    }
}

/// SearchRequest is the wire-level query, exactly as a caller sends it.
///
/// Nothing here is checked yet; see [`SearchRequest::validate`](crate::validate).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchRequest {
    pub limit: i64,
    pub offset: i64,
    pub query: String,
    pub order_field: String,
    pub order_by: i64,
}

/// SearchResponse is one page of matches as seen by the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub users: Vec<Person>,
    pub has_more: bool,
}
