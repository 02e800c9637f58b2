use std::collections::HashSet;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::models::{Person, PersonRow};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read dataset {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse dataset: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("failed to parse XML dataset: {0}")]
    Xml(#[from] quick_xml::DeError),

    #[error("duplicate person id {0} in dataset")]
    DuplicateId(u64),

    #[error("record store unavailable: {0}")]
    Unavailable(String),
}

/// Anything that can hand out the full, ordered record set
pub trait RecordSource: Send + Sync {
    fn records(&self) -> Result<&[Person], StoreError>;
}

/// RecordStore is the immutable, load-once dataset backing every query
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    people: Vec<Person>,
}

impl RecordStore {
    /// Load a dataset file. A `.xml` extension selects the XML reader,
    /// anything else is read as JSON.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let is_xml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("xml"));
        let store = if is_xml {
            Self::from_xml(&contents)?
        } else {
            Self::from_json(&contents)?
        };
        tracing::info!(path = %path.display(), records = store.len(), "Loaded dataset");
        Ok(store)
    }

    /// JSON: an array of rows, or `{"rows": [...]}`
    pub fn from_json(contents: &str) -> Result<Self, StoreError> {
        #[derive(serde::Deserialize)]
        #[serde(untagged)]
        enum Dataset {
            Rows(Vec<PersonRow>),
            Wrapped { rows: Vec<PersonRow> },
        }

        let rows = match serde_json::from_str::<Dataset>(contents)? {
            Dataset::Rows(rows) | Dataset::Wrapped { rows } => rows,
        };
        Self::from_people(rows.into_iter().map(Person::from).collect())
    }

    /// XML: a root element holding `<row>` elements, one child per field
    pub fn from_xml(contents: &str) -> Result<Self, StoreError> {
        #[derive(serde::Deserialize)]
        struct Rows {
            #[serde(default)]
            row: Vec<PersonRow>,
        }

        let rows: Rows = quick_xml::de::from_str(contents)?;
        Self::from_people(rows.row.into_iter().map(Person::from).collect())
    }

    /// Build a store from canonical records, keeping their order
    pub fn from_people(people: Vec<Person>) -> Result<Self, StoreError> {
        let mut seen = HashSet::with_capacity(people.len());
        for person in &people {
            if !seen.insert(person.id) {
                return Err(StoreError::DuplicateId(person.id));
            }
        }
        Ok(Self { people })
    }

    pub fn len(&self) -> usize {
        self.people.len()
    }

    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }

    pub fn people(&self) -> &[Person] {
        &self.people
    }
}

impl RecordSource for RecordStore {
    fn records(&self) -> Result<&[Person], StoreError> {
        Ok(&self.people)
    }
}
