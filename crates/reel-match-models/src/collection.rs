use serde::{Deserialize, Serialize};

/// One entry in the collection side table, keyed by its synthetic title
/// (derived from studio, genre, cast, director, or a system tag) and
/// written to the host's collection store at the end of the update phase
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CollectionEntry {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub art: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl CollectionEntry {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            poster: None,
            art: None,
            summary: None,
        }
    }
}
