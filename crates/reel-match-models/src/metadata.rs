use crate::collection::CollectionEntry;
use crate::site::{Chapter, SceneReview};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The populated metadata object handed back to the host's persistence
/// layer at the end of the update phase
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MetadataBundle {
    pub title: String,
    pub studio: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub originally_available: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    pub summary: String,
    pub genres: BTreeSet<String>,
    pub countries: BTreeSet<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,
    pub cast: Vec<CastEntry>,
    pub directors: Vec<DirectorEntry>,
    pub collections: Vec<CollectionEntry>,
    pub posters: Vec<String>,
    pub art: Vec<String>,
    pub reviews: Vec<SceneReview>,
    pub chapters: Vec<Chapter>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CastEntry {
    pub name: String,
    /// Role text shown in the host UI (site role, tick, or AKA annotation)
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DirectorEntry {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}
