use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One row from a site's search results, before any match gate has run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchCandidate {
    /// Site id the row came from
    pub site: String,
    /// Raw title text as listed (not normalized)
    pub title: String,
    /// Absolute URL of the detail page
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub studio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_mins: Option<i64>,
}

/// Everything a site's detail page yields, in one fixed shape.
///
/// Every scraper fills every field regardless of what the underlying page
/// exposes; a missing field is an explicit empty value, never an absent
/// key. Downstream code assumes presence.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SiteDetails {
    pub synopsis: String,
    pub directors: Vec<String>,
    pub cast: Vec<String>,
    pub collections: BTreeSet<String>,
    pub genres: BTreeSet<String>,
    pub countries: BTreeSet<String>,
    pub compilation: bool,
    pub release_date: Option<NaiveDate>,
    pub duration_mins: Option<i64>,
    pub poster: Vec<String>,
    pub art: Vec<String>,
    pub scenes: Vec<SceneReview>,
    pub chapters: Vec<Chapter>,
    pub rating: Option<f32>,
}

/// A per-scene writeup from the detail page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SceneReview {
    pub heading: String,
    pub text: String,
    /// Scene length when the site states one, in minutes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_mins: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chapter {
    pub title: String,
    pub start_ms: i64,
    pub end_ms: i64,
}
