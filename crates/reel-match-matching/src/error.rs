use chrono::NaiveDate;
use std::path::PathBuf;
use thiserror::Error;

/// A filename that cannot be parsed. Fatal for that file: it is logged
/// and skipped, never retried.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("filename does not match the release pattern: {0}")]
    Format(String),
    #[error("path has no usable filename: {0}")]
    Path(PathBuf),
}

/// A failed match criterion. Aborts the current candidate only; the
/// pipeline advances to the next search result or the next site.
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("site title '{site}' not among accepted variants of '{film}'")]
    Title { site: String, film: String },
    #[error("site studio '{site}' does not match '{film}'")]
    Studio { site: String, film: String },
    #[error("release date {site} is {delta} days from {compare} (tolerance {tolerance})")]
    ReleaseDate {
        site: NaiveDate,
        compare: NaiveDate,
        delta: i64,
        tolerance: i64,
    },
    #[error("duration {site}m is {delta}m from {reference}m (tolerance {tolerance})")]
    Duration {
        site: i64,
        reference: i64,
        delta: i64,
        tolerance: i64,
    },
    #[error("no acceptable match for '{0}'")]
    Person(String),
}
