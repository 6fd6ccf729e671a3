use thiserror::Error;

/// Network-layer failures. A fetch or extraction failure aborts the
/// current candidate only; an enrichment failure leaves the affected
/// fields blank. Neither is ever fatal to the overall scrape.
#[derive(Debug, Error)]
pub enum SiteError {
    #[error("request to {url} failed: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("could not extract {what} from {url}")]
    Extract { what: &'static str, url: String },
    #[error("IAFD enrichment failed for {0}")]
    Enrichment(String),
}

impl SiteError {
    /// True for responses where retrying cannot help (auth walls,
    /// missing pages)
    pub fn is_permanent(&self) -> bool {
        matches!(self, SiteError::Status { status, .. } if (400..500).contains(status))
    }
}
