use crate::error::SiteError;
use async_trait::async_trait;
use reel_match_models::{FilmRecord, SearchCandidate, SiteDetails};

/// One implementation per supported website. Scrapers are pure
/// extraction: they fetch, select, and hand back the fixed
/// [`SiteDetails`] shape; every match decision happens upstream in the
/// pipeline.
#[async_trait]
pub trait SiteScraper: Send + Sync {
    /// Stable identifier used in configuration and the registry
    fn site_id(&self) -> &'static str;

    /// Human-readable site name
    fn site_name(&self) -> &'static str;

    /// Run the site's search for the film and return candidate rows in
    /// site order. Pagination is bounded by the configured page cap.
    async fn search(&self, film: &FilmRecord) -> Result<Vec<SearchCandidate>, SiteError>;

    /// Fetch and extract a detail page. Every [`SiteDetails`] field is
    /// populated; fields the site does not expose are explicit empties.
    async fn details(&self, url: &str) -> Result<SiteDetails, SiteError>;
}
