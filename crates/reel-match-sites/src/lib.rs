pub mod client;
pub mod error;
pub mod iafd;
pub mod registry;
pub mod sites;
pub mod traits;

pub use client::PacedClient;
pub use error::SiteError;
pub use iafd::resolver::IafdResolver;
pub use registry::ScraperRegistry;
pub use traits::SiteScraper;
