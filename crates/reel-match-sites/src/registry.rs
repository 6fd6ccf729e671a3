//! Site selection by lookup table.
//!
//! Every supported scraper registers under its site id; configuration
//! decides which ids are active. Call sites look scrapers up by id or
//! iterate the enabled set in configuration order.

use crate::client::PacedClient;
use crate::sites::{aebn::Aebn, gayhotmovies::GayHotMovies, queerclick::QueerClick};
use crate::traits::SiteScraper;
use reel_match_config::Config;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

pub struct ScraperRegistry {
    scrapers: HashMap<String, Box<dyn SiteScraper>>,
    /// Enabled site ids in configuration order
    order: Vec<String>,
}

impl ScraperRegistry {
    /// Build the registry of enabled scrapers, all sharing one paced
    /// client
    pub fn from_config(config: &Config, client: Arc<PacedClient>) -> Self {
        let max_pages = config.sites.max_search_pages;
        let mut scrapers: HashMap<String, Box<dyn SiteScraper>> = HashMap::new();

        for built in [
            Box::new(Aebn::new(client.clone(), max_pages)) as Box<dyn SiteScraper>,
            Box::new(GayHotMovies::new(client.clone(), max_pages)),
            Box::new(QueerClick::new(client.clone(), max_pages)),
        ] {
            if config.sites.enabled.iter().any(|id| id == built.site_id()) {
                scrapers.insert(built.site_id().to_string(), built);
            } else {
                debug!(site = built.site_id(), "site disabled by configuration");
            }
        }

        let order = config
            .sites
            .enabled
            .iter()
            .filter(|id| scrapers.contains_key(*id))
            .cloned()
            .collect();
        Self { scrapers, order }
    }

    pub fn get(&self, site_id: &str) -> Option<&dyn SiteScraper> {
        self.scrapers.get(site_id).map(|s| s.as_ref())
    }

    /// Enabled scrapers in configuration order
    pub fn iter(&self) -> impl Iterator<Item = &dyn SiteScraper> {
        self.order.iter().filter_map(|id| self.get(id))
    }

    pub fn is_registered(&self, site_id: &str) -> bool {
        self.scrapers.contains_key(site_id)
    }

    pub fn registered_sites(&self) -> Vec<&str> {
        self.order.iter().map(|s| s.as_str()).collect()
    }
}
