//! On-disk cache of resolved IAFD people, one JSON file per canonical
//! name, so repeated library scans don't re-search IAFD for the same
//! cast. Only established identities (those with a profile URL) are
//! stored; failures are always retried on the next scan.

use anyhow::Result;
use reel_match_config::PathManager;
use reel_match_matching::normalise;
use reel_match_models::PersonRecord;
use std::path::PathBuf;
use tracing::debug;

#[derive(Clone)]
pub struct PersonCache {
    dir: PathBuf,
}

impl PersonCache {
    pub fn new(paths: &PathManager) -> Result<Self> {
        let dir = paths.person_cache_dir();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, name: &str) -> Option<PathBuf> {
        let key = normalise(name);
        if key.is_empty() {
            return None;
        }
        Some(self.dir.join(format!("{}.json", key)))
    }

    pub fn load(&self, name: &str) -> Result<Option<PersonRecord>> {
        let Some(path) = self.path_for(name) else {
            return Ok(None);
        };
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&path)?;
        let record = serde_json::from_str(&content)?;
        debug!(name, path = %path.display(), "person cache hit");
        Ok(Some(record))
    }

    pub fn save(&self, name: &str, record: &PersonRecord) -> Result<()> {
        let Some(path) = self.path_for(name) else {
            return Ok(());
        };
        let content = serde_json::to_string_pretty(record)?;
        std::fs::write(&path, content)?;
        Ok(())
    }
}
