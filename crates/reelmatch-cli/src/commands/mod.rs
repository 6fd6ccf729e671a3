pub mod config;
pub mod normalize;
pub mod scan;
pub mod search;
pub mod update;

use color_eyre::Result;
use reel_match_config::{Config, PathManager};
use reel_match_core::{PersonCache, Pipeline};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Resolve the config file (explicit override or the platform default)
/// and load it; a missing file means defaults.
pub(crate) fn load_config(override_path: Option<&Path>) -> Result<(Config, PathManager)> {
    let paths = PathManager::default();
    let path: PathBuf = override_path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| paths.config_file());
    let config = if path.exists() {
        Config::load_from_file(&path).map_err(|e| {
            color_eyre::eyre::eyre!("Failed to load config from {}: {}", path.display(), e)
        })?
    } else {
        Config::default()
    };
    Ok((config, paths))
}

pub(crate) fn build_pipeline(override_path: Option<&Path>) -> Result<Pipeline> {
    let (config, paths) = load_config(override_path)?;
    let mut pipeline = Pipeline::new(config)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to build pipeline: {}", e))?;
    match PersonCache::new(&paths) {
        Ok(cache) => pipeline.set_person_cache(cache),
        Err(error) => warn!(%error, "person cache unavailable; continuing without it"),
    }
    Ok(pipeline)
}
