use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Process-wide configuration, loaded once at startup and passed by
/// reference into every component. Nothing reads configuration ambiently.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub matching: MatchingConfig,
    #[serde(default)]
    pub client: ClientConfig,
    #[serde(default)]
    pub sites: SitesConfig,
    #[serde(default)]
    pub collections: CollectionsConfig,
}

/// Tolerances and caps for the fuzzy-match gates
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchingConfig {
    /// When true, a duration mismatch fails the candidate; when false it
    /// is logged and ignored
    #[serde(default)]
    pub match_duration: bool,
    #[serde(default = "default_duration_tolerance_mins")]
    pub duration_tolerance_mins: i64,
    /// Extra slack for stacked releases, which only hold part of the film
    #[serde(default = "default_stacked_duration_tolerance_mins")]
    pub stacked_duration_tolerance_mins: i64,
    #[serde(default = "default_date_tolerance_days")]
    pub date_tolerance_days: i64,
    /// Widened tolerance when matching loosely against IAFD, whose dates
    /// can differ from site dates by up to ~2 years of re-release drift
    #[serde(default = "default_iafd_date_tolerance_days")]
    pub iafd_date_tolerance_days: i64,
    /// Skip person searches returning more matches than this
    #[serde(default = "default_cast_search_cap")]
    pub cast_search_cap: usize,
    /// Scene-agent contexts count mastonly/nonsex credits when applying
    /// the filmography filter
    #[serde(default)]
    pub scene_agent: bool,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            match_duration: false,
            duration_tolerance_mins: default_duration_tolerance_mins(),
            stacked_duration_tolerance_mins: default_stacked_duration_tolerance_mins(),
            date_tolerance_days: default_date_tolerance_days(),
            iafd_date_tolerance_days: default_iafd_date_tolerance_days(),
            cast_search_cap: default_cast_search_cap(),
            scene_agent: false,
        }
    }
}

/// Pacing and retry policy for the shared HTTP client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Politeness delay between requests, in milliseconds
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
    /// Random extra delay added on top of `delay_ms` (0..=jitter_ms)
    #[serde(default = "default_jitter_ms")]
    pub jitter_ms: u64,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Attempts per fetch; a request is never retried beyond this
    #[serde(default = "default_retries")]
    pub retries: u32,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            delay_ms: default_delay_ms(),
            jitter_ms: default_jitter_ms(),
            timeout_secs: default_timeout_secs(),
            retries: default_retries(),
            user_agent: default_user_agent(),
        }
    }
}

/// Which site scrapers the registry activates
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SitesConfig {
    #[serde(default = "default_enabled_sites")]
    pub enabled: Vec<String>,
    /// Pages of search results to walk per site before giving up
    #[serde(default = "default_max_search_pages")]
    pub max_search_pages: usize,
}

impl Default for SitesConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled_sites(),
            max_search_pages: default_max_search_pages(),
        }
    }
}

/// Which collection categories are built during the update phase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionsConfig {
    #[serde(default = "default_true")]
    pub studio: bool,
    #[serde(default = "default_true")]
    pub genres: bool,
    #[serde(default)]
    pub cast: bool,
    #[serde(default)]
    pub directors: bool,
    #[serde(default = "default_true")]
    pub system: bool,
}

impl Default for CollectionsConfig {
    fn default() -> Self {
        Self {
            studio: true,
            genres: true,
            cast: false,
            directors: false,
            system: true,
        }
    }
}

fn default_duration_tolerance_mins() -> i64 {
    10
}

fn default_stacked_duration_tolerance_mins() -> i64 {
    30
}

fn default_date_tolerance_days() -> i64 {
    366
}

fn default_iafd_date_tolerance_days() -> i64 {
    731
}

fn default_cast_search_cap() -> usize {
    25
}

fn default_delay_ms() -> u64 {
    2000
}

fn default_jitter_ms() -> u64 {
    1000
}

fn default_timeout_secs() -> u64 {
    20
}

fn default_retries() -> u32 {
    2
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (X11; Linux x86_64; rv:109.0) Gecko/20100101 Firefox/115.0".to_string()
}

fn default_enabled_sites() -> Vec<String> {
    vec![
        "aebn".to_string(),
        "gayhotmovies".to_string(),
        "queerclick".to_string(),
    ]
}

fn default_max_search_pages() -> usize {
    3
}

fn default_true() -> bool {
    true
}

impl Config {
    pub fn load_from_file(path: &PathBuf) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to_file(&self, path: &PathBuf) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.matching.duration_tolerance_mins < 0 {
            return Err(anyhow::anyhow!("duration_tolerance_mins must be non-negative"));
        }
        if self.matching.date_tolerance_days <= 0 {
            return Err(anyhow::anyhow!("date_tolerance_days must be positive"));
        }
        if self.matching.iafd_date_tolerance_days < self.matching.date_tolerance_days {
            return Err(anyhow::anyhow!(
                "iafd_date_tolerance_days cannot be tighter than date_tolerance_days"
            ));
        }
        if self.sites.enabled.is_empty() {
            return Err(anyhow::anyhow!("at least one site must be enabled"));
        }
        let known = ["aebn", "gayhotmovies", "queerclick"];
        for site in &self.sites.enabled {
            if !known.contains(&site.as_str()) {
                return Err(anyhow::anyhow!("Unknown site in sites.enabled: {}", site));
            }
        }
        if self.client.retries == 0 {
            return Err(anyhow::anyhow!("client.retries must be at least 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        Config::default().validate().unwrap();
    }

    #[test]
    fn empty_toml_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.matching.date_tolerance_days, 366);
        assert_eq!(config.matching.iafd_date_tolerance_days, 731);
        assert_eq!(config.matching.cast_search_cap, 25);
        assert!(!config.matching.match_duration);
        assert_eq!(config.sites.enabled.len(), 3);
    }

    #[test]
    fn rejects_unknown_site() {
        let mut config = Config::default();
        config.sites.enabled.push("notasite".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_iafd_tolerance_tighter_than_standard() {
        let mut config = Config::default();
        config.matching.iafd_date_tolerance_days = 100;
        assert!(config.validate().is_err());
    }

    #[test]
    fn round_trips_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut config = Config::default();
        config.matching.match_duration = true;
        config.client.delay_ms = 500;
        config.save_to_file(&path).unwrap();

        let loaded = Config::load_from_file(&path).unwrap();
        assert!(loaded.matching.match_duration);
        assert_eq!(loaded.client.delay_ms, 500);
    }
}
