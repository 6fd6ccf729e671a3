pub mod config;
pub mod paths;

pub use config::{
    ClientConfig, CollectionsConfig, Config, MatchingConfig, SitesConfig,
};
pub use paths::PathManager;
