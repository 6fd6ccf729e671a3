use crate::commands::load_config;
use crate::output::Output;
use clap::Subcommand;
use color_eyre::Result;
use reel_match_config::{Config, PathManager};
use std::path::Path;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the active configuration
    Show,
    /// Print the configuration file path
    Path,
}

pub fn run(out: &Output, config_path: Option<&Path>, action: ConfigAction) -> Result<()> {
    let paths = PathManager::default();
    let file = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| paths.config_file());

    match action {
        ConfigAction::Init { force } => {
            if file.exists() && !force {
                return Err(color_eyre::eyre::eyre!(
                    "{} already exists (use --force to overwrite)",
                    file.display()
                ));
            }
            paths
                .ensure_directories()
                .map_err(|e| color_eyre::eyre::eyre!("Failed to create directories: {}", e))?;
            Config::default()
                .save_to_file(&file)
                .map_err(|e| color_eyre::eyre::eyre!("Failed to write config: {}", e))?;
            out.success(format!("default configuration written to {}", file.display()));
        }
        ConfigAction::Show => {
            let (config, _) = load_config(config_path)?;
            let rendered = toml::to_string_pretty(&config)
                .map_err(|e| color_eyre::eyre::eyre!("Failed to render config: {}", e))?;
            out.info(rendered);
        }
        ConfigAction::Path => {
            out.info(file.display().to_string());
        }
    }
    Ok(())
}
