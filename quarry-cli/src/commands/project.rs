//! Shared config loading and project boot for commands.

use anyhow::{Context, Result};
use quarry_core::{Config, Project};
use std::path::Path;

/// Load `quarry.yml` (or defaults when it is absent) and boot the project.
pub fn load_project(config_path: &Path) -> Result<(Config, Project)> {
    tracing::info!("Loading config from {:?}", config_path);
    let config = Config::load_or_default(config_path).context("Failed to load configuration")?;
    let project = Project::from_config(&config).context("Failed to index project")?;
    Ok((config, project))
}
