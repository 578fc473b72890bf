//! Game configuration loader.

use std::path::Path;

use crawl_core::GameConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for game configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// Missing keys fall back to the [`GameConfig`] defaults.
    pub fn load(path: &Path) -> LoadResult<GameConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parse config from TOML text.
    pub fn parse(content: &str) -> LoadResult<GameConfig> {
        let config: GameConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        if config.log_capacity == 0 {
            anyhow::bail!("log_capacity must be at least 1");
        }
        if config.fov_radius < 0 {
            anyhow::bail!("fov_radius must not be negative (got {})", config.fov_radius);
        }
        if config.action_points < 1 {
            anyhow::bail!("action_points must be at least 1 (got {})", config.action_points);
        }
        Ok(config)
    }
}
