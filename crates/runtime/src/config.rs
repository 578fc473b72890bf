//! Runtime configuration.

use std::env;
use std::path::PathBuf;

use crawl_core::GameConfig;

/// Runtime configuration shared across the session and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub game: GameConfig,
    /// Save file location. `None` keeps history in memory only.
    pub save_path: Option<PathBuf>,
    /// Write a save after every settled action.
    pub enable_persistence: bool,
    /// Capacity of each event bus topic.
    pub event_buffer_size: usize,
    /// Pending saves the persistence worker queues before dropping new ones.
    pub persistence_buffer_size: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            game: GameConfig::default(),
            save_path: None,
            enable_persistence: true,
            event_buffer_size: 100,
            persistence_buffer_size: 8,
        }
    }
}

impl RuntimeConfig {
    /// Construct configuration from environment variables.
    ///
    /// Environment variables:
    /// - `CRAWL_SAVE_PATH` - Save file path (default: `save.json` in the platform data dir)
    /// - `CRAWL_ENABLE_PERSISTENCE` - `true`/`false` (default: true)
    /// - `CRAWL_EVENT_BUFFER` - Event bus capacity per topic (default: 100)
    /// - `CRAWL_PERSISTENCE_BUFFER` - Queued saves (default: 8)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        config.save_path = Some(
            env::var("CRAWL_SAVE_PATH")
                .ok()
                .map(PathBuf::from)
                .unwrap_or_else(default_save_path),
        );
        if let Some(enabled) = read_env::<bool>("CRAWL_ENABLE_PERSISTENCE") {
            config.enable_persistence = enabled;
        }
        if let Some(size) = read_env::<usize>("CRAWL_EVENT_BUFFER") {
            config.event_buffer_size = size.max(1);
        }
        if let Some(size) = read_env::<usize>("CRAWL_PERSISTENCE_BUFFER") {
            config.persistence_buffer_size = size.max(1);
        }

        config
    }

    pub fn with_game_config(mut self, game: GameConfig) -> Self {
        self.game = game;
        self
    }

    pub fn with_save_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.save_path = Some(path.into());
        self
    }

    pub fn without_persistence(mut self) -> Self {
        self.enable_persistence = false;
        self
    }
}

/// Platform data directory save file.
///
/// - Linux: `~/.local/share/crawl/save.json`
/// - macOS: `~/Library/Application Support/crawl/save.json`
/// - Windows: `%APPDATA%\crawl\data\save.json`
/// - Fallback: `./save_data/save.json`
pub fn default_save_path() -> PathBuf {
    directories::ProjectDirs::from("", "", "crawl")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("./save_data"))
        .join("save.json")
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
