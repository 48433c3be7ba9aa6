// Application state module
// Read-only per-process state shared by every connection

use super::types::Config;
use crate::logger::LogLevel;
use std::path::PathBuf;

/// Application state
///
/// Nothing here changes after startup, so connections share it behind an
/// `Arc` without locking.
pub struct AppState {
    pub config: Config,
    /// Media directory, fixed at startup
    pub media_dir: PathBuf,
    pub log_level: LogLevel,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.clone(),
            media_dir: config.media.dir.clone(),
            log_level: config.logging.level.parse().unwrap_or_default(),
        }
    }

    /// Whether request lines and access entries should be written
    pub fn access_log_enabled(&self) -> bool {
        self.config.logging.access_log && self.log_level >= LogLevel::Info
    }
}
