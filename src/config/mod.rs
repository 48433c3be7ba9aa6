// Configuration module entry point
// Loads configuration from file, environment and built-in defaults

mod state;
mod types;

use std::net::SocketAddr;
use std::time::Duration;

// Re-export public types
pub use state::AppState;
pub use types::{Config, HttpConfig, LoggingConfig, MediaConfig, ServerConfig};

/// Config file used when none is named on the command line
pub const DEFAULT_CONFIG_PATH: &str = "config";

impl Config {
    /// Load configuration from specified file path (extension optional).
    ///
    /// The file is optional. Environment variables prefixed with `MEDIA`
    /// override it, e.g. `MEDIA__SERVER__PORT=8080`.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("MEDIA")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("server.keep_alive", true)?
            .set_default("server.connection_timeout", 300)?
            .set_default("media.dir", "client")?
            .set_default("media.stream_buffer_size", 65_536)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("http.server_name", "media-range-server")?
            .set_default("http.enable_cors", false)?
            .build()?;

        settings.try_deserialize()
    }

    /// Load from `config.toml` in the working directory, if present
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }

    pub const fn connection_timeout(&self) -> Duration {
        Duration::from_secs(self.server.connection_timeout)
    }
}
