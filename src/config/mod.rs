// Configuration module entry point
// Loads the viewer configuration and holds the shared application state

mod state;
mod types;

use std::net::{IpAddr, SocketAddr};

use ::config::builder::{ConfigBuilder, DefaultState};
use ::config::{ConfigError, Environment, File};

pub use state::AppState;
pub use types::{
    Config, HttpConfig, LoggingConfig, PerformanceConfig, ServerConfig, ViewerConfig,
};

/// Config file used when no path is given on the command line
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Prefix of environment overrides, e.g. `VIEWER_SERVER__PORT=8080`
pub const ENV_PREFIX: &str = "VIEWER";

fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    ::config::Config::builder()
        .set_default("server.host", "127.0.0.1")?
        .set_default("server.port", 1996)?
        .set_default("viewer.mount_prefix", "/")?
        .set_default("viewer.ui_dir", "report-viewer")?
        .set_default("viewer.index_file", "index.html")?
        .set_default("viewer.report_route", "results.zip")?
        .set_default("viewer.api_route", "api")?
        .set_default("viewer.health_route", "healthz")?
        .set_default("viewer.spa_fallback", false)?
        .set_default("logging.level", "info")?
        .set_default("logging.access_log", true)?
        .set_default("performance.keep_alive_timeout", 75)?
        .set_default("performance.read_timeout", 30)?
        .set_default("performance.write_timeout", 30)?
        .set_default("http.server_name", concat!("report-viewer/", env!("CARGO_PKG_VERSION")))?
        .set_default("http.enable_cors", false)?
        .set_default("http.cache_max_age", 0)
}

impl Config {
    /// Load configuration from `config_path`, a missing file is allowed
    ///
    /// Values come from the built-in defaults, then the file, then
    /// `VIEWER_`-prefixed environment variables.
    pub fn load_from(config_path: &str) -> Result<Self, ConfigError> {
        builder_with_defaults()?
            .add_source(File::with_name(config_path).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Built-in defaults only, ignoring files and environment
    pub fn defaults() -> Result<Self, ConfigError> {
        builder_with_defaults()?.build()?.try_deserialize()
    }

    /// Listen address, `host` is an IPv4 or IPv6 literal
    pub fn socket_addr(&self) -> crate::Result<SocketAddr> {
        let host = self.server.host.trim_start_matches('[').trim_end_matches(']');
        let ip: IpAddr = host.parse().map_err(|source| crate::Error::Address {
            addr: self.server.host.clone(),
            source,
        })?;
        Ok(SocketAddr::new(ip, self.server.port))
    }
}
