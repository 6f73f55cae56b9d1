// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub viewer: ViewerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Tokio worker threads, CPU count if unset
    #[serde(default)]
    pub workers: Option<usize>,
}

/// What the viewer serves and where
#[derive(Debug, Deserialize, Clone)]
pub struct ViewerConfig {
    /// URL prefix all routes live below, "/" for the root
    pub mount_prefix: String,
    /// Directory holding the compiled viewer UI
    pub ui_dir: String,
    pub index_file: String,
    /// Report file or report directory, an empty report if unset
    #[serde(default)]
    pub report_path: Option<String>,
    pub report_route: String,
    pub api_route: String,
    pub health_route: String,
    /// Serve the index file for paths nothing else resolves
    pub spa_fallback: bool,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// error, warn, info or debug
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common, json, or custom pattern)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

/// Performance configuration, timeouts in seconds
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
    #[serde(default)]
    pub max_connections: Option<u64>,
}

/// HTTP configuration
#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    pub server_name: String,
    pub enable_cors: bool,
    /// Cache-Control max-age for found data, 0 sends no-cache
    pub cache_max_age: u32,
}
