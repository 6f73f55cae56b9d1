// Application state module
// Everything a request handler needs, shared by all connections

use std::sync::Arc;

use super::types::Config;
use crate::http::CachePolicy;
use crate::routing::{RoutingPath, SharedRouting};
use crate::viewer::ReportViewer;

/// Application state, immutable after startup
pub struct AppState {
    pub config: Config,
    /// Top-level routing chain
    pub routing: SharedRouting,
    pub viewer: Arc<dyn ReportViewer>,
    /// Parsed `viewer.mount_prefix`
    pub mount_prefix: RoutingPath,
    pub cache_policy: CachePolicy,
}

impl AppState {
    pub fn new(config: Config, routing: SharedRouting, viewer: Arc<dyn ReportViewer>) -> Self {
        let mount_prefix = RoutingPath::parse(&config.viewer.mount_prefix);
        let cache_policy = CachePolicy::from_max_age(config.http.cache_max_age);
        Self {
            config,
            routing,
            viewer,
            mount_prefix,
            cache_policy,
        }
    }
}
