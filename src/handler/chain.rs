//! Routing chain assembly
//!
//! Builds the single top-level routing the dispatcher runs: report data
//! first, then the viewer UI files, then optionally the UI's index page for
//! client-side routes.

use crate::config::ViewerConfig;
use crate::routing::{
    RoutingAlias, RoutingArtifacts, RoutingExt, RoutingReportFile, RoutingResources,
    RoutingStatic, RoutingTree, SharedRouting,
};

pub fn build_routing(config: &ViewerConfig) -> SharedRouting {
    let data = RoutingTree::new()
        .route(&config.api_route, RoutingArtifacts::new())
        .route(&config.report_route, RoutingReportFile::new())
        .route(&config.health_route, RoutingStatic::text("ok"));

    let resources = RoutingResources::new(&config.ui_dir).with_index_file(&config.index_file);

    if config.spa_fallback {
        let index = RoutingAlias::new(&config.index_file, resources.clone());
        data.or(resources).or(index).shared()
    } else {
        data.or(resources).shared()
    }
}
