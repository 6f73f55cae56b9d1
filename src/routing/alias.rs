use super::{MethodSet, ResponseData, Routing, RoutingPath, RoutingRequest};
use crate::viewer::ReportViewer;

/// Serves a fixed path of another routing, whatever path was requested
///
/// Used as the last link of the chain so that client-side routes of the
/// viewer UI resolve to its index page.
#[derive(Debug, Clone)]
pub struct RoutingAlias<R> {
    target: RoutingPath,
    routing: R,
}

impl<R: Routing> RoutingAlias<R> {
    pub fn new(target: &str, routing: R) -> Self {
        Self {
            target: RoutingPath::parse(target),
            routing,
        }
    }

    pub const fn target(&self) -> &RoutingPath {
        &self.target
    }
}

impl<R: Routing> Routing for RoutingAlias<R> {
    fn allowed_methods(&self) -> MethodSet {
        self.routing.allowed_methods()
    }

    fn fetch_data(
        &self,
        _path: &RoutingPath,
        request: &RoutingRequest,
        viewer: &dyn ReportViewer,
    ) -> ResponseData {
        self.routing.fetch_data(&self.target, request, viewer)
    }
}
