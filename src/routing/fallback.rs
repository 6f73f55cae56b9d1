//! Fallback composition of two routings.

use super::{MethodSet, ResponseData, Routing, RoutingPath, RoutingRequest};
use crate::viewer::ReportViewer;

/// Tries `primary` and only on [`ResponseData::NotFound`] asks `secondary`
///
/// Built with [`or`](super::or) or [`RoutingExt::or`](super::RoutingExt::or).
#[derive(Debug, Clone)]
pub struct RoutingFallback<A, B> {
    primary: A,
    secondary: B,
}

impl<A, B> RoutingFallback<A, B> {
    pub const fn new(primary: A, secondary: B) -> Self {
        Self { primary, secondary }
    }

    pub const fn primary(&self) -> &A {
        &self.primary
    }

    pub const fn secondary(&self) -> &B {
        &self.secondary
    }
}

impl<A, B> Routing for RoutingFallback<A, B>
where
    A: Routing,
    B: Routing,
{
    /// Union of both sides, so a method only the secondary accepts is not rejected early
    fn allowed_methods(&self) -> MethodSet {
        self.primary.allowed_methods() | self.secondary.allowed_methods()
    }

    fn fetch_data(
        &self,
        path: &RoutingPath,
        request: &RoutingRequest,
        viewer: &dyn ReportViewer,
    ) -> ResponseData {
        match self.primary.fetch_data(path, request, viewer) {
            ResponseData::NotFound => self.secondary.fetch_data(path, request, viewer),
            resolved => resolved,
        }
    }
}
