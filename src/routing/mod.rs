//! Routing module
//!
//! A [`Routing`] resolves the remaining part of a request path to response
//! data, or declines with [`ResponseData::NotFound`] so that the next routing
//! of a chain can try. Routings are composed with [`or`]:
//!
//! ```
//! use report_viewer::routing::{RoutingExt, RoutingStatic, RoutingTree};
//!
//! let health = RoutingTree::new().route("healthz", RoutingStatic::text("ok"));
//! let chain = health.or(RoutingStatic::text("fallback"));
//! ```

mod alias;
mod fallback;
mod fixed;
mod method;
mod path;
mod report;
mod request;
mod resources;
mod response;
mod tree;

pub use alias::RoutingAlias;
pub use fallback::RoutingFallback;
pub use fixed::RoutingStatic;
pub use method::{HttpMethod, MethodSet};
pub use path::RoutingPath;
pub use report::{RoutingArtifacts, RoutingReportFile};
pub use request::RoutingRequest;
pub use resources::RoutingResources;
pub use response::{FetchError, FetchErrorKind, ResponseData, ResponseKind};
pub use tree::RoutingTree;

use crate::viewer::ReportViewer;
use std::sync::Arc;

/// Handles the data below a URL prefix
///
/// Implementations must be free of per-request mutable state: one routing
/// value serves every concurrent request.
pub trait Routing: Send + Sync {
    /// Methods this routing can serve, checked by the dispatcher before `fetch_data`
    fn allowed_methods(&self) -> MethodSet {
        MethodSet::GET
    }

    /// Resolve `path`, the part of the URL not yet interpreted by an enclosing routing
    ///
    /// Returns [`ResponseData::NotFound`] when the path is not owned by this
    /// routing and [`ResponseData::Error`] when it is owned but the data could
    /// not be produced.
    fn fetch_data(
        &self,
        path: &RoutingPath,
        request: &RoutingRequest,
        viewer: &dyn ReportViewer,
    ) -> ResponseData;
}

/// Shared, type-erased routing as stored by the server
pub type SharedRouting = Arc<dyn Routing>;

/// Use `secondary` wherever `primary` finds nothing
pub const fn or<A, B>(primary: A, secondary: B) -> RoutingFallback<A, B>
where
    A: Routing,
    B: Routing,
{
    RoutingFallback::new(primary, secondary)
}

/// Combinators available on every routing
pub trait RoutingExt: Routing + Sized {
    /// Use `other` if this routing does not find any data
    fn or<R: Routing>(self, other: R) -> RoutingFallback<Self, R> {
        or(self, other)
    }

    fn shared(self) -> SharedRouting
    where
        Self: 'static,
    {
        Arc::new(self)
    }
}

impl<T: Routing> RoutingExt for T {}

impl<R: Routing + ?Sized> Routing for &R {
    fn allowed_methods(&self) -> MethodSet {
        (**self).allowed_methods()
    }

    fn fetch_data(
        &self,
        path: &RoutingPath,
        request: &RoutingRequest,
        viewer: &dyn ReportViewer,
    ) -> ResponseData {
        (**self).fetch_data(path, request, viewer)
    }
}

impl<R: Routing + ?Sized> Routing for Box<R> {
    fn allowed_methods(&self) -> MethodSet {
        (**self).allowed_methods()
    }

    fn fetch_data(
        &self,
        path: &RoutingPath,
        request: &RoutingRequest,
        viewer: &dyn ReportViewer,
    ) -> ResponseData {
        (**self).fetch_data(path, request, viewer)
    }
}

impl<R: Routing + ?Sized> Routing for Arc<R> {
    fn allowed_methods(&self) -> MethodSet {
        (**self).allowed_methods()
    }

    fn fetch_data(
        &self,
        path: &RoutingPath,
        request: &RoutingRequest,
        viewer: &dyn ReportViewer,
    ) -> ResponseData {
        (**self).fetch_data(path, request, viewer)
    }
}
