use super::{ResponseData, Routing, RoutingPath, RoutingRequest};
use crate::viewer::ReportViewer;
use hyper::body::Bytes;

/// Fixed body served at the routing's root, e.g. a health probe
#[derive(Debug, Clone)]
pub struct RoutingStatic {
    body: Bytes,
    content_type: &'static str,
}

impl RoutingStatic {
    pub fn new(body: impl Into<Bytes>, content_type: &'static str) -> Self {
        Self {
            body: body.into(),
            content_type,
        }
    }

    pub fn text(body: &'static str) -> Self {
        Self::new(body, "text/plain; charset=utf-8")
    }
}

impl Routing for RoutingStatic {
    fn fetch_data(
        &self,
        path: &RoutingPath,
        _request: &RoutingRequest,
        _viewer: &dyn ReportViewer,
    ) -> ResponseData {
        if !path.is_empty() {
            return ResponseData::not_found();
        }
        ResponseData::Found {
            body: self.body.clone(),
            content_type: self.content_type,
        }
    }
}
