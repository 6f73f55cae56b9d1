//! Report data routings
//!
//! Expose the loaded report: the whole report file for download, and the
//! individual artifacts the viewer UI renders.

use super::{FetchError, ResponseData, Routing, RoutingPath, RoutingRequest};
use crate::http::mime;
use crate::viewer::ReportViewer;
use serde::Serialize;

/// The report file, served at the routing's root
#[derive(Debug, Clone, Copy, Default)]
pub struct RoutingReportFile;

impl RoutingReportFile {
    pub const fn new() -> Self {
        Self
    }
}

impl Routing for RoutingReportFile {
    fn fetch_data(
        &self,
        path: &RoutingPath,
        _request: &RoutingRequest,
        viewer: &dyn ReportViewer,
    ) -> ResponseData {
        if !path.is_empty() {
            return ResponseData::not_found();
        }
        match viewer.report_file() {
            Some(file) => ResponseData::found(file.data().clone(), file.content_type()),
            None => FetchError::missing(format!(
                "report '{}' was not loaded from a file",
                viewer.report_name()
            ))
            .into(),
        }
    }
}

/// Artifact listing and artifact content
///
/// The routing's root answers a JSON index of all artifacts, any other path
/// is the identifier of one artifact.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoutingArtifacts;

#[derive(Serialize)]
struct ArtifactIndex<'a> {
    report: &'a str,
    artifacts: Vec<String>,
}

impl RoutingArtifacts {
    pub const fn new() -> Self {
        Self
    }

    fn index(viewer: &dyn ReportViewer) -> ResponseData {
        let index = ArtifactIndex {
            report: viewer.report_name(),
            artifacts: viewer.artifact_ids(),
        };
        match serde_json::to_vec(&index) {
            Ok(body) => ResponseData::found(body, "application/json"),
            Err(e) => FetchError::internal(format!("failed to encode artifact index: {e}")).into(),
        }
    }
}

impl Routing for RoutingArtifacts {
    fn fetch_data(
        &self,
        path: &RoutingPath,
        _request: &RoutingRequest,
        viewer: &dyn ReportViewer,
    ) -> ResponseData {
        if path.is_empty() {
            return Self::index(viewer);
        }

        if let Some(segment) = path.unsafe_segment() {
            return FetchError::bad_request(format!("malformed artifact id segment '{segment}'"))
                .into();
        }

        let id = path.suffix();
        match viewer.artifact(&id) {
            Some(body) => ResponseData::found(body, mime::content_type_for_name(&id)),
            None => FetchError::missing(format!("unknown artifact '{id}'")).into(),
        }
    }
}
