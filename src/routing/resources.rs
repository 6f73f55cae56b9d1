//! Static resources routing
//!
//! Serves the files of a directory, typically the compiled viewer UI.

use super::{FetchError, ResponseData, Routing, RoutingPath, RoutingRequest};
use crate::http::mime;
use crate::logger;
use crate::viewer::ReportViewer;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const DEFAULT_INDEX_FILE: &str = "index.html";

/// Files below a base directory
///
/// Directories, including the routing's root, resolve to their index file.
#[derive(Debug, Clone)]
pub struct RoutingResources {
    base: PathBuf,
    index_file: String,
}

impl RoutingResources {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self {
            base: base.into(),
            index_file: DEFAULT_INDEX_FILE.to_string(),
        }
    }

    #[must_use]
    pub fn with_index_file(mut self, index_file: impl Into<String>) -> Self {
        self.index_file = index_file.into();
        self
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Map the remaining segments below the base directory
    fn resolve(&self, path: &RoutingPath) -> Result<PathBuf, FetchError> {
        if let Some(segment) = path.unsafe_segment() {
            logger::log_warning(&format!(
                "Path traversal attempt blocked: {path} below {}",
                self.base.display()
            ));
            return Err(FetchError::bad_request(format!(
                "invalid path segment '{segment}'"
            )));
        }

        let mut file = self.base.clone();
        file.extend(path.remaining_segments());
        if file.is_dir() {
            file.push(&self.index_file);
        }
        Ok(file)
    }

    /// Canonical form of `file`, provided it stays inside the base directory
    ///
    /// Symlinks are followed, so a link pointing out of the base is caught here.
    fn contain(&self, path: &RoutingPath, file: &Path) -> Result<Option<PathBuf>, FetchError> {
        let base = match self.base.canonicalize() {
            Ok(base) => base,
            Err(e) => {
                logger::log_warning(&format!(
                    "Resource directory not found or inaccessible '{}': {e}",
                    self.base.display()
                ));
                return Ok(None);
            }
        };

        // File not found is common, the next routing may serve the path
        let Ok(canonical) = file.canonicalize() else {
            return Ok(None);
        };
        if !canonical.starts_with(&base) {
            logger::log_warning(&format!(
                "Path traversal attempt blocked: {path} -> {}",
                canonical.display()
            ));
            return Err(FetchError::bad_request(format!(
                "path '{path}' leaves the resource directory"
            )));
        }
        Ok(Some(canonical))
    }
}

impl Routing for RoutingResources {
    fn fetch_data(
        &self,
        path: &RoutingPath,
        _request: &RoutingRequest,
        _viewer: &dyn ReportViewer,
    ) -> ResponseData {
        let requested = match self.resolve(path) {
            Ok(file) => file,
            Err(e) => return e.into(),
        };
        let file = match self.contain(path, &requested) {
            Ok(Some(file)) if file.is_file() => file,
            Ok(_) => return ResponseData::not_found(),
            Err(e) => return e.into(),
        };

        match fs::read(&file) {
            Ok(content) => ResponseData::found(content, mime::content_type_for(&requested)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => ResponseData::not_found(),
            Err(e) => FetchError::from_io(&file.display().to_string(), &e).into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::{FetchErrorKind, ResponseKind};
    use crate::viewer::ReportStore;
    use std::fs;

    fn fixture() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("index.html"), "<html>viewer</html>").unwrap();
        fs::create_dir(dir.path().join("assets")).unwrap();
        fs::write(dir.path().join("assets/app.js"), "console.log(1)").unwrap();
        fs::create_dir(dir.path().join("docs")).unwrap();
        fs::write(dir.path().join("docs/index.html"), "docs").unwrap();
        dir
    }

    fn fetch(routing: &RoutingResources, raw: &str) -> ResponseData {
        let viewer = ReportStore::new("test");
        routing.fetch_data(&RoutingPath::parse(raw), &RoutingRequest::get(raw), &viewer)
    }

    #[test]
    fn test_empty_path_serves_index() {
        let dir = fixture();
        let routing = RoutingResources::new(dir.path());
        assert_eq!(
            fetch(&routing, "/"),
            ResponseData::found("<html>viewer</html>", "text/html; charset=utf-8")
        );
    }

    #[test]
    fn test_serves_nested_file_with_mime() {
        let dir = fixture();
        let routing = RoutingResources::new(dir.path());
        assert_eq!(
            fetch(&routing, "/assets/app.js"),
            ResponseData::found("console.log(1)", "application/javascript")
        );
        assert_eq!(
            fetch(&routing, "/docs"),
            ResponseData::found("docs", "text/html; charset=utf-8")
        );
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = fixture();
        let routing = RoutingResources::new(dir.path());
        assert_eq!(fetch(&routing, "/missing.css"), ResponseData::not_found());
        assert_eq!(fetch(&routing, "/assets"), ResponseData::not_found());
        assert_eq!(fetch(&routing, "/index.html/x"), ResponseData::not_found());
    }

    #[test]
    fn test_traversal_is_rejected() {
        let dir = fixture();
        let routing = RoutingResources::new(dir.path().join("assets"));

        let data = fetch(&routing, "/../index.html");
        assert_eq!(data.kind(), ResponseKind::Error);
        match data {
            ResponseData::Error(e) => assert_eq!(e.kind(), FetchErrorKind::BadRequest),
            other => panic!("Expected Error, got {other:?}"),
        }

        let data = fetch(&routing, "/..%2Findex.html");
        assert_eq!(data.kind(), ResponseKind::Error);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_out_of_base_is_rejected() {
        use std::os::unix::fs::symlink;

        let outside = tempfile::tempdir().unwrap();
        fs::write(outside.path().join("secret.txt"), "TOP SECRET").unwrap();
        let dir = fixture();
        symlink(outside.path().join("secret.txt"), dir.path().join("leak.txt")).unwrap();
        symlink(outside.path(), dir.path().join("linked")).unwrap();

        let routing = RoutingResources::new(dir.path());
        for raw in ["/leak.txt", "/linked/secret.txt"] {
            match fetch(&routing, raw) {
                ResponseData::Error(e) => assert_eq!(e.kind(), FetchErrorKind::BadRequest),
                other => panic!("Expected Error for {raw}, got {other:?}"),
            }
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_inside_base_is_served() {
        let dir = fixture();
        std::os::unix::fs::symlink(dir.path().join("assets/app.js"), dir.path().join("app.js"))
            .unwrap();

        let routing = RoutingResources::new(dir.path());
        assert_eq!(
            fetch(&routing, "/app.js"),
            ResponseData::found("console.log(1)", "application/javascript")
        );
    }

    #[test]
    fn test_colon_in_name_is_served() {
        let dir = fixture();
        fs::write(dir.path().join("a:b.json"), "{}").unwrap();
        let routing = RoutingResources::new(dir.path());
        assert_eq!(
            fetch(&routing, "/a:b.json"),
            ResponseData::found("{}", "application/json")
        );
    }

    #[test]
    fn test_missing_base_is_not_found() {
        let dir = fixture();
        let routing = RoutingResources::new(dir.path().join("absent"));
        assert_eq!(fetch(&routing, "/index.html"), ResponseData::not_found());
    }

    #[test]
    fn test_custom_index_file() {
        let dir = fixture();
        fs::write(dir.path().join("main.html"), "main").unwrap();
        let routing = RoutingResources::new(dir.path()).with_index_file("main.html");
        assert_eq!(
            fetch(&routing, ""),
            ResponseData::found("main", "text/html; charset=utf-8")
        );
    }
}
