//! Report viewer module
//!
//! The report data routings read from. [`ReportViewer`] is the read-only
//! capability handed to every fetch; [`ReportStore`] is the in-memory
//! implementation the server loads once at startup.

use hyper::body::Bytes;
use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::http::mime;

/// Read access to the report currently shown by the viewer
///
/// Implementations are shared by all concurrently handled requests.
pub trait ReportViewer: Send + Sync {
    /// Display name of the report
    fn report_name(&self) -> &str;

    /// The report as a single downloadable file, if it was loaded from one
    fn report_file(&self) -> Option<&ReportFile>;

    /// Identifiers of all artifacts, sorted
    fn artifact_ids(&self) -> Vec<String>;

    /// Content of the artifact `id` (a `/`-separated relative path)
    fn artifact(&self, id: &str) -> Option<Bytes>;
}

/// A whole report file, e.g. `results.zip`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportFile {
    name: String,
    data: Bytes,
}

impl ReportFile {
    pub fn new(name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub const fn data(&self) -> &Bytes {
        &self.data
    }

    pub fn content_type(&self) -> &'static str {
        mime::content_type_for_name(&self.name)
    }
}

/// Errors while loading a report from disk
#[derive(Debug, thiserror::Error)]
pub enum ViewerError {
    #[error("report path '{}' does not exist", .0.display())]
    NotFound(PathBuf),
    #[error("failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("'{}' is not a valid UTF-8 file name", .0.display())]
    InvalidName(PathBuf),
}

impl ViewerError {
    fn io(path: &Path, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            return Self::NotFound(path.to_path_buf());
        }
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Immutable in-memory report
#[derive(Debug, Clone, Default)]
pub struct ReportStore {
    name: String,
    report_file: Option<ReportFile>,
    artifacts: BTreeMap<String, Bytes>,
}

impl ReportStore {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_report_file(mut self, name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        self.report_file = Some(ReportFile::new(name, data));
        self
    }

    #[must_use]
    pub fn with_artifact(mut self, id: impl Into<String>, data: impl Into<Bytes>) -> Self {
        self.artifacts.insert(id.into(), data.into());
        self
    }

    /// Load a report from `path`
    ///
    /// A regular file becomes the report file. A directory is walked
    /// recursively and every file in it becomes an artifact.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ViewerError> {
        let path = path.as_ref();
        let metadata = fs::metadata(path).map_err(|e| ViewerError::io(path, e))?;
        let name = path
            .file_stem()
            .and_then(OsStr::to_str)
            .unwrap_or("report")
            .to_string();

        if metadata.is_dir() {
            let mut store = Self::new(name);
            store.load_directory(path, path)?;
            return Ok(store);
        }

        let file_name = path
            .file_name()
            .and_then(OsStr::to_str)
            .ok_or_else(|| ViewerError::InvalidName(path.to_path_buf()))?
            .to_string();
        let data = fs::read(path).map_err(|e| ViewerError::io(path, e))?;
        Ok(Self::new(name).with_report_file(file_name, data))
    }

    fn load_directory(&mut self, root: &Path, dir: &Path) -> Result<(), ViewerError> {
        let entries = fs::read_dir(dir).map_err(|e| ViewerError::io(dir, e))?;
        for entry in entries {
            let entry = entry.map_err(|e| ViewerError::io(dir, e))?;
            let path = entry.path();
            // file_type does not follow symlinks, linked directories are skipped
            let file_type = entry.file_type().map_err(|e| ViewerError::io(&path, e))?;
            if file_type.is_dir() {
                self.load_directory(root, &path)?;
                continue;
            }
            if !path.is_file() {
                continue;
            }
            let id = artifact_id(root, &path)?;
            let data = fs::read(&path).map_err(|e| ViewerError::io(&path, e))?;
            self.artifacts.insert(id, Bytes::from(data));
        }
        Ok(())
    }

    pub fn artifact_count(&self) -> usize {
        self.artifacts.len()
    }
}

/// `/`-joined path of `file` relative to `root`
fn artifact_id(root: &Path, file: &Path) -> Result<String, ViewerError> {
    let relative = file.strip_prefix(root).unwrap_or(file);
    relative
        .components()
        .map(|component| component.as_os_str().to_str())
        .collect::<Option<Vec<_>>>()
        .map(|parts| parts.join("/"))
        .ok_or_else(|| ViewerError::InvalidName(file.to_path_buf()))
}

impl ReportViewer for ReportStore {
    fn report_name(&self) -> &str {
        &self.name
    }

    fn report_file(&self) -> Option<&ReportFile> {
        self.report_file.as_ref()
    }

    fn artifact_ids(&self) -> Vec<String> {
        self.artifacts.keys().cloned().collect()
    }

    fn artifact(&self, id: &str) -> Option<Bytes> {
        self.artifacts.get(id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_directory_collects_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("overview.json"), "{}").unwrap();
        fs::create_dir(dir.path().join("comparisons")).unwrap();
        fs::write(dir.path().join("comparisons/a-b.json"), "[1]").unwrap();

        let store = ReportStore::load(dir.path()).unwrap();
        assert_eq!(
            store.artifact_ids(),
            vec!["comparisons/a-b.json".to_string(), "overview.json".to_string()]
        );
        assert_eq!(
            store.artifact("comparisons/a-b.json"),
            Some(Bytes::from_static(b"[1]"))
        );
        assert!(store.report_file().is_none());
        assert_eq!(store.artifact_count(), 2);
    }

    #[cfg(unix)]
    #[test]
    fn test_load_directory_skips_linked_directories() {
        use std::os::unix::fs::symlink;

        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.json"), "{}").unwrap();
        symlink(dir.path(), dir.path().join("loop")).unwrap();
        symlink(dir.path().join("a.json"), dir.path().join("b.json")).unwrap();

        let store = ReportStore::load(dir.path()).unwrap();
        assert_eq!(store.artifact_ids(), vec!["a.json", "b.json"]);
    }

    #[test]
    fn test_load_file_as_report_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.zip");
        fs::write(&path, b"PK\x03\x04").unwrap();

        let store = ReportStore::load(&path).unwrap();
        assert_eq!(store.report_name(), "results");
        let file = store.report_file().unwrap();
        assert_eq!(file.name(), "results.zip");
        assert_eq!(file.data().as_ref(), b"PK\x03\x04");
        assert_eq!(file.content_type(), "application/zip");
        assert!(store.artifact_ids().is_empty());
    }

    #[test]
    fn test_load_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = ReportStore::load(dir.path().join("nope.zip")).unwrap_err();
        assert!(matches!(err, ViewerError::NotFound(_)));
        assert!(err.to_string().contains("nope.zip"));
    }

    #[test]
    fn test_builder() {
        let store = ReportStore::new("demo")
            .with_artifact("b.json", "b")
            .with_artifact("a.json", "a");
        assert_eq!(store.report_name(), "demo");
        assert_eq!(store.artifact_ids(), vec!["a.json", "b.json"]);
        assert_eq!(store.artifact("c.json"), None);
    }
}
