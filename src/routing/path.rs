//! Routing path module
//!
//! The not yet interpreted suffix of a request URL, split into segments.

use percent_encoding::percent_decode_str;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Remaining path segments of a request
///
/// Values are immutable. Consuming a segment produces a new `RoutingPath`
/// sharing the same storage, the original is never changed.
#[derive(Clone)]
pub struct RoutingPath {
    segments: Arc<[String]>,
    start: usize,
}

impl RoutingPath {
    /// Split a raw URL path into segments
    ///
    /// Empty segments (leading, trailing or doubled slashes) are dropped and
    /// every segment is percent-decoded.
    ///
    /// # Examples
    /// ```
    /// use report_viewer::routing::RoutingPath;
    ///
    /// let path = RoutingPath::parse("/a//b%20c/");
    /// assert_eq!(path.remaining_segments(), ["a", "b c"]);
    /// ```
    pub fn parse(raw: &str) -> Self {
        raw.split('/')
            .filter(|segment| !segment.is_empty())
            .map(|segment| percent_decode_str(segment).decode_utf8_lossy().into_owned())
            .collect()
    }

    pub fn empty() -> Self {
        Self {
            segments: Arc::from(Vec::new()),
            start: 0,
        }
    }

    /// Build a path from already decoded segments
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        segments.into_iter().map(Into::into).collect()
    }

    pub fn remaining_segments(&self) -> &[String] {
        &self.segments[self.start..]
    }

    /// The next segment, or `""` when the path is fully consumed
    pub fn first_segment(&self) -> &str {
        self.remaining_segments()
            .first()
            .map_or("", String::as_str)
    }

    /// The path without its first segment
    ///
    /// Calling this on an empty path returns another empty path.
    #[must_use]
    pub fn rest(&self) -> Self {
        Self {
            segments: Arc::clone(&self.segments),
            start: (self.start + 1).min(self.segments.len()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn len(&self) -> usize {
        self.segments.len() - self.start
    }

    /// The raw remaining suffix, segments joined with `/`
    pub fn suffix(&self) -> String {
        self.remaining_segments().join("/")
    }

    /// Remove `prefix` segment by segment
    ///
    /// Returns `None` when this path does not start with every segment of `prefix`.
    pub fn strip_prefix(&self, prefix: &Self) -> Option<Self> {
        if !self
            .remaining_segments()
            .starts_with(prefix.remaining_segments())
        {
            return None;
        }
        Some(Self {
            segments: Arc::clone(&self.segments),
            start: self.start + prefix.len(),
        })
    }

    /// First remaining segment that does not name a single directory entry
    ///
    /// `.` and `..` are rejected, and so is any segment that decoded to
    /// contain a separator or NUL.
    pub fn unsafe_segment(&self) -> Option<&str> {
        self.remaining_segments()
            .iter()
            .map(String::as_str)
            .find(|segment| !is_plain_segment(segment))
    }
}

fn is_plain_segment(segment: &str) -> bool {
    !matches!(segment, "." | "..") && !segment.contains(['/', '\\', '\0'])
}

impl FromIterator<String> for RoutingPath {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        let segments: Vec<String> = iter.into_iter().collect();
        Self {
            segments: Arc::from(segments),
            start: 0,
        }
    }
}

impl Default for RoutingPath {
    fn default() -> Self {
        Self::empty()
    }
}

impl PartialEq for RoutingPath {
    fn eq(&self, other: &Self) -> bool {
        self.remaining_segments() == other.remaining_segments()
    }
}

impl Eq for RoutingPath {}

impl Hash for RoutingPath {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.remaining_segments().hash(state);
    }
}

impl fmt::Debug for RoutingPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RoutingPath")
            .field(&self.remaining_segments())
            .finish()
    }
}

impl fmt::Display for RoutingPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.suffix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_segment_and_rest() {
        let path = RoutingPath::parse("a/b/c");
        assert_eq!(path.first_segment(), "a");
        assert_eq!(path.rest().remaining_segments(), ["b", "c"]);

        let consumed = path.rest().rest().rest();
        assert!(consumed.is_empty());
        assert_eq!(consumed, RoutingPath::empty());

        // the original is untouched
        assert_eq!(path.remaining_segments(), ["a", "b", "c"]);
    }

    #[test]
    fn test_empty_path_is_total() {
        let path = RoutingPath::empty();
        assert_eq!(path.first_segment(), "");
        assert!(path.rest().is_empty());
        assert_eq!(path.suffix(), "");
        assert_eq!(path.to_string(), "/");
    }

    #[test]
    fn test_parse_drops_empty_segments() {
        let path = RoutingPath::parse("//files///style.css/");
        assert_eq!(path.remaining_segments(), ["files", "style.css"]);
        assert_eq!(path.suffix(), "files/style.css");
        assert!(RoutingPath::parse("/").is_empty());
    }

    #[test]
    fn test_unsafe_segment() {
        assert_eq!(RoutingPath::parse("/a/../b").unsafe_segment(), Some(".."));
        assert_eq!(RoutingPath::parse("/a%2Fb").unsafe_segment(), Some("a/b"));
        assert_eq!(RoutingPath::parse("/a%5Cb").unsafe_segment(), Some("a\\b"));
        assert_eq!(RoutingPath::parse("/a:b.json/c.d").unsafe_segment(), None);
        assert_eq!(RoutingPath::empty().unsafe_segment(), None);
    }

    #[test]
    fn test_parse_percent_decodes() {
        let path = RoutingPath::parse("/report%20one/a%2Fb");
        assert_eq!(path.remaining_segments(), ["report one", "a/b"]);
    }

    #[test]
    fn test_strip_prefix() {
        let path = RoutingPath::parse("/viewer/api/overview.json");
        let mount = RoutingPath::parse("/viewer");

        let rest = path.strip_prefix(&mount).unwrap();
        assert_eq!(rest.remaining_segments(), ["api", "overview.json"]);
        assert!(path.strip_prefix(&RoutingPath::parse("/api")).is_none());
        assert_eq!(path.strip_prefix(&RoutingPath::empty()), Some(path.clone()));
    }

    #[test]
    fn test_strip_prefix_matches_whole_segments() {
        let path = RoutingPath::parse("/apis/x");
        assert!(path.strip_prefix(&RoutingPath::parse("/api")).is_none());
    }

    #[test]
    fn test_equality_ignores_consumed_segments() {
        let a = RoutingPath::parse("x/y").rest();
        let b = RoutingPath::from_segments(["y"]);
        assert_eq!(a, b);
    }
}
