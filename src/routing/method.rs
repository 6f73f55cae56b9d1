//! HTTP method module
//!
//! Closed set of methods a routing can accept, and a compact set type used by
//! the dispatcher to reject requests before any routing runs.

use hyper::Method;
use std::fmt;
use std::ops::BitOr;

/// HTTP methods known to the routing layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HttpMethod {
    Get,
    Head,
    Post,
    Put,
    Delete,
    Patch,
    Options,
}

impl HttpMethod {
    /// Every method, in `Allow` header order
    pub const ALL: [Self; 7] = [
        Self::Get,
        Self::Head,
        Self::Post,
        Self::Put,
        Self::Delete,
        Self::Patch,
        Self::Options,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Head => "HEAD",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Patch => "PATCH",
            Self::Options => "OPTIONS",
        }
    }

    /// Map a hyper method onto the closed set
    ///
    /// Returns `None` for methods this layer never serves (TRACE, CONNECT, extensions).
    pub fn from_hyper(method: &Method) -> Option<Self> {
        match method {
            &Method::GET => Some(Self::Get),
            &Method::HEAD => Some(Self::Head),
            &Method::POST => Some(Self::Post),
            &Method::PUT => Some(Self::Put),
            &Method::DELETE => Some(Self::Delete),
            &Method::PATCH => Some(Self::Patch),
            &Method::OPTIONS => Some(Self::Options),
            _ => None,
        }
    }

    const fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Set of HTTP methods
///
/// # Examples
/// ```
/// use report_viewer::routing::{HttpMethod, MethodSet};
///
/// let set = MethodSet::GET.with(HttpMethod::Post);
/// assert!(set.contains(HttpMethod::Get));
/// assert!(set.contains(HttpMethod::Post));
/// assert!(!set.contains(HttpMethod::Delete));
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MethodSet(u8);

impl MethodSet {
    pub const EMPTY: Self = Self(0);
    /// The default set of a routing
    pub const GET: Self = Self::only(HttpMethod::Get);

    pub const fn only(method: HttpMethod) -> Self {
        Self(method.bit())
    }

    #[must_use]
    pub const fn with(self, method: HttpMethod) -> Self {
        Self(self.0 | method.bit())
    }

    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub const fn contains(self, method: HttpMethod) -> bool {
        self.0 & method.bit() != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = HttpMethod> {
        HttpMethod::ALL
            .into_iter()
            .filter(move |method| self.contains(*method))
    }

    /// Render the value of an `Allow` header
    ///
    /// HEAD is implied by GET and OPTIONS is always answered by the dispatcher,
    /// so both are listed even when the routing does not declare them.
    pub fn allow_header(self) -> String {
        let mut effective = self.with(HttpMethod::Options);
        if self.contains(HttpMethod::Get) {
            effective = effective.with(HttpMethod::Head);
        }
        effective
            .iter()
            .map(HttpMethod::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl BitOr for MethodSet {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl From<HttpMethod> for MethodSet {
    fn from(method: HttpMethod) -> Self {
        Self::only(method)
    }
}

impl FromIterator<HttpMethod> for MethodSet {
    fn from_iter<I: IntoIterator<Item = HttpMethod>>(iter: I) -> Self {
        iter.into_iter().fold(Self::EMPTY, Self::with)
    }
}

impl fmt::Debug for MethodSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
