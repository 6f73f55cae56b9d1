//! Narrow view of an inbound request, the only part of it routings may see.

use super::method::HttpMethod;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingRequest {
    method: HttpMethod,
    path: String,
    query: Option<String>,
}

impl RoutingRequest {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: None,
        }
    }

    /// Shorthand for a GET request
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    #[must_use]
    pub fn with_query(mut self, query: Option<impl Into<String>>) -> Self {
        self.query = query.map(Into::into);
        self
    }

    pub const fn method(&self) -> HttpMethod {
        self.method
    }

    /// Full request path, before the mount prefix was stripped
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Query string without the leading `?`
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }
}
