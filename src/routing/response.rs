//! Response data module
//!
//! Outcome of a routing fetch. Found data carries its payload, not-found and
//! error outcomes never do.

use hyper::body::Bytes;
use hyper::StatusCode;
use std::fmt;
use std::io;

/// Tag of a [`ResponseData`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseKind {
    Found,
    NotFound,
    Error,
}

/// Result of [`Routing::fetch_data`](super::Routing::fetch_data)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseData {
    /// The routing resolved the path
    Found {
        body: Bytes,
        content_type: &'static str,
    },
    /// The path is not owned by the routing, the next routing may try
    NotFound,
    /// The routing owns the path but could not produce the data
    Error(FetchError),
}

impl ResponseData {
    pub fn found(body: impl Into<Bytes>, content_type: &'static str) -> Self {
        Self::Found {
            body: body.into(),
            content_type,
        }
    }

    pub const fn not_found() -> Self {
        Self::NotFound
    }

    pub const fn error(error: FetchError) -> Self {
        Self::Error(error)
    }

    pub const fn kind(&self) -> ResponseKind {
        match self {
            Self::Found { .. } => ResponseKind::Found,
            Self::NotFound => ResponseKind::NotFound,
            Self::Error(_) => ResponseKind::Error,
        }
    }

    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }

    pub const fn body(&self) -> Option<&Bytes> {
        match self {
            Self::Found { body, .. } => Some(body),
            _ => None,
        }
    }

    pub const fn content_type(&self) -> Option<&'static str> {
        match self {
            Self::Found { content_type, .. } => Some(*content_type),
            _ => None,
        }
    }
}

impl From<FetchError> for ResponseData {
    fn from(error: FetchError) -> Self {
        Self::Error(error)
    }
}

/// Category of a failed fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchErrorKind {
    /// The path was recognised but is malformed (bad identifier, traversal)
    BadRequest,
    /// The path was recognised but the artifact behind it does not exist
    Missing,
    /// Reading or encoding the data failed
    Internal,
}

impl FetchErrorKind {
    pub const fn status_code(self) -> StatusCode {
        match self {
            Self::BadRequest => StatusCode::BAD_REQUEST,
            Self::Missing => StatusCode::NOT_FOUND,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for FetchErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::BadRequest => "bad request",
            Self::Missing => "missing",
            Self::Internal => "internal error",
        })
    }
}

/// Detail of an error outcome
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct FetchError {
    kind: FetchErrorKind,
    message: String,
}

impl FetchError {
    pub fn new(kind: FetchErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(FetchErrorKind::BadRequest, message)
    }

    pub fn missing(message: impl Into<String>) -> Self {
        Self::new(FetchErrorKind::Missing, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(FetchErrorKind::Internal, message)
    }

    /// Classify an I/O failure that happened while reading `what`
    pub fn from_io(what: &str, error: &io::Error) -> Self {
        let kind = match error.kind() {
            io::ErrorKind::NotFound => FetchErrorKind::Missing,
            io::ErrorKind::InvalidInput | io::ErrorKind::InvalidData => {
                FetchErrorKind::BadRequest
            }
            _ => FetchErrorKind::Internal,
        };
        Self::new(kind, format!("failed to read {what}: {error}"))
    }

    pub const fn kind(&self) -> FetchErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn status_code(&self) -> StatusCode {
        self.kind.status_code()
    }
}
