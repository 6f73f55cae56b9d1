//! Startup errors
//!
//! Everything that can stop the viewer before it serves its first request.
//! Request-time failures are [`FetchError`](crate::routing::FetchError)s.

use std::io;
use std::net::{AddrParseError, SocketAddr};

use crate::viewer::ViewerError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(#[from] ::config::ConfigError),

    #[error("invalid listen address '{addr}': {source}")]
    Address {
        addr: String,
        #[source]
        source: AddrParseError,
    },

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("invalid log level '{0}', expected error, warn, info or debug")]
    LogLevel(String),

    #[error("failed to load report: {0}")]
    Viewer(#[from] ViewerError),

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
