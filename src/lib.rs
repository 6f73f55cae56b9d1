//! Local HTTP server for a report viewer UI and its data.
//!
//! Requests are resolved by a chain of [`routing::Routing`]s built at
//! startup; the first routing that finds data for the path answers.

pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod routing;
pub mod server;
pub mod viewer;

pub use error::{Error, Result};
