//! HTTP protocol layer module
//!
//! HTTP helpers shared by the dispatcher and the routings, independent of
//! any particular routing.

pub mod cache;
pub mod mime;
pub mod response;

pub use cache::CachePolicy;
pub use response::{
    build_304_response, build_404_response, build_405_response, build_error_response,
    build_found_response, build_options_response, Body,
};
