//! Request handler module
//!
//! Assembles the routing chain at startup and dispatches each request to it.

pub mod chain;
pub mod router;

pub use chain::build_routing;
pub use router::{dispatch, handle_request, RequestHead};
