//! Request handler module
//!
//! Routes requests onto the fixed media targets and serves byte ranges of
//! them.

pub mod media;
pub mod router;

// Re-export main entry point
pub use router::{handle_request, RequestContext};
