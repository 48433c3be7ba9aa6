//! HTTP protocol layer module
//!
//! Range parsing, response bodies and response builders, kept apart from
//! routing and from the media handlers that use them.

pub mod body;
pub mod range;
pub mod response;

// Re-export commonly used types
pub use body::ResponseBody;
pub use range::{parse_range_header, RangeParseResult, ResolvedRange};
pub use response::{
    build_404_response, build_405_response, build_error_response, build_options_response,
    build_partial_response,
};
