//! HTTP protocol layer module
//!
//! Protocol-level building blocks shared by the JSON API and the static file
//! server, decoupled from route semantics.

pub mod cache;
pub mod cors;
pub mod mime;
pub mod range;
pub mod response;

// Re-export commonly used items
pub use cors::with_cors;
pub use range::parse_range_header;
pub use response::{
    build_304_response, build_404_response, build_405_response, build_416_response,
    build_options_response, build_redirect_response,
};
