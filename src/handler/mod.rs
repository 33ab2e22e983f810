//! Request handler module
//!
//! Routes each request either to the JSON API or to the static frontend.

pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::handle_request;
