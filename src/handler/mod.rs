//! Request handler module
//!
//! Method dispatch, path resolution and static file responses.

pub mod resolver;
pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::handle_request;
