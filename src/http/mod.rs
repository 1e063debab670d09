//! HTTP protocol layer module
//!
//! Content negotiation, MIME detection, conditional requests and response
//! builders, kept apart from filesystem resolution.

pub mod cache;
pub mod encoding;
pub mod headers;
pub mod mime;
pub mod response;

// Re-export commonly used types
pub use encoding::{AcceptEncoding, ContentEncoding};
pub use response::{
    build_304_response, build_403_response, build_404_response, build_405_response,
    build_500_response, build_options_response, build_redirect_response, ResponseBody,
};
