//! Local static file server for Unity WebGL builds.
//!
//! Serves a build directory with the MIME types WebGL loaders expect, picks
//! pre-compressed `.br`/`.gz` siblings when the client accepts them, and adds
//! the cross-origin isolation headers needed for `SharedArrayBuffer`.

pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;

pub use config::ServerConfig;
pub use error::{ResolveError, StartupError};
pub use server::Server;
