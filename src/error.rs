//! Error types
//!
//! Startup errors are fatal and reported by `main`; resolve errors never leave
//! the request that produced them.

use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Failure before the listener is accepting connections
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("invalid port '{0}': expected an integer between 1 and 65535")]
    InvalidPort(String),

    #[error("directory '{}' does not exist", .0.display())]
    MissingDirectory(PathBuf),

    #[error("'{}' is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("invalid configuration: {0}")]
    Config(#[from] config::ConfigError),

    #[error("invalid bind address '{0}'")]
    BindAddress(String),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("failed to start runtime: {0}")]
    Runtime(#[source] io::Error),
}

/// Per-request resolution failure
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// Path escapes the served root
    #[error("forbidden")]
    Forbidden,

    #[error("not found")]
    NotFound,

    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
}

impl ResolveError {
    /// Map a filesystem error onto the request outcome
    pub fn from_fs(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => Self::NotFound,
            io::ErrorKind::PermissionDenied => Self::Forbidden,
            _ => Self::Io(err),
        }
    }
}
