// Server module entry point
// Listener setup, accept loop, per-connection tasks and shutdown signals

pub mod connection;
pub mod listener;
pub mod signal;

// `loop` is a keyword, so the file is mounted under another name
#[path = "loop.rs"]
pub mod server_loop;

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use crate::config::{AppState, ServerConfig};
use crate::error::StartupError;

pub use listener::create_listener;
pub use server_loop::start_server_loop;

/// A bound server, ready to accept connections
pub struct Server {
    listener: TcpListener,
    state: Arc<AppState>,
}

impl Server {
    /// Bind the configured address. Must be called from within a Tokio runtime.
    pub fn bind(config: ServerConfig) -> Result<Self, StartupError> {
        let addr = config.socket_addr()?;
        let listener =
            create_listener(addr).map_err(|source| StartupError::Bind { addr, source })?;
        Ok(Self {
            listener,
            state: Arc::new(AppState::new(config)),
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub fn config(&self) -> &ServerConfig {
        &self.state.config
    }

    /// Serve until `shutdown` resolves
    pub async fn run_until<F>(self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        start_server_loop(self.listener, self.state, shutdown).await;
    }
}
