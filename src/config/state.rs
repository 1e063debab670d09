// Application state module
// Read-only values shared by every connection

use super::ServerConfig;
use crate::http::mime::MimeTable;

/// Application state
pub struct AppState {
    pub config: ServerConfig,
    pub mime: MimeTable,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            mime: MimeTable::new(),
        }
    }
}
