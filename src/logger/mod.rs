//! Logger module
//!
//! Provides logging utilities for the server:
//! - Server lifecycle logging
//! - Access logging (stdout)
//! - Error and warning logging (stderr)

mod format;

pub use format::AccessLogEntry;

use crate::config::ServerConfig;
use std::net::SocketAddr;

fn write_info(message: &str) {
    println!("{message}");
}

fn write_error(message: &str) {
    eprintln!("{message}");
}

pub fn log_server_start(addr: &SocketAddr, config: &ServerConfig) {
    write_info("======================================");
    write_info("WebGL build server started");
    write_info(&format!("Serving from: {}", config.root.display()));
    write_info(&format!("Listening on: http://{addr}"));
    if addr.ip().is_unspecified() {
        write_info(&format!("Open: http://localhost:{}", addr.port()));
    }
    write_info("Cross-origin isolation: COOP same-origin, COEP require-corp");
    write_info("Press Ctrl+C to stop the server");
    write_info("======================================\n");
}

pub fn log_shutdown(signal: &str) {
    write_info(&format!("\n[SIGNAL] {signal} received, server stopped"));
}

pub fn log_startup_error(err: &impl std::fmt::Display) {
    write_error(&format!("[FATAL] {err}"));
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write_error(&format!("[ERROR] Failed to serve connection: {err:?}"));
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_error(&format!("[WARN] {message}"));
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry) {
    write_info(&entry.format());
}
