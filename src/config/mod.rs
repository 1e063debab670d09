// Configuration module entry point
// Builds the immutable server configuration and shared request state

mod args;
mod state;

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::StartupError;

pub use args::{parse_args, CliArgs};
pub use state::AppState;

pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_DIRECTORY: &str = "Build";
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";

/// Server configuration, fixed for the lifetime of the process
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Directory served as `/`; absolute and canonical once loaded
    pub root: PathBuf,
    pub port: u16,
    pub bind_address: String,
}

impl ServerConfig {
    /// Load configuration from positional command-line arguments
    pub fn load(args: &[String]) -> Result<Self, StartupError> {
        let cli = parse_args(args)?;
        Self::from_cli(&cli)
    }

    /// Layer CLI values over defaults, then validate the root directory
    pub fn from_cli(cli: &CliArgs) -> Result<Self, StartupError> {
        let settings = config::Config::builder()
            .set_default("root", DEFAULT_DIRECTORY)?
            .set_default("port", i64::from(DEFAULT_PORT))?
            .set_default("bind_address", DEFAULT_BIND_ADDRESS)?
            .set_override_option("port", cli.port.map(i64::from))?
            .set_override_option("root", cli.directory.clone())?
            .build()?;

        let raw: Self = settings.try_deserialize()?;
        Ok(Self {
            root: canonical_root(&raw.root)?,
            ..raw
        })
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, StartupError> {
        format!("{}:{}", self.bind_address, self.port)
            .parse()
            .map_err(|_| StartupError::BindAddress(self.bind_address.clone()))
    }
}

/// Resolve the served directory to an absolute canonical path
fn canonical_root(root: &Path) -> Result<PathBuf, StartupError> {
    let Ok(metadata) = std::fs::metadata(root) else {
        return Err(StartupError::MissingDirectory(root.to_path_buf()));
    };
    if !metadata.is_dir() {
        return Err(StartupError::NotADirectory(root.to_path_buf()));
    }
    root.canonicalize()
        .map_err(|_| StartupError::MissingDirectory(root.to_path_buf()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_with_existing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let cli = CliArgs {
            port: None,
            directory: Some(dir.path().to_string_lossy().into_owned()),
        };
        let cfg = ServerConfig::from_cli(&cli).unwrap();
        assert_eq!(cfg.port, DEFAULT_PORT);
        assert_eq!(cfg.bind_address, DEFAULT_BIND_ADDRESS);
        assert!(cfg.root.is_absolute());
        assert_eq!(cfg.root, dir.path().canonicalize().unwrap());
    }

    #[test]
    fn test_port_override() {
        let dir = tempfile::tempdir().unwrap();
        let cli = CliArgs {
            port: Some(9123),
            directory: Some(dir.path().to_string_lossy().into_owned()),
        };
        let cfg = ServerConfig::from_cli(&cli).unwrap();
        assert_eq!(cfg.port, 9123);
        assert_eq!(cfg.socket_addr().unwrap().port(), 9123);
    }

    #[test]
    fn test_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("does-not-exist");
        let cli = CliArgs {
            port: None,
            directory: Some(missing.to_string_lossy().into_owned()),
        };
        assert!(matches!(
            ServerConfig::from_cli(&cli),
            Err(StartupError::MissingDirectory(_))
        ));
    }

    #[test]
    fn test_root_is_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("index.html");
        std::fs::write(&file, "<html></html>").unwrap();
        let cli = CliArgs {
            port: None,
            directory: Some(file.to_string_lossy().into_owned()),
        };
        assert!(matches!(
            ServerConfig::from_cli(&cli),
            Err(StartupError::NotADirectory(_))
        ));
    }

    #[test]
    fn test_invalid_port_argument() {
        let args = vec!["99999".to_string()];
        assert!(matches!(
            ServerConfig::load(&args),
            Err(StartupError::InvalidPort(_))
        ));
    }
}
