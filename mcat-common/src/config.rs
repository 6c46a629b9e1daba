//! Configuration loading and root folder resolution
//!
//! Resolution priority for every setting:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 5780;

/// Default bind address (loopback only)
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1";

/// Default per-request timeout
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;

/// Default SQLite busy timeout before a lock wait is reported as an error
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Environment variable naming the root folder
pub const ROOT_FOLDER_ENV: &str = "MCAT_ROOT_FOLDER";

/// Database file name inside the root folder
pub const DATABASE_FILE_NAME: &str = "mcat.db";

/// Contents of `config.toml`. Every key is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    pub root_folder: Option<PathBuf>,
    pub bind_address: Option<String>,
    pub port: Option<u16>,
    pub request_timeout_ms: Option<u64>,
    pub busy_timeout_ms: Option<u64>,
}

impl TomlConfig {
    /// Parse TOML text
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Invalid config file: {}", e)))
    }
}

/// Load the TOML config file.
///
/// An explicit path must exist. Without one the platform locations are probed
/// and a missing file yields the empty (all defaults) config.
pub fn load_toml_config(explicit_path: Option<&Path>) -> Result<TomlConfig> {
    let path = match explicit_path {
        Some(path) => {
            if !path.exists() {
                return Err(Error::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            path.to_path_buf()
        }
        None => match find_config_file() {
            Some(path) => path,
            None => {
                debug!("No config file found, using defaults");
                return Ok(TomlConfig::default());
            }
        },
    };

    info!("Loading config file: {}", path.display());
    let content = std::fs::read_to_string(&path)?;
    TomlConfig::parse(&content)
}

/// Probe `~/.config/mcat/config.toml`, then `/etc/mcat/config.toml`
fn find_config_file() -> Option<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("mcat").join("config.toml"));
    if let Some(path) = user_config {
        if path.exists() {
            return Some(path);
        }
    }

    if cfg!(unix) {
        let system_config = PathBuf::from("/etc/mcat/config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}

/// Resolve the root folder holding the database file
pub fn resolve_root_folder(
    cli_arg: Option<&Path>,
    env_var_name: &str,
    toml_config: &TomlConfig,
) -> PathBuf {
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    if let Ok(path) = std::env::var(env_var_name) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    if let Some(path) = &toml_config.root_folder {
        return path.clone();
    }

    get_default_root_folder()
}

/// OS-dependent default root folder
fn get_default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("mcat"))
        .unwrap_or_else(|| PathBuf::from("./mcat_data"))
}

/// Values supplied on the command line (clap already folds in their env vars)
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub root_folder: Option<PathBuf>,
    pub bind_address: Option<String>,
    pub port: Option<u16>,
}

/// Fully resolved server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub root_folder: PathBuf,
    pub bind_address: String,
    pub port: u16,
    pub request_timeout: Duration,
    pub busy_timeout: Duration,
}

impl ServerConfig {
    /// Merge command line, environment, TOML and defaults
    pub fn resolve(cli: &CliOverrides, toml_config: &TomlConfig) -> Self {
        let root_folder =
            resolve_root_folder(cli.root_folder.as_deref(), ROOT_FOLDER_ENV, toml_config);

        let bind_address = cli
            .bind_address
            .clone()
            .or_else(|| toml_config.bind_address.clone())
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());

        let port = cli.port.or(toml_config.port).unwrap_or(DEFAULT_PORT);

        let request_timeout = Duration::from_millis(
            toml_config
                .request_timeout_ms
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_MS),
        );
        let busy_timeout = Duration::from_millis(
            toml_config.busy_timeout_ms.unwrap_or(DEFAULT_BUSY_TIMEOUT_MS),
        );

        Self {
            root_folder,
            bind_address,
            port,
            request_timeout,
            busy_timeout,
        }
    }

    /// Path of the SQLite database file
    pub fn database_path(&self) -> PathBuf {
        self.root_folder.join(DATABASE_FILE_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_partial_toml() {
        let config = TomlConfig::parse("port = 8080\nrequest_timeout_ms = 500\n").unwrap();
        assert_eq!(config.port, Some(8080));
        assert_eq!(config.request_timeout_ms, Some(500));
        assert!(config.root_folder.is_none());
    }

    #[test]
    fn test_parse_invalid_toml() {
        let result = TomlConfig::parse("port = \"not a number\"");
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_cli_beats_toml() {
        let toml_config = TomlConfig {
            root_folder: Some(PathBuf::from("/from/toml")),
            port: Some(9000),
            ..Default::default()
        };
        let cli = CliOverrides {
            root_folder: Some(PathBuf::from("/from/cli")),
            port: Some(7000),
            ..Default::default()
        };

        let config = ServerConfig::resolve(&cli, &toml_config);
        assert_eq!(config.root_folder, PathBuf::from("/from/cli"));
        assert_eq!(config.port, 7000);
        assert_eq!(config.database_path(), PathBuf::from("/from/cli/mcat.db"));
    }

    #[test]
    fn test_defaults_when_nothing_set() {
        let config = ServerConfig::resolve(
            &CliOverrides {
                root_folder: Some(PathBuf::from("/tmp/mcat")),
                ..Default::default()
            },
            &TomlConfig::default(),
        );
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.bind_address, DEFAULT_BIND_ADDRESS);
        assert_eq!(
            config.request_timeout,
            Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS)
        );
        assert_eq!(
            config.busy_timeout,
            Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS)
        );
    }
}
