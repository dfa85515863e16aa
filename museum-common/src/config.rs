//! Configuration loading and root folder resolution
//!
//! Resolution priority for every setting:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. OS-dependent compiled default (fallback)
//!
//! A missing or unreadable TOML file is never fatal: it is logged and the
//! compiled defaults apply.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Database file created inside the root folder
pub const DATABASE_FILE: &str = "museum.db";

/// Default access token lifetime (minutes)
pub const DEFAULT_ACCESS_TOKEN_MINUTES: i64 = 5;

/// Default refresh token lifetime (minutes, one day)
pub const DEFAULT_REFRESH_TOKEN_MINUTES: i64 = 24 * 60;

/// Contents of `config.toml`; every key is optional
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct TomlConfig {
    pub root_folder: Option<PathBuf>,
    pub bind: Option<String>,
    pub port: Option<u16>,
    pub require_auth: Option<bool>,
    pub access_token_minutes: Option<i64>,
    pub refresh_token_minutes: Option<i64>,
}

impl TomlConfig {
    /// Parse TOML text
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }

    /// Load from an explicit path
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Load from the platform config location, falling back to defaults
    pub fn load_or_default(explicit: Option<&Path>) -> Self {
        let path = match explicit {
            Some(p) => Some(p.to_path_buf()),
            None => default_config_file(),
        };

        match path {
            Some(p) if p.exists() => match Self::load(&p) {
                Ok(cfg) => {
                    debug!("Loaded config file: {}", p.display());
                    cfg
                }
                Err(e) => {
                    warn!("Ignoring unreadable config file {}: {}", p.display(), e);
                    Self::default()
                }
            },
            Some(p) => {
                debug!("No config file at {}, using defaults", p.display());
                Self::default()
            }
            None => Self::default(),
        }
    }
}

/// Command-line overrides, already merged with environment variables by clap
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub root_folder: Option<PathBuf>,
    pub bind: Option<String>,
    pub port: Option<u16>,
    pub require_auth: Option<bool>,
}

/// Fully resolved service configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub root_folder: PathBuf,
    pub bind: String,
    pub port: u16,
    pub require_auth: bool,
    pub access_token_minutes: i64,
    pub refresh_token_minutes: i64,
}

impl ServiceConfig {
    /// Merge CLI overrides over the TOML file over compiled defaults
    pub fn resolve(cli: CliOverrides, file: TomlConfig) -> Self {
        let root_folder = cli
            .root_folder
            .or(file.root_folder)
            .unwrap_or_else(default_root_folder);

        Self {
            root_folder,
            bind: cli.bind.or(file.bind).unwrap_or_else(|| "127.0.0.1".to_string()),
            port: cli.port.or(file.port).unwrap_or(8000),
            require_auth: cli.require_auth.or(file.require_auth).unwrap_or(false),
            access_token_minutes: file
                .access_token_minutes
                .filter(|m| *m > 0)
                .unwrap_or(DEFAULT_ACCESS_TOKEN_MINUTES),
            refresh_token_minutes: file
                .refresh_token_minutes
                .filter(|m| *m > 0)
                .unwrap_or(DEFAULT_REFRESH_TOKEN_MINUTES),
        }
    }

    /// Path of the SQLite database inside the root folder
    pub fn database_path(&self) -> PathBuf {
        self.root_folder.join(DATABASE_FILE)
    }

    /// Create the root folder if it does not exist
    pub fn ensure_root_folder(&self) -> Result<()> {
        std::fs::create_dir_all(&self.root_folder)?;
        Ok(())
    }

    /// Socket address string for the listener
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self::resolve(CliOverrides::default(), TomlConfig::default())
    }
}

/// Platform config file path (`~/.config/museum/config.toml` on Linux)
pub fn default_config_file() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("museum").join("config.toml"))
}

/// Get OS-dependent default root folder path
pub fn default_root_folder() -> PathBuf {
    if cfg!(target_os = "linux") {
        // ~/.local/share/museum (or /var/lib/museum for system-wide)
        dirs::data_local_dir()
            .map(|d| d.join("museum"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/museum"))
    } else if cfg!(target_os = "macos") {
        dirs::data_dir()
            .map(|d| d.join("museum"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/museum"))
    } else if cfg!(target_os = "windows") {
        dirs::data_local_dir()
            .map(|d| d.join("museum"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\museum"))
    } else {
        PathBuf::from("./museum_data")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_partial_toml() {
        let cfg = TomlConfig::parse("port = 9000\nrequire_auth = true\n").unwrap();
        assert_eq!(cfg.port, Some(9000));
        assert_eq!(cfg.require_auth, Some(true));
        assert!(cfg.root_folder.is_none());
    }

    #[test]
    fn test_parse_rejects_bad_types() {
        assert!(TomlConfig::parse("port = \"eighty\"").is_err());
    }

    #[test]
    fn test_non_positive_token_lifetimes_fall_back() {
        let file = TomlConfig {
            access_token_minutes: Some(0),
            refresh_token_minutes: Some(-5),
            ..Default::default()
        };
        let cfg = ServiceConfig::resolve(CliOverrides::default(), file);
        assert_eq!(cfg.access_token_minutes, DEFAULT_ACCESS_TOKEN_MINUTES);
        assert_eq!(cfg.refresh_token_minutes, DEFAULT_REFRESH_TOKEN_MINUTES);
    }
}
