use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::PearlError;

/// Overrides the database location when `--db` is not given.
pub const DB_ENV: &str = "PEARL_DB";
pub const HOST_ENV: &str = "PEARL_HOST";
pub const PORT_ENV: &str = "PEARL_PORT";

pub const DATA_DIR: &str = ".pearl";
pub const DB_FILE: &str = "pearl.db";
pub const CONFIG_FILE: &str = "config.json";

/// Settings read from `config.json` next to the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Fallback `tracing` filter when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            log_filter: "info".to_string(),
        }
    }
}

impl Config {
    /// Load the config file, or defaults if it does not exist.
    pub fn load(path: &Path) -> Result<Self, PearlError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path)
            .map_err(|e| PearlError::config(format!("Cannot read {}: {e}", path.display())))?;
        serde_json::from_str(&text)
            .map_err(|e| PearlError::config(format!("Invalid config {}: {e}", path.display())))
    }

    /// Write the defaults unless a config file is already there.
    pub fn write_default(path: &Path) -> Result<(), PearlError> {
        if path.exists() {
            return Ok(());
        }
        let text = serde_json::to_string_pretty(&Self::default())
            .map_err(|e| PearlError::config(e.to_string()))?;
        fs::write(path, text)
            .map_err(|e| PearlError::config(format!("Cannot write {}: {e}", path.display())))
    }

    pub fn with_env(self) -> Result<Self, PearlError> {
        self.with_overrides(env::var(HOST_ENV).ok(), env::var(PORT_ENV).ok())
    }

    pub fn with_overrides(mut self, host: Option<String>, port: Option<String>) -> Result<Self, PearlError> {
        if let Some(host) = host.filter(|h| !h.trim().is_empty()) {
            self.host = host.trim().to_string();
        }
        if let Some(port) = port {
            self.port = port
                .trim()
                .parse()
                .map_err(|_| PearlError::config(format!("Invalid port: {port}")))?;
        }
        Ok(self)
    }
}

/// Database path: explicit flag, then `PEARL_DB`, then `./.pearl/pearl.db`.
pub fn db_path(flag: Option<&Path>) -> Result<PathBuf, PearlError> {
    if let Some(path) = flag {
        return Ok(path.to_path_buf());
    }
    if let Some(path) = env::var_os(DB_ENV).filter(|p| !p.is_empty()) {
        return Ok(PathBuf::from(path));
    }
    let cwd = env::current_dir().map_err(|e| PearlError::config(e.to_string()))?;
    Ok(cwd.join(DATA_DIR).join(DB_FILE))
}

/// `config.json` lives in the same directory as the database.
pub fn config_path(db_path: &Path) -> PathBuf {
    match db_path.parent() {
        Some(dir) => dir.join(CONFIG_FILE),
        None => PathBuf::from(CONFIG_FILE),
    }
}
