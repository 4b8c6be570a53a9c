//! Configuration management.
//!
//! Defaults → optional TOML config file → environment/CLI overrides
//! (applied by the caller). Read-only after startup.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default server base URL when nothing else is configured.
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8000";

/// Default request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT: u64 = 30;

/// Application settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Base URL of the material library server.
    pub server_url: String,
    /// Request timeout in seconds.
    pub request_timeout: u64,
    /// Directory for client-local data (log file).
    pub data_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        let data_dir = dirs::data_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("zhibi");

        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            data_dir,
        }
    }
}

impl Settings {
    /// Path of the log file used while the TUI owns the terminal.
    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join("zhibi.log")
    }

    /// Ensure the data directory exists.
    pub fn ensure_directories(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.data_dir)?;
        Ok(())
    }
}

/// Configuration file structure (`~/.config/zhibi/config.toml`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the material library server.
    #[serde(default)]
    pub server_url: Option<String>,
    /// Request timeout in seconds.
    #[serde(default)]
    pub request_timeout: Option<u64>,
    /// Directory for client-local data.
    #[serde(default)]
    pub data_dir: Option<String>,
}

impl Config {
    /// Path where the config file is looked up.
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("zhibi").join("config.toml"))
    }

    /// Load the config file, falling back to defaults when it is
    /// missing or unreadable.
    pub fn load() -> Self {
        let Some(path) = Self::path() else {
            return Self::default();
        };
        match fs::read_to_string(&path) {
            Ok(text) => match toml::from_str(&text) {
                Ok(config) => config,
                Err(err) => {
                    tracing::warn!("Ignoring malformed config {}: {}", path.display(), err);
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    /// Apply configuration to settings.
    pub fn apply_to_settings(&self, settings: &mut Settings) {
        if let Some(ref server_url) = self.server_url {
            settings.server_url = server_url.clone();
        }
        if let Some(timeout) = self.request_timeout {
            settings.request_timeout = timeout;
        }
        if let Some(ref data_dir) = self.data_dir {
            let path = shellexpand::tilde(data_dir);
            settings.data_dir = PathBuf::from(path.as_ref());
        }
    }
}

/// Load settings from the config file over defaults.
pub fn load_settings() -> Settings {
    let config = Config::load();
    let mut settings = Settings::default();
    config.apply_to_settings(&mut settings);
    settings
}
