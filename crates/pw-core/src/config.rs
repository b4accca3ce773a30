//! Application configuration types.
//!
//! The top-level [`Config`] struct is deserialized from TOML. Every section
//! defaults sensibly so a completely empty file is valid.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Locations searched, in order, when no config path is given.
const DEFAULT_PATHS: &[&str] = &["./photowall.toml", "~/.config/photowall/config.toml"];

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
}

impl Config {
    /// Deserialize a `Config` from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        toml::from_str(toml_str).map_err(|e| Error::Config(format!("parse error: {e}")))
    }

    /// Load configuration from a file that must exist.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;
        Self::from_toml(&contents)
    }

    /// Load an explicit config file, or search the default locations and fall
    /// back to built-in defaults when none exists.
    pub fn load_or_default(custom_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = custom_path {
            return Self::load(path);
        }

        for path_str in DEFAULT_PATHS {
            let expanded = shellexpand::tilde(path_str);
            let path = Path::new(expanded.as_ref());
            if path.exists() {
                tracing::info!("Loading config from {}", path.display());
                return Self::load(path);
            }
        }

        tracing::info!("No config file found; using defaults");
        Ok(Self::default())
    }

    /// Return a list of validation warnings (non-fatal issues).
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.server.port == 0 {
            warnings.push("server.port is 0; a random port will be assigned".into());
        }
        if self.server.db_path.as_os_str().is_empty() {
            warnings.push("server.db_path is empty".into());
        }
        if self.server.upload_dir.as_os_str().is_empty() {
            warnings.push("server.upload_dir is empty; uploads go to the working directory".into());
        }
        if let Some(ref dir) = self.server.static_dir {
            if !dir.join("index.html").exists() {
                warnings.push(format!(
                    "server.static_dir {} has no index.html; GET / will return 404",
                    dir.display()
                ));
            }
        }
        if self.server.max_upload_bytes == Some(0) {
            warnings.push("server.max_upload_bytes is 0; every upload will be rejected".into());
        }

        warnings
    }
}

/// HTTP server and storage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// SQLite database file.
    pub db_path: PathBuf,
    /// Flat directory holding uploaded files.
    pub upload_dir: PathBuf,
    /// Directory containing the landing page `index.html`.
    pub static_dir: Option<PathBuf>,
    /// Request body cap for uploads. `None` leaves uploads unlimited.
    pub max_upload_bytes: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8081,
            db_path: PathBuf::from("photo.db"),
            upload_dir: PathBuf::from("./uploads"),
            static_dir: Some(PathBuf::from("./static")),
            max_upload_bytes: None,
        }
    }
}
