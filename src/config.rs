use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub db: DbConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub drive: DriveConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DbConfig {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// Local directory where photo binaries are written.
    #[serde(default = "default_storage_root")]
    pub root: PathBuf,
    /// Public relative prefix recorded in the store for local photos.
    #[serde(default = "default_public_prefix")]
    pub public_prefix: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: default_storage_root(),
            public_prefix: default_public_prefix(),
        }
    }
}

fn default_storage_root() -> PathBuf {
    PathBuf::from("uploads/retailers")
}

fn default_public_prefix() -> String {
    "/uploads/retailers".to_string()
}

/// Settings for the Drive remote-link resolver.
#[derive(Debug, Deserialize, Clone)]
pub struct DriveConfig {
    /// Substring marking a photo reference as Drive-hosted.
    #[serde(default = "default_marker")]
    pub marker: String,
    /// Base of the export/download-by-id URL form.
    #[serde(default = "default_export_base")]
    pub export_base: String,
    /// Hard timeout for the single fetch attempt.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            marker: default_marker(),
            export_base: default_export_base(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_marker() -> String {
    "drive.google.com".to_string()
}

fn default_export_base() -> String {
    "https://drive.google.com/uc".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub bind: String,
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    if config.drive.marker.trim().is_empty() {
        anyhow::bail!("drive.marker must not be empty");
    }

    if config.drive.timeout_secs == 0 {
        anyhow::bail!("drive.timeout_secs must be > 0");
    }

    if config.storage.public_prefix.is_empty() || !config.storage.public_prefix.starts_with('/') {
        anyhow::bail!("storage.public_prefix must start with '/'");
    }

    Ok(config)
}
