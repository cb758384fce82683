//! Configuration loading and defaults.
//!
//! Stored as TOML under the user config directory
//! (`~/.config/akr/config.toml` on Linux). Missing file or missing fields
//! fall back to defaults; CLI flags override loaded values.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub query: QueryConfig,
    pub output: OutputConfig,
}

/// Remote query service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Host (IP or name) of the capture service.
    pub host: String,
    /// PEM client certificate presented during the TLS handshake.
    pub client_cert: PathBuf,
    /// PEM private key for the client certificate.
    pub client_key: PathBuf,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Accept invalid or self-signed server certificates. The historical
    /// runs disabled verification unconditionally; here it is an explicit
    /// opt-in and off by default.
    pub danger_accept_invalid_certs: bool,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            host: "34.195.208.56".to_string(),
            client_cert: PathBuf::from("client.crt"),
            client_key: PathBuf::from("client.key"),
            timeout_secs: 30,
            danger_accept_invalid_certs: false,
        }
    }
}

/// Artifact locations for a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory the artifacts are written into.
    pub directory: PathBuf,
    pub commands: String,
    pub responses: String,
    pub transcript: String,
    pub errors: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            commands: "commands.txt".to_string(),
            responses: "responses.json".to_string(),
            transcript: "responses.md".to_string(),
            errors: "error_responses.out".to_string(),
        }
    }
}

impl Config {
    /// Path of the config file inside the user config directory.
    pub fn config_path() -> Result<PathBuf> {
        let dir = dirs::config_dir().context("could not determine user config directory")?;
        Ok(dir.join("akr").join("config.toml"))
    }

    /// Load from the default location; a missing file yields defaults.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load from an explicit path; a missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let config = toml::from_str(&content)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Write the config to the default location, creating directories as
    /// needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create config directory: {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self).context("failed to serialize config")?;
        fs::write(&path, content)
            .with_context(|| format!("failed to write config file: {}", path.display()))?;
        Ok(())
    }
}
