//! Configuration loading (.env, fastly.toml and global flags)

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::api::DEFAULT_ENDPOINT;
use crate::cli::GlobalArgs;

pub const ENV_API_TOKEN: &str = "FASTLY_API_TOKEN";
pub const ENV_API_ENDPOINT: &str = "FASTLY_API_ENDPOINT";
pub const ENV_API_TIMEOUT: &str = "FASTLY_API_TIMEOUT";
pub const ENV_SERVICE_ID: &str = "FASTLY_SERVICE_ID";
pub const ENV_PROJECT_DIR: &str = "FASTLY_PROJECT_DIR";

pub const MANIFEST_FILE: &str = "fastly.toml";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no API token found: pass --token or set FASTLY_API_TOKEN")]
    MissingToken,
}

/// Project directory (where .env and fastly.toml are)
pub fn project_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(ENV_PROJECT_DIR) {
        return PathBuf::from(dir);
    }
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

/// Load .env from the project directory. A missing file is fine.
pub fn load_env() -> Result<()> {
    let env_path = project_dir().join(".env");
    if !env_path.exists() {
        debug!(path = %env_path.display(), "no .env file");
        return Ok(());
    }
    dotenvy::from_path(&env_path)
        .with_context(|| format!("Failed to load .env from {:?}", env_path))?;
    Ok(())
}

/// Connection settings for the API client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub token: String,
    pub endpoint: String,
    pub timeout: Duration,
}

impl Settings {
    /// Flags win over environment variables, which win over defaults.
    pub fn resolve(globals: &GlobalArgs) -> Result<Self, ConfigError> {
        Self::from_sources(globals, |key| std::env::var(key).ok())
    }

    fn from_sources<F>(globals: &GlobalArgs, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = globals
            .token
            .clone()
            .or_else(|| env(ENV_API_TOKEN))
            .filter(|t| !t.trim().is_empty())
            .ok_or(ConfigError::MissingToken)?;

        let endpoint = globals
            .endpoint
            .clone()
            .or_else(|| env(ENV_API_ENDPOINT))
            .filter(|e| !e.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

        let timeout_secs = match globals.timeout {
            Some(secs) => secs,
            None => match env(ENV_API_TIMEOUT) {
                Some(raw) => raw.parse().unwrap_or_else(|_| {
                    warn!(value = %raw, "ignoring invalid FASTLY_API_TIMEOUT");
                    DEFAULT_TIMEOUT_SECS
                }),
                None => DEFAULT_TIMEOUT_SECS,
            },
        };

        Ok(Self {
            token,
            endpoint,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

// ============ Manifest ============

/// The subset of `fastly.toml` the CLI reads.
#[derive(Debug, Default, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub service_id: Option<String>,
}

/// Load `fastly.toml` from `dir`. Returns `Ok(None)` when there is none.
pub fn load_manifest(dir: &Path) -> Result<Option<Manifest>> {
    let path = dir.join(MANIFEST_FILE);
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {} from {:?}", MANIFEST_FILE, path))?;
    let manifest: Manifest = toml::from_str(&content)
        .with_context(|| format!("Failed to parse {}", MANIFEST_FILE))?;
    Ok(Some(manifest))
}
