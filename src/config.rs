use std::path::{Path, PathBuf};
use std::time::Duration;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::error::VcError;

const CONFIG_DIR: &str = "vc";
const CONFIG_FILE: &str = "config.toml";
const DEFAULT_URL: &str = "http://127.0.0.1:8200";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const CONFIG_ENV: &str = "VC_CONFIG";
pub const ADDR_ENV: &str = "VAULT_ADDR";
pub const TOKEN_ENV: &str = "VAULT_TOKEN";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_url")]
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authentication: Option<Authentication>,
}

/// The `[authentication]` section. Every field is optional in the file so
/// `vc login` can say exactly which one is missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Authentication {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub auth_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    /// Mount path of the auth backend. Required for `ldap`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

fn default_url() -> String {
    DEFAULT_URL.into()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            url: default_url(),
            token: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            authentication: None,
        }
    }
}

impl Config {
    pub fn token(&self) -> Option<SecretString> {
        self.token
            .as_ref()
            .filter(|t| !t.is_empty())
            .map(|t| SecretString::new(t.clone()))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Layer `VAULT_ADDR` / `VAULT_TOKEN` style overrides on top of the file.
    pub fn apply_overrides(&mut self, addr: Option<String>, token: Option<String>) {
        if let Some(addr) = addr.filter(|a| !a.is_empty()) {
            self.url = addr;
        }
        if let Some(token) = token.filter(|t| !t.is_empty()) {
            self.token = Some(token);
        }
    }
}

/// Resolve the config file location: explicit flag, then `$VC_CONFIG`, then
/// the user's config directory.
pub fn config_path(explicit: Option<&Path>) -> Result<PathBuf, VcError> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    if let Ok(path) = std::env::var(CONFIG_ENV) {
        return Ok(PathBuf::from(path));
    }

    let dir = dirs::config_dir()
        .ok_or_else(|| VcError::Config("could not determine the user config directory".into()))?;
    Ok(dir.join(CONFIG_DIR).join(CONFIG_FILE))
}

/// Read the config file. A missing file yields the defaults.
pub fn read(path: &Path) -> Result<Config, VcError> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let raw = std::fs::read_to_string(path)?;
    toml::from_str(&raw).map_err(|e| VcError::Config(format!("{}: {}", path.display(), e)))
}

/// Read the config file and apply environment overrides.
pub fn load(path: &Path) -> Result<Config, VcError> {
    let mut config = read(path)?;
    config.apply_overrides(std::env::var(ADDR_ENV).ok(), std::env::var(TOKEN_ENV).ok());
    Ok(config)
}

/// Write config to `path`, creating parent directories as needed.
pub fn write(path: &Path, config: &Config) -> Result<(), VcError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let raw = toml::to_string(config).map_err(|e| VcError::Config(e.to_string()))?;
    std::fs::write(path, raw)?;
    Ok(())
}

/// Persist a fresh client token, leaving the rest of the file untouched.
/// Environment overrides are never written back.
pub fn update_token(path: &Path, token: &str) -> Result<(), VcError> {
    let mut config = read(path)?;
    config.token = Some(token.to_string());
    write(path, &config)
}
