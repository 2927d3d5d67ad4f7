//! Shared configuration for MoonDash front-ends.
//!
//! TOML config file, `MOONDASH_*` environment overrides, keyring-backed
//! session tokens, and translation to `moondash_core::ClientConfig`.
//! The CLI adds flag-aware wrappers on top.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use moondash_core::{ClientConfig, TlsVerification};

/// Keyring service name for stored session tokens.
const KEYRING_SERVICE: &str = "moondash";

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:1111";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Gateway base address.
    pub backend_url: String,

    /// Authenticable collection used for login and signup.
    #[serde(default = "default_auth_entity")]
    pub auth_entity: String,

    #[serde(default)]
    pub defaults: Defaults,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.into(),
            auth_entity: default_auth_entity(),
            defaults: Defaults::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    /// Accept self-signed certificates.
    #[serde(default)]
    pub insecure: bool,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            insecure: false,
            timeout: default_timeout(),
        }
    }
}

fn default_auth_entity() -> String {
    "user".into()
}
fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "moondash", "moondash").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("moondash");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_from(&config_path())
}

/// Load from an explicit file, with `MOONDASH_*` variables on top.
///
/// Nested keys use a double underscore: `MOONDASH_DEFAULTS__TIMEOUT`.
pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("MOONDASH_").split("__"));

    let config: Config = figment.extract()?;
    debug!(path = %path.display(), backend = %config.backend_url, "config loaded");
    Ok(config)
}

/// Load config, falling back to defaults when the file or environment
/// cannot be parsed. For display only; connections use [`load_config`].
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_to(cfg, &path)?;
    Ok(path)
}

pub fn save_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Translation ─────────────────────────────────────────────────────

/// Build a `ClientConfig` from the loaded file -- no CLI overrides.
pub fn to_client_config(cfg: &Config) -> Result<ClientConfig, ConfigError> {
    let mut client =
        ClientConfig::from_url_str(&cfg.backend_url).map_err(|e| ConfigError::Validation {
            field: "backend_url".into(),
            reason: e.to_string(),
        })?;

    if cfg.auth_entity.trim().is_empty() {
        return Err(ConfigError::Validation {
            field: "auth_entity".into(),
            reason: "must not be empty".into(),
        });
    }
    client.auth_entity.clone_from(&cfg.auth_entity);
    client.timeout = Duration::from_secs(cfg.defaults.timeout);
    client.tls = if cfg.defaults.insecure {
        TlsVerification::DangerAcceptInvalid
    } else {
        TlsVerification::SystemDefaults
    };
    Ok(client)
}

// ── Session token storage ───────────────────────────────────────────
//
// Tokens are keyed by backend URL so switching backends never reuses
// another backend's session.

fn token_entry(backend: &url::Url) -> Result<keyring::Entry, ConfigError> {
    Ok(keyring::Entry::new(KEYRING_SERVICE, backend.as_str())?)
}

/// Look up the stored session token for `backend`, if any.
pub fn load_token(backend: &url::Url) -> Option<SecretString> {
    let entry = token_entry(backend).ok()?;
    match entry.get_password() {
        Ok(token) => Some(SecretString::from(token)),
        Err(e) => {
            debug!(backend = %backend, error = %e, "no stored session token");
            None
        }
    }
}

pub fn store_token(backend: &url::Url, token: &SecretString) -> Result<(), ConfigError> {
    token_entry(backend)?.set_password(token.expose_secret())?;
    debug!(backend = %backend, "session token stored");
    Ok(())
}

/// Forget the stored token. Missing entries are not an error.
pub fn clear_token(backend: &url::Url) -> Result<(), ConfigError> {
    match token_entry(backend)?.delete_credential() {
        Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.defaults, Defaults::default());
        assert_eq!(cfg.auth_entity, "user");
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "backend_url = \"https://moon.example\"\n\n[defaults]\ntimeout = 5\ninsecure = true\n",
        )
        .unwrap();

        let cfg = load_from(&path).unwrap();
        let client = to_client_config(&cfg).unwrap();

        assert_eq!(client.timeout, Duration::from_secs(5));
        assert_eq!(client.tls, TlsVerification::DangerAcceptInvalid);
        assert_eq!(cfg.defaults.output, "table");
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "backend_url = [unterminated\n").unwrap();

        assert!(matches!(load_from(&path), Err(ConfigError::Figment(_))));
    }

    #[test]
    fn save_then_load_preserves_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let cfg = Config {
            backend_url: "http://10.0.0.5:1111".into(),
            ..Config::default()
        };

        save_to(&cfg, &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("backend_url = \"http://10.0.0.5:1111\""));
    }

    #[test]
    fn invalid_backend_url_is_rejected() {
        let cfg = Config {
            backend_url: "moon base alpha".into(),
            ..Config::default()
        };
        assert!(matches!(
            to_client_config(&cfg),
            Err(ConfigError::Validation { ref field, .. }) if field == "backend_url"
        ));
    }
}
