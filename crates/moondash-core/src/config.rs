// ── Runtime client configuration ──
//
// Describes *where* the backend lives and how to talk to it. Never
// touches disk: the front-end builds a `ClientConfig` (usually via
// moondash-config) and hands it in.

use std::time::Duration;

use url::Url;

use crate::error::CoreError;

/// TLS verification strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Skip verification (self-signed local backends).
    DangerAcceptInvalid,
}

/// Configuration for one MoonDash backend.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Gateway base address (e.g., `http://localhost:1111`).
    pub backend_url: Url,
    /// Authenticable entity used for login/signup/me.
    pub auth_entity: String,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Request timeout.
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(backend_url: Url) -> Self {
        Self {
            backend_url,
            auth_entity: moondash_api::DEFAULT_AUTH_ENTITY.to_owned(),
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Parse the base address from text.
    pub fn from_url_str(raw: &str) -> Result<Self, CoreError> {
        let url = Url::parse(raw).map_err(|e| CoreError::Config {
            message: format!("invalid backend URL '{raw}': {e}"),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(CoreError::Config {
                message: format!("backend URL must be http(s), got '{raw}'"),
            });
        }
        Ok(Self::new(url))
    }

    /// The external admin console: `<base>/admin`.
    pub fn admin_console_url(&self) -> Result<Url, CoreError> {
        let base = self.backend_url.as_str().trim_end_matches('/');
        Url::parse(&format!("{base}/admin")).map_err(|e| CoreError::Config {
            message: format!("cannot derive admin console URL: {e}"),
        })
    }
}
