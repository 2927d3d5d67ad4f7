// ── Core error types ──
//
// User-facing errors from moondash-core. Consumers never see HTTP
// status codes or JSON parse failures directly; the
// `From<moondash_api::Error>` impl translates transport-layer errors
// into domain-appropriate variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Startup / session ────────────────────────────────────────────
    #[error("Cannot reach backend at {url}: {reason}")]
    Connectivity { url: String, reason: String },

    /// Expected when nobody is logged in. Routes to the landing screen
    /// and is never shown to the user.
    #[error("No active session")]
    NoActiveSession,

    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    #[error("Not logged in")]
    NotAuthenticated,

    // ── Input ────────────────────────────────────────────────────────
    #[error("Invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    // ── Data ─────────────────────────────────────────────────────────
    #[error("Failed to load {collection}: {message}")]
    QueryFailure { collection: String, message: String },

    #[error("Malformed {entity} record: {message}")]
    Decode { entity: String, message: String },

    // ── Mutations ────────────────────────────────────────────────────
    #[error("Another update is still in flight")]
    MutationInFlight,

    #[error("No rover is assigned to this driver")]
    NoRoverAssigned,

    #[error("Operation requires the {expected} role (current role: {actual})")]
    WrongRole { expected: String, actual: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    pub(crate) fn validation(field: &str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.to_owned(),
            reason: reason.into(),
        }
    }

    /// Whether this error should be shown next to the action that
    /// triggered it. A missing session is a normal "not logged in"
    /// path and stays silent.
    pub fn is_user_facing(&self) -> bool {
        !matches!(self, Self::NoActiveSession)
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<moondash_api::Error> for CoreError {
    fn from(err: moondash_api::Error) -> Self {
        match err {
            moondash_api::Error::Authentication { message } => Self::Authentication { message },
            moondash_api::Error::NoActiveSession => Self::NoActiveSession,
            moondash_api::Error::Transport(ref e) => {
                if e.is_connect() {
                    Self::Connectivity {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    Self::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            moondash_api::Error::InvalidUrl(e) => Self::Config {
                message: format!("Invalid URL: {e}"),
            },
            moondash_api::Error::Timeout { timeout_secs } => Self::Api {
                message: format!("Request timed out after {timeout_secs}s"),
                status: None,
            },
            moondash_api::Error::Http { status, message } => Self::Api {
                message,
                status: Some(status),
            },
            moondash_api::Error::Deserialization { message, body: _ } => Self::Decode {
                entity: "response".into(),
                message,
            },
        }
    }
}
