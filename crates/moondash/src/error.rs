//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` variants into user-facing errors with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use moondash_config::ConfigError;
use moondash_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the MoonDash backend at {url}")]
    #[diagnostic(
        code(moondash::connection_failed),
        help(
            "Check that the backend is running and the URL is right.\n\
             Reason: {reason}\n\
             Override with --backend or MOONDASH_BACKEND_URL; -vv shows details."
        )
    )]
    ConnectionFailed { url: String, reason: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(moondash::auth_failed),
        help("Check your email and password, then run: moondash login")
    )]
    AuthFailed { message: String },

    #[error("Not logged in")]
    #[diagnostic(
        code(moondash::not_logged_in),
        help("Log in with: moondash login\nNew here? Run: moondash signup")
    )]
    NotLoggedIn,

    #[error("This command needs the {expected} role (you are {actual})")]
    #[diagnostic(code(moondash::wrong_role))]
    WrongRole { expected: String, actual: String },

    // ── Data ─────────────────────────────────────────────────────────
    #[error("Could not load {collection}: {message}")]
    #[diagnostic(
        code(moondash::query_failed),
        help("The backend answered but the data could not be loaded. Try again shortly.")
    )]
    QueryFailed { collection: String, message: String },

    #[error("No rover is assigned to you")]
    #[diagnostic(
        code(moondash::no_rover),
        help("Ask an admin to create a rover with you as its operator.")
    )]
    NoRover,

    #[error("Another update is still in progress")]
    #[diagnostic(code(moondash::busy))]
    Busy,

    // ── API ──────────────────────────────────────────────────────────
    #[error("API error: {message}")]
    #[diagnostic(code(moondash::api_error))]
    ApiError { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(moondash::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    #[diagnostic(
        code(moondash::config),
        help("Inspect it with: moondash config show\nRecreate it with: moondash config init")
    )]
    Config { message: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NotLoggedIn => exit_code::AUTH,
            Self::Validation { .. } | Self::Config { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Connectivity { url, reason } => Self::ConnectionFailed { url, reason },
            CoreError::NoActiveSession | CoreError::NotAuthenticated => Self::NotLoggedIn,
            CoreError::Authentication { message } => Self::AuthFailed { message },
            CoreError::Validation { field, reason } => Self::Validation { field, reason },
            CoreError::QueryFailure {
                collection,
                message,
            } => Self::QueryFailed {
                collection,
                message,
            },
            CoreError::MutationInFlight => Self::Busy,
            CoreError::NoRoverAssigned => Self::NoRover,
            CoreError::WrongRole { expected, actual } => Self::WrongRole { expected, actual },
            CoreError::Api {
                message,
                status: Some(status),
            } => Self::ApiError {
                message: format!("{message} (HTTP {status})"),
            },
            CoreError::Api {
                message,
                status: None,
            } => Self::ApiError { message },
            CoreError::Decode { entity, message } => Self::ApiError {
                message: format!("malformed {entity}: {message}"),
            },
            CoreError::Config { message } => Self::Config { message },
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            ConfigError::Io(e) => Self::Io(e),
            other => Self::Config {
                message: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_error_class() {
        let auth = CliError::from(CoreError::Authentication {
            message: "nope".into(),
        });
        assert_eq!(auth.exit_code(), exit_code::AUTH);

        let invalid = CliError::from(CoreError::Validation {
            field: "status".into(),
            reason: "unknown".into(),
        });
        assert_eq!(invalid.exit_code(), exit_code::USAGE);

        let offline = CliError::from(CoreError::Connectivity {
            url: "http://localhost:1111".into(),
            reason: "refused".into(),
        });
        assert_eq!(offline.exit_code(), exit_code::CONNECTION);

        assert_eq!(CliError::from(CoreError::NoRoverAssigned).exit_code(), exit_code::GENERAL);
    }

    #[test]
    fn missing_session_means_not_logged_in() {
        assert!(matches!(
            CliError::from(CoreError::NoActiveSession),
            CliError::NotLoggedIn
        ));
    }
}
