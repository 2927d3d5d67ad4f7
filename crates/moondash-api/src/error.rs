use thiserror::Error;

/// Top-level error type for the `moondash-api` crate.
///
/// Covers every failure mode of the Manifest backend surface: auth,
/// transport, HTTP status, and payload decoding. `moondash-core` maps
/// these into its user-facing taxonomy.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Credentials were rejected (bad email/password, duplicate signup, etc.)
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// No bearer token is held, or the backend refused the one we have.
    #[error("No active session")]
    NoActiveSession,

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request timed out.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Backend ─────────────────────────────────────────────────────
    /// Non-success HTTP status with the backend's message, if any.
    #[error("Backend error (HTTP {status}): {message}")]
    Http { status: u16, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}
