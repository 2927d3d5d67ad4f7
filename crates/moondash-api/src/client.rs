// Manifest backend HTTP client
//
// Wraps `reqwest::Client` with base-URL joining, bearer-token handling,
// and error-body parsing. Endpoint groups (auth, collections, system)
// are implemented as inherent methods in separate files to keep this
// module focused on transport mechanics.

use std::sync::{PoisonError, RwLock};

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Entity used for authentication when none is configured.
pub const DEFAULT_AUTH_ENTITY: &str = "user";

/// Raw HTTP client for a Manifest backend.
///
/// Holds the bearer token issued by `login`/`signup`. The token lives in
/// memory only; callers that want a session to outlive the process read
/// it with [`token()`](Self::token) and seed a new client with
/// [`with_token()`](Self::with_token).
pub struct ManifestClient {
    http: reqwest::Client,
    base_url: Url,
    auth_entity: String,
    token: RwLock<Option<SecretString>>,
}

impl ManifestClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// `base_url` is the backend root (e.g. `http://localhost:1111`);
    /// all API paths are resolved below `/api`.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url))
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url,
            auth_entity: DEFAULT_AUTH_ENTITY.to_owned(),
            token: RwLock::new(None),
        }
    }

    /// Seed the client with a previously issued bearer token.
    pub fn with_token(self, token: SecretString) -> Self {
        self.set_token(token);
        self
    }

    /// Authenticate against a different authenticable entity.
    pub fn with_auth_entity(mut self, entity: impl Into<String>) -> Self {
        self.auth_entity = entity.into();
        self
    }

    /// The backend base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The authenticable entity name used in `/api/auth/{entity}/...`.
    pub fn auth_entity(&self) -> &str {
        &self.auth_entity
    }

    /// The underlying HTTP client.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    // ── Token management ─────────────────────────────────────────────

    /// The current bearer token, if a session is held.
    pub fn token(&self) -> Option<SecretString> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Whether a bearer token is currently held.
    pub fn has_token(&self) -> bool {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    pub(crate) fn set_token(&self, token: SecretString) {
        trace!("storing bearer token");
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token);
    }

    pub(crate) fn clear_token(&self) {
        trace!("clearing bearer token");
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Apply the stored bearer token to a request builder.
    fn apply_auth(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let guard = self.token.read().unwrap_or_else(PoisonError::into_inner);
        match guard.as_ref() {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        }
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build a full URL for an API path: `{base}/api/{path}`.
    pub(crate) fn api_url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let full = format!("{base}/api/{}", path.trim_start_matches('/'));
        Url::parse(&full).map_err(Error::InvalidUrl)
    }

    /// Build an auth URL: `{base}/api/auth/{entity}/{action}`.
    pub(crate) fn auth_url(&self, action: &str) -> Result<Url, Error> {
        self.api_url(&format!("auth/{}/{action}", self.auth_entity))
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and decode the JSON body.
    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {}", url);

        let builder = self.apply_auth(self.http.get(url));
        let resp = builder.send().await.map_err(Error::Transport)?;

        parse_response(resp).await
    }

    /// Send a POST request with JSON body and decode the JSON response.
    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        debug!("POST {}", url);

        let builder = self.apply_auth(self.http.post(url).json(body));
        let resp = builder.send().await.map_err(Error::Transport)?;

        parse_response(resp).await
    }

    /// Send a PATCH request with JSON body and decode the JSON response.
    pub(crate) async fn patch<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        debug!("PATCH {}", url);

        let builder = self.apply_auth(self.http.patch(url).json(body));
        let resp = builder.send().await.map_err(Error::Transport)?;

        parse_response(resp).await
    }
}

/// Decode a successful response or translate the failure.
///
/// `401` means the bearer token is missing or no longer accepted. Any
/// other non-success status becomes [`Error::Http`] with the backend's
/// message extracted from the `{ "message": ... }` error body.
pub(crate) async fn parse_response<T: DeserializeOwned>(
    resp: reqwest::Response,
) -> Result<T, Error> {
    let status = resp.status();

    if status == reqwest::StatusCode::UNAUTHORIZED {
        return Err(Error::NoActiveSession);
    }

    let body = resp.text().await.map_err(Error::Transport)?;

    if !status.is_success() {
        return Err(Error::Http {
            status: status.as_u16(),
            message: error_message(&body),
        });
    }

    serde_json::from_str(&body).map_err(|e| {
        let preview: String = body.chars().take(200).collect();
        Error::Deserialization {
            message: format!("{e} (body preview: {preview:?})"),
            body: body.clone(),
        }
    })
}

/// Pull a human-readable message out of a Manifest error body.
///
/// Validation failures carry `message` as an array of strings; other
/// errors use a plain string. Falls back to a truncated raw body.
pub(crate) fn error_message(body: &str) -> String {
    let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();
    match parsed.as_ref().and_then(|v| v.get("message")) {
        Some(serde_json::Value::String(msg)) => msg.clone(),
        Some(serde_json::Value::Array(items)) => items
            .iter()
            .filter_map(serde_json::Value::as_str)
            .collect::<Vec<_>>()
            .join("; "),
        _ => body.chars().take(200).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> ManifestClient {
        ManifestClient::with_client(
            reqwest::Client::new(),
            Url::parse(base).expect("valid url"),
        )
    }

    #[test]
    fn api_url_tolerates_trailing_slash() {
        let c = client("http://localhost:1111/");
        let url = c.api_url("collections/order").expect("url");
        assert_eq!(url.as_str(), "http://localhost:1111/api/collections/order");
    }

    #[test]
    fn auth_url_uses_entity() {
        let c = client("http://localhost:1111").with_auth_entity("admins");
        let url = c.auth_url("me").expect("url");
        assert_eq!(url.as_str(), "http://localhost:1111/api/auth/admins/me");
    }

    #[test]
    fn error_message_joins_validation_arrays() {
        let body = r#"{"message":["email must be an email","name should not be empty"],"statusCode":400}"#;
        assert_eq!(
            error_message(body),
            "email must be an email; name should not be empty"
        );
    }

    #[test]
    fn error_message_falls_back_to_body() {
        assert_eq!(error_message("Bad Gateway"), "Bad Gateway");
    }

    #[test]
    fn token_round_trips_through_client() {
        let c = client("http://localhost:1111").with_token(SecretString::from("tok".to_owned()));
        assert!(c.has_token());
        c.clear_token();
        assert!(c.token().is_none());
    }
}
