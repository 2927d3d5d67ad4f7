// Manifest authentication
//
// Bearer-token login/signup against `/api/auth/{entity}/...`. A
// successful login stores the issued token in the client; every later
// request carries it as `Authorization: Bearer`.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::client::{ManifestClient, error_message, parse_response};
use crate::error::Error;

#[derive(Deserialize)]
struct TokenResponse {
    token: String,
}

impl ManifestClient {
    /// Authenticate with email/password.
    ///
    /// On success the issued bearer token replaces any token already
    /// held. Rejected credentials (any 4xx) map to
    /// [`Error::Authentication`] carrying the backend's message.
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<(), Error> {
        let url = self.auth_url("login")?;
        debug!("logging in at {}", url);

        let body = json!({
            "email": email,
            "password": password.expose_secret(),
        });

        let resp = self
            .http()
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        if status.is_client_error() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Authentication {
                message: format!("login failed (HTTP {status}): {}", error_message(&body)),
            });
        }

        let token: TokenResponse = parse_response(resp).await?;
        self.set_token(SecretString::from(token.token));

        debug!("login successful");
        Ok(())
    }

    /// Register a new record of the authenticable entity.
    ///
    /// `fields` is sent verbatim; the caller decides what the record
    /// contains (including any role field). The backend answers with a
    /// token which is stored like a login.
    pub async fn signup(&self, fields: &serde_json::Value) -> Result<(), Error> {
        let url = self.auth_url("signup")?;
        debug!("signing up at {}", url);

        let token: TokenResponse = self.post(url, fields).await?;
        self.set_token(SecretString::from(token.token));

        debug!("signup successful");
        Ok(())
    }

    /// Resolve the identity behind the current bearer token.
    ///
    /// Fails with [`Error::NoActiveSession`] when no token is held
    /// (without touching the network) or when the backend refuses it.
    pub async fn me(&self) -> Result<serde_json::Value, Error> {
        if !self.has_token() {
            debug!("no bearer token held, skipping identity lookup");
            return Err(Error::NoActiveSession);
        }

        let url = self.auth_url("me")?;
        match self.get(url).await {
            Err(Error::Http { status: 403, .. }) => Err(Error::NoActiveSession),
            other => other,
        }
    }

    /// End the current session.
    ///
    /// Manifest tokens are stateless JWTs with no revocation endpoint,
    /// so ending the session means forgetting the token.
    pub async fn logout(&self) -> Result<(), Error> {
        self.clear_token();
        debug!("logout complete");
        Ok(())
    }
}
