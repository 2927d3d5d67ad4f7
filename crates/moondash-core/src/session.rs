// ── Session manager ──
//
// Owns the authenticated identity. Every transition publishes the new
// `Session` on a watch channel, so readers always see the latest
// committed identity.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::error::CoreError;
use crate::gateway::{Collection, Gateway, decode};
use crate::model::{Role, User};

/// Who is logged in, if anyone.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Session {
    #[default]
    Landing,
    Dashboard(Arc<User>),
}

impl Session {
    pub fn user(&self) -> Option<&Arc<User>> {
        match self {
            Self::Landing => None,
            Self::Dashboard(user) => Some(user),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Dashboard(_))
    }
}

/// Registration form. There is no role field: every account created
/// here is a customer.
#[derive(Debug, Clone)]
pub struct SignupRequest {
    pub email: String,
    pub password: SecretString,
    pub name: String,
    pub address: String,
}

impl SignupRequest {
    fn validate(&self) -> Result<(), CoreError> {
        require("name", &self.name)?;
        require("email", &self.email)?;
        if !self.email.contains('@') {
            return Err(CoreError::validation("email", "must be an email address"));
        }
        require("password", self.password.expose_secret())?;
        require("address", &self.address)
    }

    fn to_fields(&self) -> serde_json::Value {
        json!({
            "email": self.email.trim(),
            "password": self.password.expose_secret(),
            "name": self.name.trim(),
            "lunarAddress": self.address.trim(),
            "role": Role::Customer,
        })
    }
}

fn require(field: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        Err(CoreError::validation(field, "is required"))
    } else {
        Ok(())
    }
}

pub struct SessionManager {
    gateway: Arc<dyn Gateway>,
    state: watch::Sender<Session>,
}

impl SessionManager {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        let (state, _) = watch::channel(Session::Landing);
        Self { gateway, state }
    }

    pub fn current(&self) -> Session {
        self.state.borrow().clone()
    }

    pub fn user(&self) -> Option<Arc<User>> {
        self.state.borrow().user().cloned()
    }

    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    // ── Transitions ──────────────────────────────────────────────────

    /// Resolve an existing session without credentials.
    ///
    /// Failure of any kind lands on [`Session::Landing`] and is not an
    /// error: being logged out is a normal starting point.
    pub async fn restore_session(&self) -> Option<Arc<User>> {
        match self.resolve_identity().await {
            Ok(user) => {
                info!(user = %user.id, role = %user.role, "session restored");
                Some(user)
            }
            Err(CoreError::NoActiveSession) => {
                debug!("no active session");
                self.publish(Session::Landing);
                None
            }
            Err(e) => {
                debug!(error = %e, "session restore failed");
                self.publish(Session::Landing);
                None
            }
        }
    }

    /// Authenticate, then resolve the logged-in user.
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<Arc<User>, CoreError> {
        require("email", email)?;
        require("password", password.expose_secret())?;

        self.gateway.login(email.trim(), password).await?;
        let user = match self.resolve_identity().await {
            Err(CoreError::NoActiveSession) => {
                return Err(CoreError::Authentication {
                    message: "backend accepted the login but issued no session".into(),
                });
            }
            other => other?,
        };

        info!(user = %user.id, role = %user.role, "logged in");
        Ok(user)
    }

    /// Create a customer account, then log in with it.
    pub async fn signup(&self, request: &SignupRequest) -> Result<Arc<User>, CoreError> {
        request.validate()?;

        self.gateway
            .signup(Collection::User, &request.to_fields())
            .await
            .map_err(signup_error)?;
        debug!(email = %request.email, "account created");

        self.login(&request.email, &request.password).await
    }

    /// End the session. Identity is cleared even when the backend call
    /// fails.
    pub async fn logout(&self) {
        if let Err(e) = self.gateway.logout().await {
            warn!(error = %e, "logout failed (non-fatal)");
        }
        self.publish(Session::Landing);
        info!("logged out");
    }

    // ── Helpers ──────────────────────────────────────────────────────

    async fn resolve_identity(&self) -> Result<Arc<User>, CoreError> {
        let raw = self.gateway.current_identity().await?;
        let user = Arc::new(decode::<User>(Collection::User.as_str(), raw)?);
        self.publish(Session::Dashboard(Arc::clone(&user)));
        Ok(user)
    }

    fn publish(&self, session: Session) {
        self.state.send_replace(session);
    }
}

fn signup_error(err: moondash_api::Error) -> CoreError {
    match err {
        moondash_api::Error::Http {
            status: 400 | 422,
            message,
        } => CoreError::Validation {
            field: "signup".into(),
            reason: message,
        },
        moondash_api::Error::Http {
            status: 409,
            message,
        } => CoreError::Authentication { message },
        other => other.into(),
    }
}
