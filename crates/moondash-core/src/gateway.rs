// ── Data access gateway ──
//
// The one seam between domain logic and the backend. Everything in
// this crate talks to `dyn Gateway`; production wires in
// `ManifestClient`, tests wire in an in-memory fake.

use std::sync::Arc;

use async_trait::async_trait;
use secrecy::SecretString;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use moondash_api::{ManifestClient, TlsMode, TransportConfig};

use crate::config::{ClientConfig, TlsVerification};
use crate::error::CoreError;
use crate::model::EntityId;

pub use moondash_api::FindQuery;

/// Named record collections known to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    User,
    LunarOutpost,
    LunarRover,
    Order,
}

impl Collection {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::LunarOutpost => "lunarOutpost",
            Self::LunarRover => "lunarRover",
            Self::Order => "order",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Abstract data-access capability.
///
/// Every operation is async and may fail; errors stay in transport
/// terms here and are translated by the caller.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Health check. `Ok` means the backend is reachable.
    async fn probe(&self) -> Result<(), moondash_api::Error>;

    async fn find(
        &self,
        collection: Collection,
        query: &FindQuery,
    ) -> Result<Vec<Value>, moondash_api::Error>;

    async fn create(
        &self,
        collection: Collection,
        fields: &Value,
    ) -> Result<Value, moondash_api::Error>;

    async fn update(
        &self,
        collection: Collection,
        id: &EntityId,
        fields: &Value,
    ) -> Result<Value, moondash_api::Error>;

    async fn login(&self, email: &str, password: &SecretString)
    -> Result<(), moondash_api::Error>;

    async fn logout(&self) -> Result<(), moondash_api::Error>;

    /// Register a new account in an authenticable collection and
    /// establish its session.
    async fn signup(
        &self,
        collection: Collection,
        fields: &Value,
    ) -> Result<(), moondash_api::Error>;

    /// Fetch the authenticated identity; `NoActiveSession` if none.
    async fn current_identity(&self) -> Result<Value, moondash_api::Error>;
}

// ── Manifest binding ─────────────────────────────────────────────────

#[async_trait]
impl Gateway for ManifestClient {
    async fn probe(&self) -> Result<(), moondash_api::Error> {
        ManifestClient::probe(self).await
    }

    async fn find(
        &self,
        collection: Collection,
        query: &FindQuery,
    ) -> Result<Vec<Value>, moondash_api::Error> {
        ManifestClient::find(self, collection.as_str(), query).await
    }

    async fn create(
        &self,
        collection: Collection,
        fields: &Value,
    ) -> Result<Value, moondash_api::Error> {
        ManifestClient::create(self, collection.as_str(), fields).await
    }

    async fn update(
        &self,
        collection: Collection,
        id: &EntityId,
        fields: &Value,
    ) -> Result<Value, moondash_api::Error> {
        ManifestClient::update(self, collection.as_str(), &id.to_string(), fields).await
    }

    async fn login(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<(), moondash_api::Error> {
        ManifestClient::login(self, email, password).await
    }

    async fn logout(&self) -> Result<(), moondash_api::Error> {
        ManifestClient::logout(self).await
    }

    async fn signup(
        &self,
        collection: Collection,
        fields: &Value,
    ) -> Result<(), moondash_api::Error> {
        if collection.as_str() != self.auth_entity() {
            return Err(moondash_api::Error::Authentication {
                message: format!("'{collection}' is not an authenticable collection"),
            });
        }
        ManifestClient::signup(self, fields).await
    }

    async fn current_identity(&self) -> Result<Value, moondash_api::Error> {
        ManifestClient::me(self).await
    }
}

/// Build the production gateway for a backend.
pub fn connect(
    config: &ClientConfig,
    token: Option<SecretString>,
) -> Result<Arc<ManifestClient>, CoreError> {
    let transport = TransportConfig {
        tls: match config.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        },
        timeout: config.timeout,
    };
    let mut client = ManifestClient::new(config.backend_url.clone(), &transport)?
        .with_auth_entity(config.auth_entity.clone());
    if let Some(token) = token {
        client = client.with_token(token);
    }
    Ok(Arc::new(client))
}

// ── Record decoding ──────────────────────────────────────────────────

pub(crate) fn decode<T: DeserializeOwned>(entity: &str, raw: Value) -> Result<T, CoreError> {
    serde_json::from_value(raw).map_err(|e| CoreError::Decode {
        entity: entity.to_owned(),
        message: e.to_string(),
    })
}

/// Decode a listing, dropping records that do not fit `T`.
///
/// One malformed record never fails the whole listing; each one
/// dropped is logged.
pub(crate) fn decode_all<T: DeserializeOwned>(collection: Collection, raw: Vec<Value>) -> Vec<T> {
    raw.into_iter()
        .filter_map(|v| match decode(collection.as_str(), v) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(%collection, error = %e, "skipping undecodable record");
                None
            }
        })
        .collect()
}
