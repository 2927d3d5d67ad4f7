// Manifest collection endpoints
//
// `find`, `create`, and `update` against `/api/collections/{name}`.
// Records stay as `serde_json::Value`; typing happens in moondash-core.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::client::ManifestClient;
use crate::error::Error;

/// Query parameters for [`ManifestClient::find`].
///
/// `filter` is an exact-match map over record fields. `relations` names
/// sibling entities to attach to each record. `limit` caps the page
/// size; `None` leaves the backend default.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindQuery {
    pub filter: BTreeMap<String, Value>,
    pub relations: Vec<String>,
    pub limit: Option<u32>,
}

impl FindQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an exact-match condition.
    pub fn filter(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filter.insert(field.into(), value.into());
        self
    }

    /// Eagerly attach a related entity.
    pub fn relation(mut self, name: impl Into<String>) -> Self {
        self.relations.push(name.into());
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Apply this query to a collection URL as query-string pairs.
    fn apply(&self, url: &mut Url) {
        let mut pairs = url.query_pairs_mut();
        for (field, value) in &self.filter {
            let rendered = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            pairs.append_pair(&format!("{field}_eq"), &rendered);
        }
        if !self.relations.is_empty() {
            pairs.append_pair("relations", &self.relations.join(","));
        }
        if let Some(limit) = self.limit {
            pairs.append_pair("perPage", &limit.to_string());
        }
    }
}

/// Collection listings come back paginated (`{ data: [...] }`); some
/// deployments disable pagination and return a bare array.
#[derive(Deserialize)]
#[serde(untagged)]
enum Listing {
    Paginated { data: Vec<Value> },
    Bare(Vec<Value>),
}

impl ManifestClient {
    fn collection_url(&self, collection: &str) -> Result<Url, Error> {
        self.api_url(&format!("collections/{collection}"))
    }

    /// `collections/{collection}/{id}`, with `id` encoded as a single
    /// path segment.
    fn record_url(&self, collection: &str, id: &str) -> Result<Url, Error> {
        let mut url = self.collection_url(collection)?;
        url.path_segments_mut()
            .map_err(|()| Error::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .push(id);
        Ok(url)
    }

    /// List records of `collection` matching `query`.
    pub async fn find(&self, collection: &str, query: &FindQuery) -> Result<Vec<Value>, Error> {
        let mut url = self.collection_url(collection)?;
        query.apply(&mut url);
        // `query_pairs_mut` leaves a dangling `?` on an empty query.
        if url.query() == Some("") {
            url.set_query(None);
        }

        let listing: Listing = self.get(url).await?;
        let records = match listing {
            Listing::Paginated { data } | Listing::Bare(data) => data,
        };
        debug!(collection, count = records.len(), "find complete");
        Ok(records)
    }

    /// Create a record and return the stored version.
    pub async fn create(&self, collection: &str, fields: &Value) -> Result<Value, Error> {
        let url = self.collection_url(collection)?;
        self.post(url, fields).await
    }

    /// Partially update a record and return the stored version.
    pub async fn update(&self, collection: &str, id: &str, fields: &Value) -> Result<Value, Error> {
        let url = self.record_url(collection, id)?;
        self.patch(url, fields).await
    }
}
