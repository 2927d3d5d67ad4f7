// ── Outpost domain type ──

use serde::{Deserialize, Serialize};

use super::entity_id::EntityId;
use super::{lenient, null_as_default};

/// Shown when an outpost has no menu image.
pub const PLACEHOLDER_IMAGE_URL: &str = "https://via.placeholder.com/400x200";

/// A vendor location customers order from. Read-only for this client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outpost {
    pub id: EntityId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub cuisine: Option<String>,
    #[serde(rename = "menuImage", default, deserialize_with = "lenient")]
    pub menu_image: Option<ImageRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRef {
    #[serde(default)]
    pub url: Option<String>,
}

impl Outpost {
    pub fn image_url(&self) -> &str {
        self.menu_image
            .as_ref()
            .and_then(|img| img.url.as_deref())
            .unwrap_or(PLACEHOLDER_IMAGE_URL)
    }
}
