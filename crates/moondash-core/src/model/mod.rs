// ── Domain model ──
//
// Canonical types decoded from Manifest records. Relations the backend
// may omit or mangle are optional and decoded leniently.

pub mod entity_id;
pub mod order;
pub mod outpost;
pub mod rover;
pub mod user;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

pub use entity_id::EntityId;
pub use order::{Order, OrderStatus};
pub use outpost::{ImageRef, Outpost, PLACEHOLDER_IMAGE_URL};
pub use rover::{Rover, RoverStatus};
pub use user::{Role, User};

/// Decode an optional nested record, treating `null` or any shape
/// mismatch as absent.
pub(crate) fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(raw).ok())
}

/// Decode a plain field, treating `null` as the type's default.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
