// ── User domain type ──

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::entity_id::EntityId;
use super::null_as_default;

/// Account role. Fixed at creation; this client only ever creates
/// customers, drivers and admins are provisioned out-of-band.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    Customer,
    Driver,
    Admin,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: EntityId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    pub role: Role,
    /// Delivery address on the lunar surface.
    #[serde(rename = "lunarAddress", default)]
    pub address: Option<String>,
}

impl User {
    /// `"Name (email)"`, as shown in operator pickers.
    pub fn label(&self) -> String {
        if self.email.is_empty() {
            self.name.clone()
        } else {
            format!("{} ({})", self.name, self.email)
        }
    }
}
