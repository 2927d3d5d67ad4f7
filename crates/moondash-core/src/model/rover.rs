// ── Rover domain type ──

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

use super::entity_id::EntityId;
use super::null_as_default;

/// Operational status of a rover.
///
/// Any status may follow any other; the only rule is membership in
/// [`ALL`](Self::ALL). Statuses outside that set decode as
/// [`Unknown`](Self::Unknown) and can never be written back.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RoverStatus {
    #[default]
    Idle,
    Delivering,
    Charging,
    #[serde(other)]
    Unknown,
}

impl RoverStatus {
    pub const ALL: [Self; 3] = [Self::Idle, Self::Delivering, Self::Charging];

    pub fn as_str(self) -> &'static str {
        self.into()
    }

    /// Whether this status may be sent to the backend.
    pub fn is_known(self) -> bool {
        self != Self::Unknown
    }
}

/// A delivery unit bound to one driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rover {
    pub id: EntityId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: RoverStatus,
    #[serde(rename = "operatorId", default)]
    pub operator_id: Option<EntityId>,
}
