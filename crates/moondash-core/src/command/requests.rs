// ── Typed request structs for Command payloads ──

use serde::{Deserialize, Serialize};

use crate::model::EntityId;

// ── Rover ──────────────────────────────────────────────────────────

/// New rover, as submitted by an admin.
///
/// Both fields are mandatory; the operator is optional here only so an
/// unset picker can be represented and rejected before any request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateRoverRequest {
    pub name: String,
    #[serde(rename = "operatorId")]
    pub operator_id: Option<EntityId>,
}

impl CreateRoverRequest {
    pub fn new(name: impl Into<String>, operator_id: EntityId) -> Self {
        Self {
            name: name.into(),
            operator_id: Some(operator_id),
        }
    }
}

/// The admin's in-progress rover form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RoverDraft {
    pub name: String,
    pub operator_id: Option<EntityId>,
}

impl RoverDraft {
    pub fn is_blank(&self) -> bool {
        self.name.is_empty() && self.operator_id.is_none()
    }
}

impl From<&RoverDraft> for CreateRoverRequest {
    fn from(draft: &RoverDraft) -> Self {
        Self {
            name: draft.name.clone(),
            operator_id: draft.operator_id.clone(),
        }
    }
}
