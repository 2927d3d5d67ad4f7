// ── Rover lifecycle ──
//
// Status changes by the owning driver and rover creation by admins.
// Both validate locally first; the gateway is only called with input
// that could succeed. Successful calls return the server's record.

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, info};

use super::requests::CreateRoverRequest;
use crate::error::CoreError;
use crate::gateway::{Collection, Gateway, decode};
use crate::model::{Rover, RoverStatus};

#[derive(Clone)]
pub struct RoverController {
    gateway: Arc<dyn Gateway>,
}

impl RoverController {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self { gateway }
    }

    /// Move `rover` to `new_status`.
    ///
    /// Any known status may follow any other. Text outside the known
    /// set is rejected without a request. On success the returned
    /// record replaces the caller's copy; on failure nothing changes.
    pub async fn update_status(&self, rover: &Rover, new_status: &str) -> Result<Rover, CoreError> {
        let status = parse_status(new_status)?;
        debug!(rover = %rover.id, from = %rover.status, to = %status, "updating rover status");

        let raw = self
            .gateway
            .update(
                Collection::LunarRover,
                &rover.id,
                &json!({ "status": status.as_str() }),
            )
            .await?;
        let updated: Rover = decode(Collection::LunarRover.as_str(), raw)?;

        info!(rover = %updated.id, status = %updated.status, "rover status updated");
        Ok(updated)
    }

    /// Create a rover bound to an operator.
    ///
    /// The backend receives exactly `name` and `operatorId`.
    pub async fn create_rover(&self, request: &CreateRoverRequest) -> Result<Rover, CoreError> {
        let name = request.name.trim();
        if name.is_empty() {
            return Err(CoreError::validation("name", "rover name is required"));
        }
        let Some(operator) = request.operator_id.as_ref() else {
            return Err(CoreError::validation("operator", "an operator must be selected"));
        };

        let fields = json!({
            "name": name,
            "operatorId": operator.to_json(),
        });
        let raw = self.gateway.create(Collection::LunarRover, &fields).await?;
        let created: Rover = decode(Collection::LunarRover.as_str(), raw)?;

        info!(rover = %created.id, operator = %operator, "rover created");
        Ok(created)
    }
}

/// Strict parse of a rover status.
pub fn parse_status(raw: &str) -> Result<RoverStatus, CoreError> {
    raw.parse::<RoverStatus>()
        .ok()
        .filter(|status| status.is_known())
        .ok_or_else(|| {
            let allowed: Vec<_> = RoverStatus::ALL.iter().map(|s| s.as_str()).collect();
            CoreError::validation(
                "status",
                format!("'{raw}' is not one of {}", allowed.join(", ")),
            )
        })
}
