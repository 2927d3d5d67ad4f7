// ── Status badges ──
//
// Fixed mappings from record status to a display category. Rendering
// (colors, glyphs) belongs to the front-end.

use serde::Serialize;
use strum::Display;

use crate::model::{OrderStatus, RoverStatus};

/// Visual category of a status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum BadgeCategory {
    Info,
    Pending,
    Transit,
    Success,
    Danger,
    Neutral,
    /// Status outside the known set; shown as plain text.
    Unstyled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Badge {
    pub label: String,
    pub category: BadgeCategory,
}

impl Badge {
    fn new(raw: &str, category: BadgeCategory) -> Self {
        Self {
            label: raw.to_uppercase(),
            category,
        }
    }
}

pub fn order_badge(status: &OrderStatus) -> Badge {
    let category = match status {
        OrderStatus::Placed => BadgeCategory::Info,
        OrderStatus::Preparing => BadgeCategory::Pending,
        OrderStatus::InTransit => BadgeCategory::Transit,
        OrderStatus::Delivered => BadgeCategory::Success,
        OrderStatus::Cancelled => BadgeCategory::Danger,
        OrderStatus::Unknown(_) => BadgeCategory::Unstyled,
    };
    Badge::new(status.as_str(), category)
}

pub fn rover_badge(status: RoverStatus) -> Badge {
    let category = match status {
        RoverStatus::Idle => BadgeCategory::Neutral,
        RoverStatus::Delivering => BadgeCategory::Info,
        RoverStatus::Charging => BadgeCategory::Pending,
        RoverStatus::Unknown => BadgeCategory::Unstyled,
    };
    Badge::new(status.as_str(), category)
}
