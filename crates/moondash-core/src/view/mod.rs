// ── Role views ──
//
// What the dashboard shows, selected once per load by the role
// dispatcher. Each variant carries exactly the data its role needs.

pub mod badge;
pub mod orders;

use serde::Serialize;

use crate::command::RoverDraft;
use crate::model::{Order, Outpost, Role, Rover, User};

pub use badge::{Badge, BadgeCategory, order_badge, rover_badge};
pub use orders::{OrderRow, order_rows};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CustomerView {
    pub outposts: Vec<Outpost>,
    pub orders: Vec<Order>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DriverView {
    /// `None` when no rover is assigned to the driver.
    pub rover: Option<Rover>,
    pub deliveries: Vec<Order>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AdminView {
    /// Candidate rover operators (users with the driver role).
    pub operators: Vec<User>,
    pub draft: RoverDraft,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum RoleView {
    Customer(CustomerView),
    Driver(DriverView),
    Admin(AdminView),
}

impl RoleView {
    pub fn role(&self) -> Role {
        match self {
            Self::Customer(_) => Role::Customer,
            Self::Driver(_) => Role::Driver,
            Self::Admin(_) => Role::Admin,
        }
    }

    pub fn as_customer(&self) -> Option<&CustomerView> {
        match self {
            Self::Customer(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_driver(&self) -> Option<&DriverView> {
        match self {
            Self::Driver(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_admin(&self) -> Option<&AdminView> {
        match self {
            Self::Admin(v) => Some(v),
            _ => None,
        }
    }
}
