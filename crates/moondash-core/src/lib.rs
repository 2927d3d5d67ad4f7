// moondash-core: Session, role dispatch, and order/rover lifecycle between moondash-api and front-ends.

pub mod command;
pub mod config;
pub mod controller;
pub mod dispatch;
pub mod error;
pub mod gateway;
pub mod model;
pub mod session;
pub mod store;
pub mod view;

// ── Primary re-exports ──────────────────────────────────────────────
pub use command::{Command, CommandResult, CreateRoverRequest, RoverController, RoverDraft};
pub use config::{ClientConfig, TlsVerification};
pub use controller::{ConnectionState, Controller};
pub use dispatch::RoleDispatcher;
pub use error::CoreError;
pub use gateway::{Collection, FindQuery, Gateway, connect};
pub use session::{Session, SessionManager, SignupRequest};
pub use store::ViewStore;
pub use view::{
    AdminView, Badge, BadgeCategory, CustomerView, DriverView, OrderRow, RoleView, order_badge,
    order_rows, rover_badge,
};

// Re-export model types at the crate root for ergonomics.
pub use model::{
    EntityId, ImageRef, Order, OrderStatus, Outpost, PLACEHOLDER_IMAGE_URL, Role, Rover,
    RoverStatus, User,
};

pub use moondash_api::ManifestClient;
