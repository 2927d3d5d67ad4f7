// ── Command API ──
//
// All write operations flow through a unified `Command` enum. The
// controller checks role and in-flight state, then routes each variant
// to the rover lifecycle controller.

pub mod requests;
pub mod rover;

use crate::model::Rover;

pub use requests::{CreateRoverRequest, RoverDraft};
pub use rover::RoverController;

/// All write operations available after login.
#[derive(Debug, Clone)]
pub enum Command {
    // ── Driver ───────────────────────────────────────────────────────
    /// Change the status of the driver's own rover. The raw text is
    /// checked against the known statuses before anything is sent.
    UpdateRoverStatus { status: String },

    // ── Admin ────────────────────────────────────────────────────────
    CreateRover(CreateRoverRequest),
}

/// Result of a successfully executed command.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandResult {
    /// The server's copy of the rover after the status change.
    RoverUpdated(Rover),
    /// The created rover. It is not added to any loaded list.
    RoverCreated(Rover),
}
