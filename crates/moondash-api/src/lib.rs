// moondash-api: Async Rust client for the MoonDash Manifest backend

pub mod auth;
pub mod client;
pub mod collections;
pub mod error;
pub mod system;
pub mod transport;

pub use client::{DEFAULT_AUTH_ENTITY, ManifestClient};
pub use collections::FindQuery;
pub use error::Error;
pub use transport::{TlsMode, TransportConfig};
