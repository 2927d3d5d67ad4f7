//! CLI configuration -- thin wrapper around `moondash_config`.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides
//! (--backend, --insecure, --timeout).

use std::time::Duration;

use moondash_core::{ClientConfig, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use moondash_config::{
    Config, Defaults, config_path, load_config, load_config_or_default, save_config,
};

/// Translate the config file + global flags into a `ClientConfig`.
///
/// Flags win over the file; the file wins over built-in defaults. A
/// config that fails to load is an error, never a silent default.
pub fn resolve(global: &GlobalOpts) -> Result<ClientConfig, CliError> {
    let mut cfg = load_config()?;
    if let Some(ref backend) = global.backend {
        cfg.backend_url.clone_from(backend);
    }

    let mut client = moondash_config::to_client_config(&cfg)?;
    if global.insecure {
        client.tls = TlsVerification::DangerAcceptInvalid;
    }
    if let Some(secs) = global.timeout {
        client.timeout = Duration::from_secs(secs);
    }
    Ok(client)
}
