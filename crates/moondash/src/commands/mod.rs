//! Command handlers.
//!
//! Every handler that talks to the backend goes through [`connect`],
//! which runs the controller's startup sequence with any stored
//! session token.

pub mod config_cmd;
pub mod dashboard;
pub mod rover;
pub mod session;
pub mod util;

use std::sync::Arc;

use tracing::{debug, warn};

use moondash_core::{ClientConfig, ConnectionState, Controller, Gateway, ManifestClient};

use crate::cli::{Command, GlobalOpts};
use crate::config;
use crate::error::CliError;

/// A started controller plus the HTTP client behind it.
pub struct Context {
    pub controller: Controller,
    pub client: Arc<ManifestClient>,
    pub config: ClientConfig,
}

impl Context {
    /// Persist the client's current token for the next invocation.
    /// Keyring failures are logged, not raised.
    pub fn save_token(&self) {
        let Some(token) = self.client.token() else {
            return;
        };
        if let Err(e) = moondash_config::store_token(&self.config.backend_url, &token) {
            warn!(error = %e, "could not store session token");
        }
    }

    pub fn forget_token(&self) {
        if let Err(e) = moondash_config::clear_token(&self.config.backend_url) {
            warn!(error = %e, "could not clear stored session token");
        }
    }
}

/// Build the controller and run startup. Fails if the backend is
/// unreachable.
pub async fn connect(global: &GlobalOpts) -> Result<Context, CliError> {
    let config = config::resolve(global)?;
    let token = moondash_config::load_token(&config.backend_url);
    let had_token = token.is_some();

    let client = moondash_core::connect(&config, token)?;
    let gateway: Arc<dyn Gateway> = client.clone();
    let controller = Controller::new(config.clone(), gateway);

    if controller.start().await == ConnectionState::Disconnected {
        return Err(CliError::ConnectionFailed {
            url: config.backend_url.to_string(),
            reason: "health check failed".into(),
        });
    }

    let ctx = Context {
        controller,
        client,
        config,
    };
    if had_token && !ctx.controller.session().is_authenticated() {
        debug!("stored session token was rejected, forgetting it");
        ctx.forget_token();
    }
    Ok(ctx)
}

/// Route a command to its handler.
pub async fn dispatch(cmd: Command, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Status => session::status(global).await,
        Command::Login(args) => session::login(args, global).await,
        Command::Signup(args) => session::signup(args, global).await,
        Command::Logout => session::logout(global).await,
        Command::Dashboard => dashboard::handle(global).await,
        Command::Rover(args) => rover::handle(args, global).await,
        Command::AdminUrl => util::admin_url(global),
        Command::Config(args) => config_cmd::handle(args, global),
        Command::Completions(args) => {
            util::completions(args.shell);
            Ok(())
        }
    }
}
