//! Session command handlers: status, login, signup, logout.

use std::fmt::Write;

use serde::Serialize;
use tracing::warn;

use moondash_core::{ConnectionState, SignupRequest, User};

use super::util::{password_or_prompt, value_or_prompt};
use super::{Context, connect};
use crate::cli::{GlobalOpts, LoginArgs, SignupArgs};
use crate::config;
use crate::error::CliError;
use crate::output;

#[derive(Serialize)]
struct StatusReport<'a> {
    backend: String,
    connected: bool,
    user: Option<&'a User>,
}

fn user_detail(user: &User) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Name:    {}", user.name);
    let _ = writeln!(out, "Email:   {}", user.email);
    let _ = write!(out, "Role:    {}", user.role);
    if let Some(ref address) = user.address {
        let _ = write!(out, "\nAddress: {address}");
    }
    out
}

pub async fn status(global: &GlobalOpts) -> Result<(), CliError> {
    let client_config = config::resolve(global)?;
    let ctx = match connect(global).await {
        Ok(ctx) => ctx,
        Err(CliError::ConnectionFailed { .. }) => {
            let report = StatusReport {
                backend: client_config.backend_url.to_string(),
                connected: false,
                user: None,
            };
            let out = output::render_single(
                &global.output,
                &report,
                |r| format!("Backend: {} (unreachable)", r.backend),
                |_| "disconnected".into(),
            );
            output::print_output(&out, global.quiet);
            return Err(CliError::ConnectionFailed {
                url: report.backend,
                reason: "health check failed".into(),
            });
        }
        Err(e) => return Err(e),
    };

    let user = ctx.controller.current_user();
    let report = StatusReport {
        backend: ctx.config.backend_url.to_string(),
        connected: ctx.controller.connection_state() == ConnectionState::Connected,
        user: user.as_deref(),
    };
    let out = output::render_single(
        &global.output,
        &report,
        |r| match r.user {
            Some(user) => format!("Backend: {} (connected)\n{}", r.backend, user_detail(user)),
            None => format!("Backend: {} (connected)\nNot logged in", r.backend),
        },
        |r| r.user.map_or_else(|| "anonymous".into(), |u| u.email.clone()),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}

fn print_user(ctx: &Context, global: &GlobalOpts, heading: &str) {
    let Some(user) = ctx.controller.current_user() else {
        return;
    };
    let out = output::render_single(
        &global.output,
        user.as_ref(),
        |u| format!("{heading}\n{}", user_detail(u)),
        |u| u.id.to_string(),
    );
    output::print_output(&out, global.quiet);
}

pub async fn login(args: LoginArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let email = value_or_prompt(args.email, "Email")?;
    let password = password_or_prompt(args.password)?;

    let ctx = connect(global).await?;
    ctx.controller.login(&email, &password).await?;
    ctx.save_token();

    print_user(&ctx, global, "Logged in");
    Ok(())
}

pub async fn signup(args: SignupArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let request = SignupRequest {
        email: value_or_prompt(args.email, "Email")?,
        name: value_or_prompt(args.name, "Name")?,
        address: value_or_prompt(args.address, "Lunar address")?,
        password: password_or_prompt(args.password)?,
    };

    let ctx = connect(global).await?;
    ctx.controller.signup(&request).await?;
    ctx.save_token();

    print_user(&ctx, global, "Account created");
    Ok(())
}

/// The stored token is dropped whether or not the backend answers.
pub async fn logout(global: &GlobalOpts) -> Result<(), CliError> {
    let client_config = config::resolve(global)?;
    match connect(global).await {
        Ok(ctx) => ctx.controller.logout().await,
        Err(e) => warn!(error = %e, "backend unavailable, logging out locally"),
    }
    if let Err(e) = moondash_config::clear_token(&client_config.backend_url) {
        warn!(error = %e, "could not clear stored session token");
    }

    if !global.quiet {
        eprintln!("Logged out");
    }
    Ok(())
}
