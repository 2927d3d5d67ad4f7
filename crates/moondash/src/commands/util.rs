//! Shared helpers for command handlers.

use clap::CommandFactory;
use dialoguer::Input;
use secrecy::SecretString;

use moondash_core::{EntityId, User};

use crate::cli::{Cli, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output;

/// Map a dialoguer / interactive I/O failure into CliError.
pub fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// Use the flag value, or prompt for it.
pub fn value_or_prompt(value: Option<String>, prompt: &str) -> Result<String, CliError> {
    match value {
        Some(v) => Ok(v),
        None => Input::new()
            .with_prompt(prompt)
            .interact_text()
            .map_err(prompt_err),
    }
}

/// Use the flag value, or prompt without echo.
pub fn password_or_prompt(value: Option<String>) -> Result<SecretString, CliError> {
    let raw = match value {
        Some(v) => v,
        None => rpassword::prompt_password("Password: ").map_err(prompt_err)?,
    };
    Ok(SecretString::from(raw))
}

/// Resolve an operator identifier (id or email) against the loaded
/// driver list.
pub fn resolve_operator(operators: &[User], identifier: &str) -> Result<EntityId, CliError> {
    operators
        .iter()
        .find(|u| u.id.to_string() == identifier || u.email.eq_ignore_ascii_case(identifier))
        .map(|u| u.id.clone())
        .ok_or_else(|| CliError::Validation {
            field: "operator".into(),
            reason: format!("no driver matches '{identifier}' (run: moondash dashboard)"),
        })
}

/// `moondash admin-url`: no backend contact needed.
pub fn admin_url(global: &GlobalOpts) -> Result<(), CliError> {
    let client = config::resolve(global)?;
    let url = client.admin_console_url()?;
    output::print_output(url.as_str(), global.quiet);
    Ok(())
}

pub fn completions(shell: clap_complete::Shell) {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "moondash", &mut std::io::stdout());
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use moondash_core::Role;

    fn driver(id: u64, email: &str) -> User {
        User {
            id: EntityId::from(id),
            email: email.into(),
            name: "Driver".into(),
            role: Role::Driver,
            address: None,
        }
    }

    #[test]
    fn operator_resolves_by_id_or_email() {
        let drivers = vec![driver(7, "val@moon.io"), driver(9, "yuri@moon.io")];
        assert_eq!(resolve_operator(&drivers, "9").unwrap(), EntityId::from(9_u64));
        assert_eq!(
            resolve_operator(&drivers, "VAL@moon.io").unwrap(),
            EntityId::from(7_u64)
        );
        assert!(matches!(
            resolve_operator(&drivers, "nobody"),
            Err(CliError::Validation { .. })
        ));
    }
}
