//! Config subcommand handlers.

use std::fmt::Write;

use dialoguer::{Confirm, Input, Select};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Defaults};
use crate::error::CliError;
use crate::output;

use super::util::prompt_err;

fn format_config(cfg: &Config) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "backend_url = \"{}\"", cfg.backend_url);
    let _ = writeln!(out, "auth_entity = \"{}\"", cfg.auth_entity);
    let _ = writeln!(out);
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "color = \"{}\"", cfg.defaults.color);
    let _ = writeln!(out, "insecure = {}", cfg.defaults.insecure);
    let _ = write!(out, "timeout = {}", cfg.defaults.timeout);
    out
}

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let config_path = config::config_path();
            eprintln!("MoonDash configuration");
            eprintln!("   Config path: {}\n", config_path.display());

            if config_path.exists()
                && !Confirm::new()
                    .with_prompt("A config file already exists. Overwrite it?")
                    .default(false)
                    .interact()
                    .map_err(prompt_err)?
            {
                return Ok(());
            }

            let backend_url: String = Input::new()
                .with_prompt("Backend URL")
                .default(moondash_config::DEFAULT_BACKEND_URL.into())
                .interact_text()
                .map_err(prompt_err)?;

            let outputs = &["table", "json", "yaml", "plain"];
            let output_idx = Select::new()
                .with_prompt("Default output format")
                .items(outputs)
                .default(0)
                .interact()
                .map_err(prompt_err)?;

            let insecure = Confirm::new()
                .with_prompt("Accept self-signed TLS certificates?")
                .default(false)
                .interact()
                .map_err(prompt_err)?;

            let cfg = Config {
                backend_url,
                defaults: Defaults {
                    output: outputs.get(output_idx).copied().unwrap_or("table").into(),
                    insecure,
                    ..Defaults::default()
                },
                ..Config::default()
            };
            // Validate before writing anything.
            moondash_config::to_client_config(&cfg)?;

            let path = config::save_config(&cfg)?;
            eprintln!("\n   Saved to {}", path.display());
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = config::load_config_or_default();
            let out = output::render_single(&global.output, &cfg, format_config, |c| {
                c.backend_url.clone()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn formatted_config_is_valid_toml() {
        let cfg = Config {
            backend_url: "https://moon.example".into(),
            ..Config::default()
        };
        let parsed: Config = toml::from_str(&format_config(&cfg)).unwrap();
        assert_eq!(parsed, cfg);
    }
}
