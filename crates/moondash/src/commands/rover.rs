//! Rover command handlers.

use moondash_core::command::rover::parse_status;
use moondash_core::{CommandResult, CoreError, Role, Rover, rover_badge};

use super::connect;
use super::util::resolve_operator;
use crate::cli::{GlobalOpts, OutputFormat, RoverArgs, RoverCommand};
use crate::error::CliError;
use crate::output::{self, paint_badge, should_color};

fn rover_detail(rover: &Rover, color: bool) -> String {
    format!(
        "Rover:    {}\nID:       {}\nStatus:   {}\nOperator: {}",
        rover.name,
        rover.id,
        paint_badge(&rover_badge(rover.status), color),
        rover
            .operator_id
            .as_ref()
            .map_or_else(|| "-".into(), ToString::to_string),
    )
}

fn print_rover(rover: &Rover, global: &GlobalOpts) {
    let color = matches!(global.output, OutputFormat::Table) && should_color(&global.color);
    let out = output::render_single(
        &global.output,
        rover,
        |r| rover_detail(r, color),
        |r| r.id.to_string(),
    );
    output::print_output(&out, global.quiet);
}

pub async fn handle(args: RoverArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        RoverCommand::Status { status } => {
            // Reject typos before contacting the backend.
            parse_status(&status)?;

            let ctx = connect(global).await?;
            match ctx.controller.set_rover_status(&status).await? {
                CommandResult::RoverUpdated(rover) | CommandResult::RoverCreated(rover) => {
                    print_rover(&rover, global);
                }
            }
            Ok(())
        }

        RoverCommand::Create { name, operator } => {
            let ctx = connect(global).await?;
            let user = ctx.controller.current_user().ok_or(CliError::NotLoggedIn)?;
            if user.role != Role::Admin {
                return Err(CoreError::WrongRole {
                    expected: Role::Admin.to_string(),
                    actual: user.role.to_string(),
                }
                .into());
            }

            let view = ctx.controller.view();
            let operators = view
                .as_deref()
                .and_then(|v| v.as_admin())
                .map(|admin| admin.operators.as_slice())
                .unwrap_or_default();
            let operator_id = resolve_operator(operators, &operator)?;

            ctx.controller.edit_draft(|draft| {
                draft.name = name;
                draft.operator_id = Some(operator_id);
            });
            match ctx.controller.create_rover().await? {
                CommandResult::RoverCreated(rover) | CommandResult::RoverUpdated(rover) => {
                    print_rover(&rover, global);
                }
            }
            Ok(())
        }
    }
}
