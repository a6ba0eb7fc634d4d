//! Command dispatch: bridges CLI args -> rule builders -> output formatting.

pub mod access_rule;
pub mod config_cmd;
pub mod nat_rule;

use serde_json::Value;

use fmcly_core::{FmcClient, ParentPolicy, RuleWarning};

use crate::cli::{Command, GlobalOpts, ParentArgs, SubmitArgs};
use crate::error::CliError;
use crate::output;

/// Dispatch a controller-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    client: &FmcClient,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::AccessRule(args) => access_rule::handle(client, args, global).await,
        Command::NatRule(args) => nat_rule::handle(client, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}

fn parent_policy(args: &ParentArgs) -> Result<ParentPolicy, CliError> {
    match (&args.policy_id, &args.policy) {
        (Some(id), _) => Ok(ParentPolicy::Id(id.clone())),
        (None, Some(name)) => Ok(ParentPolicy::Name(name.clone())),
        (None, None) => Err(CliError::Validation {
            field: "policy".into(),
            reason: "give --policy or --policy-id".into(),
        }),
    }
}

/// Summarize warnings on stderr; with `--strict`, refuse to go on.
fn check_warnings(warnings: &[RuleWarning], submit: &SubmitArgs) -> Result<(), CliError> {
    if warnings.is_empty() {
        return Ok(());
    }
    for warning in warnings {
        eprintln!("warning[{}]: {warning}", warning.kind());
    }
    if submit.strict {
        return Err(CliError::Warnings {
            count: warnings.len(),
        });
    }
    Ok(())
}

/// Print the payload on `--dry-run`, otherwise the controller's response.
fn emit(global: &GlobalOpts, value: &Value) -> Result<(), CliError> {
    let rendered = output::render(global.output, value)?;
    output::print_output(&rendered, global.quiet)
}
