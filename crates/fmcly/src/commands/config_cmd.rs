//! Config subcommand handlers.

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

pub fn handle(args: &ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            let path = fmcly_config::config_path();
            output::print_output(&path.display().to_string(), global.quiet)
        }

        ConfigCommand::Show => {
            let cfg = fmcly_config::load_config()?;
            let rendered = fmcly_config::render_redacted(&cfg)?;
            output::print_output(&rendered, global.quiet)
        }
    }
}
