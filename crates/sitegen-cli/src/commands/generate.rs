use clap::{ArgMatches, Command};
use sitegen::{GenerateOptions, generate_pages};

use crate::commands::{CommandResult, dry_run_arg};
use crate::context::CliSession;
use crate::error::CliError;

pub fn command() -> Command {
    Command::new("generate")
        .about("Render every valid draft into a resource page")
        .arg(dry_run_arg())
}

pub fn run(session: &CliSession, matches: &ArgMatches) -> Result<CommandResult, CliError> {
    let options = GenerateOptions {
        dry_run: matches.get_flag("dry-run"),
    };
    let report = generate_pages(session.paths(), &options)?;
    Ok(CommandResult::Generate { report })
}
