use clap::{ArgMatches, Command};
use sitegen::regenerate_index;

use crate::commands::{CommandResult, dry_run_arg, index_options, today_arg};
use crate::context::CliSession;
use crate::error::CliError;

pub fn command() -> Command {
    Command::new("index")
        .about("Rebuild the resource grid on the index page from published resources")
        .arg(today_arg())
        .arg(dry_run_arg())
}

pub fn run(session: &CliSession, matches: &ArgMatches) -> Result<CommandResult, CliError> {
    let options = index_options(session, matches)?;
    let report = regenerate_index(session.paths(), &options)?;
    Ok(CommandResult::Index {
        timezone: session.timezone().to_string(),
        report,
    })
}
