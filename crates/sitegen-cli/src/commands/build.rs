use clap::{ArgMatches, Command};
use sitegen::{GenerateOptions, generate_pages, regenerate_index};

use crate::commands::{CommandResult, dry_run_arg, index_options, today_arg};
use crate::context::CliSession;
use crate::error::CliError;

pub fn command() -> Command {
    Command::new("build")
        .about("Generate pages, then rebuild the index")
        .arg(today_arg())
        .arg(dry_run_arg())
}

/// Rejected drafts do not stop the index step; they only fail the exit status.
pub fn run(session: &CliSession, matches: &ArgMatches) -> Result<CommandResult, CliError> {
    let options = index_options(session, matches)?;
    let generation = generate_pages(
        session.paths(),
        &GenerateOptions {
            dry_run: options.dry_run,
        },
    )?;
    let index = regenerate_index(session.paths(), &options)?;

    Ok(CommandResult::Build {
        generation,
        timezone: session.timezone().to_string(),
        index,
    })
}
