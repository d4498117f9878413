use clap::Command;
use sitegen::check_drafts;

use crate::commands::CommandResult;
use crate::context::CliSession;
use crate::error::CliError;

pub fn command() -> Command {
    Command::new("check").about("Parse and validate every draft without writing anything")
}

pub fn run(session: &CliSession) -> Result<CommandResult, CliError> {
    let report = check_drafts(session.paths())?;
    Ok(CommandResult::Check { report })
}
