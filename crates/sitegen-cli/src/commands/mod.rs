use clap::{Arg, ArgAction, ArgMatches};
use serde::Serialize;
use sitegen::{Clock, FixedClock, GenerationReport, IndexOptions, IndexReport, parse_date};

use crate::context::CliSession;
use crate::error::{CliError, ExitStatus};

pub mod build;
pub mod check;
pub mod generate;
pub mod index;

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CommandResult {
    Generate {
        report: GenerationReport,
    },
    Index {
        timezone: String,
        report: IndexReport,
    },
    Build {
        generation: GenerationReport,
        timezone: String,
        index: IndexReport,
    },
    Check {
        report: GenerationReport,
    },
}

impl CommandResult {
    /// Any rejected or unreadable draft fails the command.
    pub fn exit_status(&self) -> ExitStatus {
        let errors = match self {
            CommandResult::Generate { report } | CommandResult::Check { report } => report.errors,
            CommandResult::Build { generation, .. } => generation.errors,
            CommandResult::Index { .. } => 0,
        };
        if errors > 0 {
            ExitStatus::Data
        } else {
            ExitStatus::Ok
        }
    }
}

pub(crate) fn dry_run_arg() -> Arg {
    Arg::new("dry-run")
        .long("dry-run")
        .action(ArgAction::SetTrue)
        .help("Compute everything but write nothing")
}

pub(crate) fn today_arg() -> Arg {
    Arg::new("today")
        .long("today")
        .value_name("YYYY-MM-DD")
        .help("Evaluate publish dates as of this day instead of the current date in the site time zone")
}

/// Builds index options from `--today` / `--dry-run`, defaulting to the current date in
/// the site's time zone.
pub(crate) fn index_options(
    session: &CliSession,
    matches: &ArgMatches,
) -> Result<IndexOptions, CliError> {
    let clock: Box<dyn Clock> = match matches.get_one::<String>("today") {
        Some(value) => Box::new(FixedClock(
            parse_date(value).map_err(|err| CliError::new(err.to_string(), ExitStatus::Usage))?,
        )),
        None => Box::new(session.site.config.clock()?),
    };
    Ok(IndexOptions {
        today: clock.today(),
        dry_run: matches.get_flag("dry-run"),
    })
}
