use std::ffi::OsString;
use std::process::ExitCode;

use clap::{Arg, ArgAction, ArgMatches, Command};

use crate::commands;
use crate::context::CliSession;
use crate::error::{CliError, ExitStatus};
use crate::formatter::{OutputFormat, emit_result};
use crate::util::Verbosity;

const NAME: &str = "sitegen";

pub fn run() -> ExitCode {
    init_tracing();
    match run_cli(std::env::args()) {
        Ok(code) => code,
        Err(err) => {
            err.print();
            err.exit_code()
        }
    }
}

/// Parses arguments, resolves the site, and dispatches to a command. The returned
/// `ExitCode` follows `sysexits`.
pub fn run_cli<I, S>(args: I) -> Result<ExitCode, CliError>
where
    I: IntoIterator<Item = S>,
    S: Into<OsString> + Clone,
{
    let command = build_cli();
    let matches = command.try_get_matches_from(args)?;

    let verbosity = Verbosity {
        json: matches.get_flag("json"),
        verbose: matches.get_flag("verbose"),
    };
    let output = if verbosity.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };

    let root_override = matches.get_one::<String>("root").cloned();
    let session = CliSession::bootstrap(root_override, verbosity)?;
    if session.verbosity.verbose {
        let paths = session.paths();
        tracing::info!(
            root = %paths.root().display(),
            drafts = %paths.drafts_dir().display(),
            template = %paths.template_path().display(),
            manifest = %paths.manifest_path().display(),
            index = %paths.index_path().display(),
            timezone = session.timezone(),
            "resolved site layout"
        );
    }

    let result = dispatch(&session, &matches)?;
    emit_result(&session, result, output)
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}

fn build_cli() -> Command {
    Command::new(NAME)
        .about("Generate resource pages from Markdown drafts and rebuild the resource index")
        .arg(
            Arg::new("root")
                .long("root")
                .value_name("PATH")
                .global(true)
                .help("Site root. Defaults to the nearest ancestor with sitegen.yaml, .git, or package.json."),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .action(ArgAction::SetTrue)
                .global(true)
                .help("Emit one JSON object per command instead of text."),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .action(ArgAction::SetTrue)
                .global(true)
                .help("Log the resolved site layout."),
        )
        .subcommand_required(true)
        .subcommand(commands::generate::command())
        .subcommand(commands::index::command())
        .subcommand(commands::build::command())
        .subcommand(commands::check::command())
}

fn dispatch(
    session: &CliSession,
    matches: &ArgMatches,
) -> Result<commands::CommandResult, CliError> {
    match matches.subcommand() {
        Some(("generate", sub)) => commands::generate::run(session, sub),
        Some(("index", sub)) => commands::index::run(session, sub),
        Some(("build", sub)) => commands::build::run(session, sub),
        Some(("check", _)) => commands::check::run(session),
        _ => Err(CliError::new("missing command", ExitStatus::Usage)),
    }
}
