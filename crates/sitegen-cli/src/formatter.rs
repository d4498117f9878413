use std::process::ExitCode;

use sitegen::{DraftOutcome, GenerationReport, IndexReport, PageWrite, ResourceSummary};

use crate::commands::CommandResult;
use crate::context::CliSession;
use crate::error::CliError;
use crate::util::site_relative;

pub enum OutputFormat {
    Text,
    Json,
}

/// Prints a `CommandResult` as text or a single JSON object and maps it to an exit code.
pub fn emit_result(
    session: &CliSession,
    result: CommandResult,
    format: OutputFormat,
) -> Result<ExitCode, CliError> {
    match format {
        OutputFormat::Text => print_text(session, &result),
        OutputFormat::Json => print_json(&result)?,
    };
    Ok(ExitCode::from(result.exit_status().code()))
}

fn print_text(session: &CliSession, result: &CommandResult) {
    match result {
        CommandResult::Generate { report } => print_generation(session, report),
        CommandResult::Index { timezone, report } => print_index(session, timezone, report),
        CommandResult::Build {
            generation,
            timezone,
            index,
        } => {
            print_generation(session, generation);
            println!();
            print_index(session, timezone, index);
        }
        CommandResult::Check { report } => print_check(report),
    }
}

fn print_json(result: &CommandResult) -> Result<(), CliError> {
    let payload = serde_json::to_string(result)?;
    println!("{payload}");
    Ok(())
}

fn print_generation(session: &CliSession, report: &GenerationReport) {
    if report.dry_run {
        println!("Dry run: no pages written");
    }
    if report.fallback_vocabulary {
        println!("Warning: manifest unavailable, using built-in tag types");
    }

    for draft in &report.drafts {
        match &draft.outcome {
            DraftOutcome::Generated {
                output,
                write,
                findings,
                ..
            } => {
                let status = match write {
                    PageWrite::Written => "written",
                    PageWrite::Unchanged => "unchanged",
                    PageWrite::DryRun => "not written",
                };
                println!(
                    "  [OK] {} -> {} ({status})",
                    draft.file,
                    site_relative(session.paths().root(), output)
                );
                for finding in findings {
                    println!("    ! {finding}");
                }
            }
            DraftOutcome::Valid { slug, .. } => println!("  [OK] {} ({slug})", draft.file),
            DraftOutcome::Skipped { reason } => println!("  [SKIP] {}: {reason}", draft.file),
            DraftOutcome::Rejected { issues } => {
                println!("  [ERR] {}:", draft.file);
                for issue in issues {
                    println!("    - {issue}");
                }
            }
            DraftOutcome::Unreadable { message } => {
                println!("  [ERR] {}: {message}", draft.file)
            }
        }
    }

    println!(
        "Summary: {} generated, {} skipped, {} errors",
        report.generated, report.skipped, report.errors
    );
}

fn print_check(report: &GenerationReport) {
    for draft in &report.drafts {
        match &draft.outcome {
            DraftOutcome::Valid {
                slug, publish_date, ..
            } => println!("  [OK] {} ({slug}, publishes {publish_date})", draft.file),
            DraftOutcome::Skipped { reason } => println!("  [SKIP] {}: {reason}", draft.file),
            DraftOutcome::Rejected { issues } => {
                println!("  [ERR] {}:", draft.file);
                for issue in issues {
                    println!("    - {issue}");
                }
            }
            DraftOutcome::Unreadable { message } => {
                println!("  [ERR] {}: {message}", draft.file)
            }
            DraftOutcome::Generated { slug, .. } => println!("  [OK] {} ({slug})", draft.file),
        }
    }
    println!(
        "Check: {} valid, {} skipped, {} errors",
        report.generated, report.skipped, report.errors
    );
}

fn print_index(session: &CliSession, timezone: &str, report: &IndexReport) {
    println!("Today ({timezone}): {}", report.today);
    println!("Total resources: {}", report.total);

    println!("Published (publishDate <= today): {}", report.published.len());
    for resource in &report.published {
        print_summary(resource);
    }
    println!("Scheduled for future: {}", report.scheduled.len());
    for resource in &report.scheduled {
        print_summary(resource);
    }
    if !report.newly_published.is_empty() {
        println!("Newly published today: {}", report.newly_published.join(", "));
    }

    let index = site_relative(session.paths().root(), &report.index);
    match (report.changed, report.dry_run) {
        (true, false) => println!("Updated {index}"),
        (true, true) => println!("Dry run: {index} would be updated"),
        (false, _) => println!("{index} unchanged"),
    }
}

fn print_summary(resource: &ResourceSummary) {
    println!(
        "  - {}  {} ({})",
        resource.publish_date, resource.slug, resource.source
    );
}
