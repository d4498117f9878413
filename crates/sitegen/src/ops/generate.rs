use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::SitegenError;
use crate::front_matter::parse_document;
use crate::inspect::{PageFinding, inspect_page};
use crate::manifest::TagVocabulary;
use crate::ops::{display_name, list_drafts, write_if_changed};
use crate::page::{PageRenderer, PageTemplate};
use crate::site::SitePaths;
use crate::validation::{DraftIssue, validate_draft};

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct GenerateOptions {
    #[serde(default)]
    pub dry_run: bool,
}

/// What happened to a rendered page on disk.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PageWrite {
    Written,
    Unchanged,
    DryRun,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DraftOutcome {
    Generated {
        slug: String,
        output: PathBuf,
        publish_date: String,
        write: PageWrite,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        findings: Vec<PageFinding>,
    },
    /// Passed validation in a check run; nothing was rendered.
    Valid { slug: String, publish_date: String },
    Skipped { reason: String },
    Rejected { issues: Vec<DraftIssue> },
    Unreadable { message: String },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DraftReport {
    pub file: String,
    #[serde(flatten)]
    pub outcome: DraftOutcome,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct GenerationReport {
    pub drafts: Vec<DraftReport>,
    pub generated: usize,
    pub skipped: usize,
    pub errors: usize,
    pub dry_run: bool,
    pub fallback_vocabulary: bool,
}

impl GenerationReport {
    fn record(&mut self, file: String, outcome: DraftOutcome) {
        match &outcome {
            DraftOutcome::Generated { .. } | DraftOutcome::Valid { .. } => self.generated += 1,
            DraftOutcome::Skipped { .. } => self.skipped += 1,
            DraftOutcome::Rejected { .. } | DraftOutcome::Unreadable { .. } => self.errors += 1,
        }
        self.drafts.push(DraftReport { file, outcome });
    }

    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }

    /// Pages actually written to disk in this run.
    pub fn written(&self) -> usize {
        self.drafts
            .iter()
            .filter(|report| {
                matches!(
                    report.outcome,
                    DraftOutcome::Generated {
                        write: PageWrite::Written,
                        ..
                    }
                )
            })
            .count()
    }
}

enum Mode<'a> {
    Render {
        renderer: &'a dyn PageRenderer,
        dry_run: bool,
    },
    Check,
}

/// Renders every draft under the site's drafts directory with the site template.
pub fn generate_pages(
    paths: &SitePaths,
    options: &GenerateOptions,
) -> Result<GenerationReport, SitegenError> {
    let drafts = list_drafts(paths.drafts_dir())?;
    if drafts.is_empty() {
        return Ok(GenerationReport {
            dry_run: options.dry_run,
            ..GenerationReport::default()
        });
    }

    let template = PageTemplate::load(paths.template_path())?;
    process(
        paths,
        &drafts,
        Mode::Render {
            renderer: &template,
            dry_run: options.dry_run,
        },
    )
}

/// Same as [`generate_pages`] with a caller-supplied renderer.
pub fn generate_with(
    paths: &SitePaths,
    renderer: &dyn PageRenderer,
    options: &GenerateOptions,
) -> Result<GenerationReport, SitegenError> {
    let drafts = list_drafts(paths.drafts_dir())?;
    process(
        paths,
        &drafts,
        Mode::Render {
            renderer,
            dry_run: options.dry_run,
        },
    )
}

/// Parses and validates every draft without rendering or writing anything.
pub fn check_drafts(paths: &SitePaths) -> Result<GenerationReport, SitegenError> {
    let drafts = list_drafts(paths.drafts_dir())?;
    let mut report = process(paths, &drafts, Mode::Check)?;
    report.dry_run = true;
    Ok(report)
}

fn process(
    paths: &SitePaths,
    drafts: &[PathBuf],
    mode: Mode<'_>,
) -> Result<GenerationReport, SitegenError> {
    let vocabulary = TagVocabulary::load_or_fallback(paths.manifest_path());
    let mut report = GenerationReport {
        dry_run: matches!(mode, Mode::Render { dry_run: true, .. }),
        fallback_vocabulary: vocabulary.is_fallback(),
        ..GenerationReport::default()
    };
    let mut claimed: HashMap<String, String> = HashMap::new();

    for path in drafts {
        let file = display_name(path);
        let outcome = process_draft(paths, path, &file, &vocabulary, &mut claimed, &mode)?;
        log_outcome(&file, &outcome);
        report.record(file, outcome);
    }

    tracing::info!(
        generated = report.generated,
        skipped = report.skipped,
        errors = report.errors,
        "draft processing finished"
    );
    Ok(report)
}

fn process_draft(
    paths: &SitePaths,
    path: &Path,
    file: &str,
    vocabulary: &TagVocabulary,
    claimed: &mut HashMap<String, String>,
    mode: &Mode<'_>,
) -> Result<DraftOutcome, SitegenError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) => {
            return Ok(DraftOutcome::Unreadable {
                message: err.to_string(),
            });
        }
    };

    let document = parse_document(&content);
    let Some(front_matter) = document.front_matter else {
        return Ok(DraftOutcome::Skipped {
            reason: "no front matter".into(),
        });
    };

    let draft = match validate_draft(&front_matter, vocabulary) {
        Ok(draft) => draft,
        Err(issues) => return Ok(DraftOutcome::Rejected { issues }),
    };

    if let Some(first) = claimed.get(&draft.slug) {
        return Ok(DraftOutcome::Rejected {
            issues: vec![DraftIssue::DuplicateSlug {
                slug: draft.slug.clone(),
                first: first.clone(),
            }],
        });
    }
    claimed.insert(draft.slug.clone(), file.to_string());

    let (renderer, dry_run) = match mode {
        Mode::Check => {
            return Ok(DraftOutcome::Valid {
                slug: draft.slug,
                publish_date: draft.publish_date,
            });
        }
        Mode::Render { renderer, dry_run } => (*renderer, *dry_run),
    };

    let page = renderer.render(&draft, &document.body);
    let findings = inspect_page(&page.html, &draft);
    let output = paths.page_path(&draft.slug);

    let write = if dry_run {
        PageWrite::DryRun
    } else if write_if_changed(&output, &page.html)? {
        PageWrite::Written
    } else {
        PageWrite::Unchanged
    };

    Ok(DraftOutcome::Generated {
        slug: draft.slug,
        output,
        publish_date: draft.publish_date,
        write,
        findings,
    })
}

fn log_outcome(file: &str, outcome: &DraftOutcome) {
    match outcome {
        DraftOutcome::Generated {
            output,
            write,
            findings,
            ..
        } => {
            tracing::debug!(file, output = %output.display(), ?write, "page rendered");
            for finding in findings {
                tracing::warn!(file, %finding, "generated page failed inspection");
            }
        }
        DraftOutcome::Valid { slug, .. } => tracing::debug!(file, slug, "draft valid"),
        DraftOutcome::Skipped { reason } => tracing::info!(file, reason, "draft skipped"),
        DraftOutcome::Rejected { issues } => {
            for issue in issues {
                tracing::error!(file, %issue, "draft rejected");
            }
        }
        DraftOutcome::Unreadable { message } => {
            tracing::error!(file, error = %message, "draft could not be read")
        }
    }
}
