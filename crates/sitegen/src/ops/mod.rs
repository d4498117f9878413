pub mod generate;
pub mod index;

pub use generate::{
    DraftOutcome, DraftReport, GenerateOptions, GenerationReport, PageWrite, check_drafts,
    generate_pages, generate_with,
};
pub use index::{IndexOptions, IndexReport, ResourceSummary, collect_resources, regenerate_index};

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::SitegenError;

/// Markdown drafts directly inside `dir`, sorted by file name. A missing directory
/// yields no drafts.
pub(crate) fn list_drafts(dir: &Path) -> Result<Vec<PathBuf>, SitegenError> {
    if !dir.is_dir() {
        tracing::info!(path = %dir.display(), "no drafts directory found");
        return Ok(Vec::new());
    }

    let mut drafts = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry?;
        let is_markdown = entry.path().extension().is_some_and(|ext| ext == "md");
        if entry.file_type().is_file() && is_markdown {
            drafts.push(entry.into_path());
        }
    }
    Ok(drafts)
}

/// File name used to identify a draft in reports.
pub(crate) fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Writes `contents` unless the file already holds exactly that. Returns whether a write
/// happened.
pub(crate) fn write_if_changed(path: &Path, contents: &str) -> Result<bool, SitegenError> {
    if fs::read_to_string(path).is_ok_and(|existing| existing == contents) {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents).map_err(|err| SitegenError::from(err).context(path.display()))?;
    Ok(true)
}
