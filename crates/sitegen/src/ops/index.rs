use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use chrono::NaiveDate;
use serde::Serialize;

use crate::clock::format_date;
use crate::error::SitegenError;
use crate::front_matter::parse_document;
use crate::manifest::Manifest;
use crate::ops::{display_name, list_drafts, write_if_changed};
use crate::resources::{
    ResourceRecord, ResourceSet, ResourceSource, render_grid, sort_newest_first,
    splice_resource_grid,
};
use crate::site::SitePaths;

#[derive(Clone, Copy, Debug)]
pub struct IndexOptions {
    pub today: NaiveDate,
    pub dry_run: bool,
}

/// Condensed view of a record for reports.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceSummary {
    pub slug: String,
    pub short_title: String,
    pub publish_date: String,
    pub source: ResourceSource,
}

impl From<&ResourceRecord> for ResourceSummary {
    fn from(record: &ResourceRecord) -> Self {
        Self {
            slug: record.slug.clone(),
            short_title: record.short_title.clone(),
            publish_date: record.publish_date.clone(),
            source: record.source,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct IndexReport {
    pub today: String,
    pub total: usize,
    pub published: Vec<ResourceSummary>,
    pub scheduled: Vec<ResourceSummary>,
    /// Slugs whose publish date is exactly today.
    pub newly_published: Vec<String>,
    pub index: PathBuf,
    pub changed: bool,
    pub dry_run: bool,
}

/// Manifest resources followed by draft records in file name order. An absent manifest
/// counts as empty; an unreadable one is an error. When two drafts share a slug only the
/// first file is listed, matching the page the generator renders for it.
pub fn collect_resources(paths: &SitePaths) -> Result<ResourceSet, SitegenError> {
    let manifest = Manifest::load_optional(paths.manifest_path())?;

    let mut drafts = Vec::new();
    let mut claimed: HashMap<String, String> = HashMap::new();
    for path in list_drafts(paths.drafts_dir())? {
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!(file = %display_name(&path), error = %err, "draft could not be read; not listed");
                continue;
            }
        };
        let Some(front_matter) = parse_document(&content).front_matter else {
            continue;
        };
        let file = display_name(&path);
        match ResourceRecord::from_front_matter(&front_matter) {
            Some(record) => {
                if let Some(first) = claimed.get(&record.slug) {
                    tracing::warn!(
                        file = %file,
                        slug = %record.slug,
                        first = %first,
                        "draft slug already claimed; not listed"
                    );
                    continue;
                }
                claimed.insert(record.slug.clone(), file);
                drafts.push(record);
            }
            None => tracing::debug!(
                file = %file,
                "draft has no slug or publishDate; not listed"
            ),
        }
    }

    Ok(ResourceSet::from_sources(&manifest, drafts))
}

/// Rebuilds the resource grid of the index page from everything published as of
/// `options.today`.
pub fn regenerate_index(
    paths: &SitePaths,
    options: &IndexOptions,
) -> Result<IndexReport, SitegenError> {
    let index_path = paths.index_path();
    if !index_path.is_file() {
        return Err(SitegenError::MissingInput(index_path.to_path_buf()));
    }

    let today = format_date(options.today);
    let resources = collect_resources(paths)?;
    let (mut published, scheduled) = resources.partition_by_date(&today);
    sort_newest_first(&mut published);

    let current = fs::read_to_string(index_path)?;
    let updated = splice_resource_grid(&current, &render_grid(&published))
        .map_err(|err| err.context(index_path.display()))?;
    let changed = updated != current;

    if changed && !options.dry_run {
        write_if_changed(index_path, &updated)?;
    }

    let newly_published: Vec<String> = published
        .iter()
        .filter(|record| record.publish_date == today)
        .map(|record| record.slug.clone())
        .collect();

    tracing::info!(
        today = %today,
        total = resources.len(),
        published = published.len(),
        scheduled = scheduled.len(),
        changed,
        "index regenerated"
    );

    Ok(IndexReport {
        today,
        total: resources.len(),
        published: published.iter().map(ResourceSummary::from).collect(),
        scheduled: scheduled.iter().map(ResourceSummary::from).collect(),
        newly_published,
        index: index_path.to_path_buf(),
        changed,
        dry_run: options.dry_run,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::parse_date;
    use tempfile::tempdir;

    const INDEX: &str = "<section>\n        <div class=\"resource-grid resource-grid--2col\">\n        </div>\n\n        <div class=\"section__footer\">\n        </div>\n</section>\n";

    fn draft(slug: &str, date: &str) -> String {
        format!("---\nslug: {slug}\ntitle: {slug}\nshortTitle: {slug}\npublishDate: {date}\ntagType: fleet\n---\nBody\n")
    }

    fn site() -> (tempfile::TempDir, SitePaths) {
        let temp = tempdir().unwrap();
        let paths = SitePaths::new(temp.path());
        fs::create_dir_all(paths.drafts_dir()).unwrap();
        fs::write(paths.index_path(), INDEX).unwrap();
        (temp, paths)
    }

    fn options(today: &str, dry_run: bool) -> IndexOptions {
        IndexOptions {
            today: parse_date(today).unwrap(),
            dry_run,
        }
    }

    #[test]
    fn publishes_up_to_today() {
        let (_temp, paths) = site();
        fs::write(paths.drafts_dir().join("a.md"), draft("past", "2026-01-10")).unwrap();
        fs::write(paths.drafts_dir().join("b.md"), draft("today", "2026-01-15")).unwrap();
        fs::write(paths.drafts_dir().join("c.md"), draft("future", "2026-01-20")).unwrap();

        let report = regenerate_index(&paths, &options("2026-01-15", false)).unwrap();
        assert_eq!(report.total, 3);
        let published: Vec<_> = report.published.iter().map(|r| r.slug.as_str()).collect();
        assert_eq!(published, vec!["today", "past"]);
        assert_eq!(report.scheduled[0].slug, "future");
        assert_eq!(report.newly_published, vec!["today".to_string()]);
        assert!(report.changed);

        let html = fs::read_to_string(paths.index_path()).unwrap();
        assert!(html.contains("/resources/today.html"));
        assert!(!html.contains("/resources/future.html"));
    }

    #[test]
    fn second_run_is_unchanged() {
        let (_temp, paths) = site();
        fs::write(paths.drafts_dir().join("a.md"), draft("past", "2026-01-10")).unwrap();
        assert!(regenerate_index(&paths, &options("2026-01-15", false)).unwrap().changed);
        let before = fs::read_to_string(paths.index_path()).unwrap();

        let report = regenerate_index(&paths, &options("2026-01-15", false)).unwrap();
        assert!(!report.changed);
        assert_eq!(fs::read_to_string(paths.index_path()).unwrap(), before);
    }

    #[test]
    fn dry_run_leaves_index_alone() {
        let (_temp, paths) = site();
        fs::write(paths.drafts_dir().join("a.md"), draft("past", "2026-01-10")).unwrap();
        let report = regenerate_index(&paths, &options("2026-01-15", true)).unwrap();
        assert!(report.changed && report.dry_run);
        assert_eq!(fs::read_to_string(paths.index_path()).unwrap(), INDEX);
    }

    #[test]
    fn broken_manifest_is_an_error() {
        let (_temp, paths) = site();
        fs::write(paths.manifest_path(), "{ not json").unwrap();
        let err = regenerate_index(&paths, &options("2026-01-15", false)).unwrap_err();
        assert!(matches!(err, SitegenError::Manifest(_)));
    }

    #[test]
    fn missing_anchor_is_an_error() {
        let (_temp, paths) = site();
        fs::write(paths.index_path(), "<main></main>").unwrap();
        let err = regenerate_index(&paths, &options("2026-01-15", false)).unwrap_err();
        assert!(matches!(err, SitegenError::Index(_)));
        assert_eq!(fs::read_to_string(paths.index_path()).unwrap(), "<main></main>");
    }

    #[test]
    fn first_draft_keeps_a_shared_slug() {
        let (_temp, paths) = site();
        let first = draft("dup", "2026-01-10").replace("title: dup", "title: First");
        let second = draft("dup", "2026-01-12").replace("title: dup", "title: Second");
        fs::write(paths.drafts_dir().join("a.md"), first).unwrap();
        fs::write(paths.drafts_dir().join("b.md"), second).unwrap();

        let set = collect_resources(&paths).unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.records()[0].title, "First");
        assert_eq!(set.records()[0].publish_date, "2026-01-10");
    }

    #[test]
    fn drafts_without_dates_are_not_listed() {
        let (_temp, paths) = site();
        fs::write(paths.drafts_dir().join("a.md"), "---\nslug: undated\n---\n").unwrap();
        fs::write(paths.drafts_dir().join("b.md"), "no header").unwrap();
        let set = collect_resources(&paths).unwrap();
        assert!(set.is_empty());
    }
}
