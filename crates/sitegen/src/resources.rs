use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::error::SitegenError;
use crate::front_matter::FrontMatter;
use crate::manifest::{Manifest, ManifestResource};

/// Where a resource record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceSource {
    Manifest,
    Draft,
}

impl fmt::Display for ResourceSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ResourceSource::Manifest => "manifest",
            ResourceSource::Draft => "draft",
        };
        write!(f, "{label}")
    }
}

/// One entry of the resource listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRecord {
    pub slug: String,
    pub title: String,
    pub short_title: String,
    pub description: String,
    pub category: String,
    pub tag_type: String,
    pub publish_date: String,
    pub source: ResourceSource,
}

impl ResourceRecord {
    /// Builds a manifest record. Entries without `slug` or `publishDate` are not listed.
    pub fn from_manifest(entry: &ManifestResource) -> Option<Self> {
        if entry.slug.is_empty() || entry.publish_date.is_empty() {
            return None;
        }
        Some(Self {
            slug: entry.slug.clone(),
            title: entry.title.clone(),
            short_title: entry.short_title.clone(),
            description: entry.description.clone(),
            category: entry.category.clone(),
            tag_type: entry.tag_type.clone(),
            publish_date: entry.publish_date.clone(),
            source: ResourceSource::Manifest,
        })
    }

    /// Builds a draft record. Drafts without `slug` or `publishDate` are not listed.
    pub fn from_front_matter(front_matter: &FrontMatter) -> Option<Self> {
        let field = |key: &str| {
            front_matter
                .text(key)
                .map(|value| value.into_owned())
                .unwrap_or_default()
        };
        let slug = field("slug");
        let publish_date = field("publishDate");
        if slug.is_empty() || publish_date.is_empty() {
            return None;
        }

        Some(Self {
            slug,
            title: field("title"),
            short_title: field("shortTitle"),
            description: field("description"),
            category: field("category"),
            tag_type: field("tagType"),
            publish_date,
            source: ResourceSource::Draft,
        })
    }

    pub fn is_published(&self, today: &str) -> bool {
        self.publish_date.as_str() <= today
    }
}

/// Resource records keyed by slug, in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceSet {
    records: Vec<ResourceRecord>,
}

impl ResourceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Manifest records first, then drafts; a draft replaces a same-slug record in place.
    pub fn from_sources<I>(manifest: &Manifest, drafts: I) -> Self
    where
        I: IntoIterator<Item = ResourceRecord>,
    {
        let mut set = Self::new();
        for entry in &manifest.resources {
            match ResourceRecord::from_manifest(entry) {
                Some(record) => set.upsert(record),
                None => tracing::debug!(
                    slug = %entry.slug,
                    "manifest resource has no slug or publishDate; not listed"
                ),
            }
        }
        for record in drafts {
            set.upsert(record);
        }
        set
    }

    /// Inserts a record, overwriting any record with the same slug at its position.
    pub fn upsert(&mut self, record: ResourceRecord) {
        match self.records.iter_mut().find(|existing| existing.slug == record.slug) {
            Some(existing) => {
                tracing::debug!(
                    slug = %record.slug,
                    replaced = %existing.source,
                    by = %record.source,
                    "resource record replaced"
                );
                *existing = record;
            }
            None => self.records.push(record),
        }
    }

    pub fn records(&self) -> &[ResourceRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Splits into (published, scheduled) relative to `today` (`YYYY-MM-DD`), keeping
    /// discovery order in both halves.
    pub fn partition_by_date(&self, today: &str) -> (Vec<ResourceRecord>, Vec<ResourceRecord>) {
        self.records
            .iter()
            .cloned()
            .partition(|record| record.is_published(today))
    }
}

/// Newest first. The sort is stable, so equal dates keep discovery order.
pub fn sort_newest_first(records: &mut [ResourceRecord]) {
    records.sort_by(|a, b| b.publish_date.cmp(&a.publish_date));
}

pub fn render_card(resource: &ResourceRecord) -> String {
    format!(
        r#"          <!-- Card: {short_title} -->
          <article class="resource-card">
            <span class="resource-card__tag resource-card__tag--{tag_type}">{category}</span>
            <h3 class="resource-card__title">
              <a href="/resources/{slug}.html">{title}</a>
            </h3>
            <p class="resource-card__description">{description}</p>
            <a href="/resources/{slug}.html" class="resource-card__link">Read Guide &rarr;</a>
          </article>"#,
        short_title = resource.short_title,
        tag_type = resource.tag_type,
        category = resource.category,
        slug = resource.slug,
        title = resource.title,
        description = resource.description,
    )
}

/// Renders the grid block. The opening tag carries no indentation of its own so that
/// splicing it back over the previous grid keeps the index byte-stable across runs.
pub fn render_grid(published: &[ResourceRecord]) -> String {
    let cards: Vec<String> = published.iter().map(render_card).collect();
    format!(
        "<div class=\"resource-grid resource-grid--2col\">\n{}\n        </div>",
        cards.join("\n\n")
    )
}

/// Replaces the resource grid in `index_html` (from the grid's opening tag through the
/// `</div>` right before the section footer) with `grid`. Nothing else changes.
pub fn splice_resource_grid(index_html: &str, grid: &str) -> Result<String, SitegenError> {
    static GRID: OnceLock<Regex> = OnceLock::new();
    let re = GRID.get_or_init(|| {
        Regex::new(
            r#"(?s)<div class="resource-grid resource-grid--2col">.*?</div>\s*\n\s*<div class="section__footer">"#,
        )
        .expect("Invalid regex")
    });

    let found = re.find(index_html).ok_or_else(|| {
        SitegenError::Index(
            "resource grid region (resource-grid--2col followed by section__footer) not found"
                .into(),
        )
    })?;

    let mut html = String::with_capacity(index_html.len() + grid.len());
    html.push_str(&index_html[..found.start()]);
    html.push_str(grid);
    html.push_str("\n\n        <div class=\"section__footer\">");
    html.push_str(&index_html[found.end()..]);
    Ok(html)
}
