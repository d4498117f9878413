pub mod clock;
pub mod config;
pub mod error;
pub mod front_matter;
pub mod inspect;
pub mod manifest;
pub mod markdown;
pub mod ops;
pub mod page;
pub mod resources;
pub mod site;
pub mod slug;
pub mod validation;

pub use clock::{Clock, DEFAULT_TIMEZONE, FixedClock, ZonedClock, format_date, parse_date};
pub use config::{CONFIG_FILE, SiteConfig};
pub use error::SitegenError;
pub use front_matter::{
    FrontMatter, FrontMatterValue, NestedMapping, ParsedDocument, parse_document,
    parse_front_matter, split_front_matter,
};
pub use inspect::{PageFinding, inspect_page};
pub use manifest::{FALLBACK_TAG_TYPES, Manifest, ManifestResource, TagVocabulary};
pub use markdown::{InlineImage, markdown_to_html, render_inline};
pub use ops::{
    DraftOutcome, DraftReport, GenerateOptions, GenerationReport, IndexOptions, IndexReport,
    PageWrite, ResourceSummary, check_drafts, collect_resources, generate_pages, generate_with,
    regenerate_index,
};
pub use page::{PLACEHOLDERS, PageRenderer, PageTemplate, RenderedPage};
pub use resources::{
    ResourceRecord, ResourceSet, ResourceSource, render_card, render_grid, sort_newest_first,
    splice_resource_grid,
};
pub use site::{FilesystemSiteLocator, Site, SiteLocator, SitePaths, discover as discover_site};
pub use slug::{is_valid_slug, slugify};
pub use validation::{DraftIssue, HeroImage, REQUIRED_FIELDS, ResourceDraft, validate_draft};
