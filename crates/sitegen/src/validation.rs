use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use crate::front_matter::{FrontMatter, FrontMatterValue};
use crate::manifest::TagVocabulary;
use crate::markdown::InlineImage;
use crate::slug::{is_valid_slug, slugify};

/// Front matter keys every draft must carry.
pub const REQUIRED_FIELDS: [&str; 8] = [
    "slug",
    "title",
    "shortTitle",
    "description",
    "category",
    "tagType",
    "publishDate",
    "readTimeMinutes",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeroImage {
    pub src: String,
    pub alt: String,
}

/// Typed view of a draft that passed the validation gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDraft {
    pub slug: String,
    pub title: String,
    pub short_title: String,
    pub description: String,
    pub category: String,
    pub tag_type: String,
    pub publish_date: String,
    pub read_time_minutes: u32,
    pub hero: HeroImage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inline_image: Option<InlineImage>,
}

impl ResourceDraft {
    /// Output file name, `<slug>.html`.
    pub fn page_file_name(&self) -> String {
        format!("{}.html", self.slug)
    }
}

/// Why a draft was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DraftIssue {
    MissingFields { fields: Vec<String> },
    MissingHeroImage,
    InvalidTagType { value: String, allowed: Vec<String> },
    InvalidPublishDate { value: String },
    InvalidReadTime { value: String },
    InvalidSlug { value: String, suggestion: String },
    DuplicateSlug { slug: String, first: String },
}

impl fmt::Display for DraftIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DraftIssue::MissingFields { fields } => {
                write!(f, "missing required fields: {}", fields.join(", "))
            }
            DraftIssue::MissingHeroImage => {
                write!(f, "missing hero image (hero.src and hero.alt required)")
            }
            DraftIssue::InvalidTagType { value, allowed } => write!(
                f,
                "invalid tagType \"{value}\"; valid tagTypes: {}",
                allowed.join(", ")
            ),
            DraftIssue::InvalidPublishDate { value } => {
                write!(f, "publishDate must be a YYYY-MM-DD calendar date, got \"{value}\"")
            }
            DraftIssue::InvalidReadTime { value } => {
                write!(f, "readTimeMinutes must be a positive integer, got \"{value}\"")
            }
            DraftIssue::InvalidSlug { value, suggestion } if suggestion.is_empty() => write!(
                f,
                "slug \"{value}\" must be lowercase alphanumeric with hyphens only"
            ),
            DraftIssue::InvalidSlug { value, suggestion } => write!(
                f,
                "slug \"{value}\" must be lowercase alphanumeric with hyphens only (try \"{suggestion}\")"
            ),
            DraftIssue::DuplicateSlug { slug, first } => {
                write!(f, "slug \"{slug}\" is already used by {first}")
            }
        }
    }
}

fn is_present(value: Option<&FrontMatterValue>) -> bool {
    match value {
        Some(FrontMatterValue::String(text)) => !text.is_empty(),
        Some(FrontMatterValue::Integer(number)) => *number != 0,
        Some(FrontMatterValue::Null) | Some(FrontMatterValue::Mapping(_)) | None => false,
    }
}

fn display_value(value: Option<&FrontMatterValue>) -> String {
    match value {
        Some(FrontMatterValue::String(text)) => text.clone(),
        Some(FrontMatterValue::Integer(number)) => number.to_string(),
        Some(FrontMatterValue::Null) => "null".into(),
        Some(FrontMatterValue::Mapping(_)) => "<mapping>".into(),
        None => String::new(),
    }
}

/// Checks `publishDate` as `YYYY-MM-DD` naming a real calendar day.
pub fn is_valid_publish_date(value: &str) -> bool {
    let shaped = value.len() == 10
        && value.bytes().enumerate().all(|(idx, b)| match idx {
            4 | 7 => b == b'-',
            _ => b.is_ascii_digit(),
        });
    shaped && NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
}

/// The validation gate. All problems are collected so a single run reports everything
/// wrong with a draft.
pub fn validate_draft(
    front_matter: &FrontMatter,
    vocabulary: &TagVocabulary,
) -> Result<ResourceDraft, Vec<DraftIssue>> {
    let mut issues = Vec::new();

    let missing: Vec<String> = REQUIRED_FIELDS
        .iter()
        .filter(|field| !is_present(front_matter.get(field)))
        .map(|field| field.to_string())
        .collect();
    if !missing.is_empty() {
        issues.push(DraftIssue::MissingFields { fields: missing });
    }

    let hero = front_matter.mapping("hero").and_then(|hero| {
        let src = hero.get("src").filter(|src| !src.is_empty())?;
        let alt = hero.get("alt").filter(|alt| !alt.is_empty())?;
        Some(HeroImage {
            src: src.clone(),
            alt: alt.clone(),
        })
    });
    if hero.is_none() {
        issues.push(DraftIssue::MissingHeroImage);
    }

    let text = |key: &str| {
        front_matter
            .text(key)
            .map(|value| value.into_owned())
            .unwrap_or_default()
    };

    let tag_type = text("tagType");
    if !tag_type.is_empty() && !vocabulary.contains(&tag_type) {
        issues.push(DraftIssue::InvalidTagType {
            value: tag_type.clone(),
            allowed: vocabulary.tags().to_vec(),
        });
    }

    let publish_date = text("publishDate");
    if !publish_date.is_empty() && !is_valid_publish_date(&publish_date) {
        issues.push(DraftIssue::InvalidPublishDate {
            value: publish_date.clone(),
        });
    }

    let read_time = match front_matter.get("readTimeMinutes") {
        Some(FrontMatterValue::Integer(minutes)) => u32::try_from(*minutes).ok(),
        _ => None,
    };
    let read_time_value = front_matter.get("readTimeMinutes");
    if is_present(read_time_value) && read_time.is_none_or(|minutes| minutes == 0) {
        issues.push(DraftIssue::InvalidReadTime {
            value: display_value(read_time_value),
        });
    }

    let slug = text("slug");
    if !slug.is_empty() && !is_valid_slug(&slug) {
        issues.push(DraftIssue::InvalidSlug {
            suggestion: slugify(&slug),
            value: slug.clone(),
        });
    }

    if !issues.is_empty() {
        return Err(issues);
    }
    let (Some(hero), Some(read_time_minutes)) = (hero, read_time) else {
        return Err(vec![DraftIssue::MissingHeroImage]);
    };

    let inline_image = front_matter.mapping("inlineImage").map(|image| InlineImage {
        src: image.get("src").cloned(),
        alt: image.get("alt").cloned(),
        insert_after: image.get("insertAfter").cloned(),
    });

    Ok(ResourceDraft {
        slug,
        title: text("title"),
        short_title: text("shortTitle"),
        description: text("description"),
        category: text("category"),
        tag_type,
        publish_date,
        read_time_minutes,
        hero,
        inline_image,
    })
}
