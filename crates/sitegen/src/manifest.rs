use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SitegenError;

/// Tag types accepted when the manifest cannot be read.
pub const FALLBACK_TAG_TYPES: [&str; 6] = [
    "fleet",
    "construction",
    "critical",
    "decision",
    "healthcare",
    "manufacturing",
];

/// `resources.manifest.json`: the controlled tag vocabulary and legacy published resources.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    /// Keys in manifest order.
    #[serde(default)]
    pub category_tags: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    pub resources: Vec<ManifestResource>,
}

/// A legacy resource listed in the manifest. Missing text fields read as empty.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct ManifestResource {
    pub slug: String,
    pub title: String,
    pub short_title: String,
    pub description: String,
    pub category: String,
    pub tag_type: String,
    pub publish_date: String,
}

impl Manifest {
    pub fn from_json(raw: &str) -> Result<Self, SitegenError> {
        serde_json::from_str(raw).map_err(|err| SitegenError::Manifest(err.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self, SitegenError> {
        let raw = fs::read_to_string(path).map_err(|err| {
            SitegenError::Manifest(err.to_string()).context(path.display())
        })?;
        Self::from_json(&raw).map_err(|err| err.context(path.display()))
    }

    /// Loads the manifest when present; a missing file yields an empty manifest.
    pub fn load_optional(path: &Path) -> Result<Self, SitegenError> {
        if path.is_file() {
            Self::load(path)
        } else {
            tracing::debug!(path = %path.display(), "no manifest; starting from drafts only");
            Ok(Self::default())
        }
    }

    pub fn vocabulary(&self) -> TagVocabulary {
        TagVocabulary {
            tags: self.category_tags.keys().cloned().collect(),
            fallback: false,
        }
    }
}

/// Controlled `tagType` vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagVocabulary {
    tags: Vec<String>,
    fallback: bool,
}

impl TagVocabulary {
    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tags: tags.into_iter().map(Into::into).collect(),
            fallback: false,
        }
    }

    pub fn fallback() -> Self {
        Self {
            tags: FALLBACK_TAG_TYPES.iter().map(|tag| tag.to_string()).collect(),
            fallback: true,
        }
    }

    /// Reads the vocabulary from the manifest's `categoryTags` keys, degrading to
    /// [`FALLBACK_TAG_TYPES`] with a warning when the manifest is unusable.
    pub fn load_or_fallback(path: &Path) -> Self {
        match Manifest::load(path) {
            Ok(manifest) => manifest.vocabulary(),
            Err(err) => {
                tracing::warn!(error = %err, "could not load manifest; using built-in tag types");
                Self::fallback()
            }
        }
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.tags.iter().any(|known| known == tag)
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn is_fallback(&self) -> bool {
        self.fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const MANIFEST: &str = r#"{
        "categoryTags": { "fleet": "Fleet Operations", "farm": { "label": "Agriculture" } },
        "resources": [
            { "slug": "legacy-guide", "title": "Legacy Guide", "shortTitle": "Legacy",
              "description": "Old but good", "category": "Fleet Operations",
              "tagType": "fleet", "publishDate": "2025-03-01", "extra": true }
        ]
    }"#;

    #[test]
    fn parses_vocabulary_and_resources() {
        let manifest = Manifest::from_json(MANIFEST).unwrap();
        let vocabulary = manifest.vocabulary();
        assert_eq!(vocabulary.tags(), ["fleet".to_string(), "farm".to_string()]);
        assert!(vocabulary.contains("farm"));
        assert!(!vocabulary.contains("Fleet"));
        assert!(!vocabulary.is_fallback());

        assert_eq!(manifest.resources.len(), 1);
        assert_eq!(manifest.resources[0].short_title, "Legacy");
        assert_eq!(manifest.resources[0].publish_date, "2025-03-01");
    }

    #[test]
    fn resource_fields_default_to_empty() {
        let manifest = Manifest::from_json(r#"{"resources":[{"slug":"bare"}]}"#).unwrap();
        assert_eq!(manifest.resources[0].title, "");
        assert!(manifest.category_tags.is_empty());
    }

    #[test]
    fn unreadable_manifest_falls_back() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("resources.manifest.json");

        let missing = TagVocabulary::load_or_fallback(&path);
        assert!(missing.is_fallback());
        assert!(missing.contains("healthcare"));

        fs::write(&path, "{ not json").unwrap();
        let broken = TagVocabulary::load_or_fallback(&path);
        assert_eq!(broken, TagVocabulary::fallback());
    }

    #[test]
    fn load_optional_tolerates_absence_but_not_corruption() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("resources.manifest.json");
        assert!(Manifest::load_optional(&path).unwrap().resources.is_empty());

        fs::write(&path, "[]").unwrap();
        let err = Manifest::load_optional(&path).unwrap_err();
        assert!(matches!(err, SitegenError::Manifest(_)));
    }
}
