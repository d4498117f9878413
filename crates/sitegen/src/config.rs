use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::clock::{DEFAULT_TIMEZONE, ZonedClock};
use crate::error::SitegenError;

/// Name of the optional per-site configuration file at the site root.
pub const CONFIG_FILE: &str = "sitegen.yaml";

/// Optional overrides for the site layout. Every key may be omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Relative to the site root.
    pub resources_dir: Option<PathBuf>,
    /// The remaining paths are relative to `resources_dir`.
    pub drafts_dir: Option<PathBuf>,
    pub template: Option<PathBuf>,
    pub manifest: Option<PathBuf>,
    pub index: Option<PathBuf>,
    pub timezone: Option<String>,
}

impl SiteConfig {
    pub fn from_yaml(raw: &str) -> Result<Self, SitegenError> {
        // An empty file is an empty config, not a YAML null.
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(raw)?)
    }

    /// Reads `sitegen.yaml` under `root`, falling back to defaults when it is absent.
    pub fn load(root: &Path) -> Result<Self, SitegenError> {
        let path = root.join(CONFIG_FILE);
        if !path.is_file() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(&path)?;
        let config = Self::from_yaml(&raw).map_err(|err| err.context(path.display()))?;
        config.clock().map_err(|err| err.context(path.display()))?;
        Ok(config)
    }

    pub fn timezone(&self) -> &str {
        self.timezone.as_deref().unwrap_or(DEFAULT_TIMEZONE)
    }

    pub fn clock(&self) -> Result<ZonedClock, SitegenError> {
        ZonedClock::from_name(self.timezone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn absent_or_empty_config_uses_defaults() {
        let temp = tempdir().unwrap();
        assert_eq!(SiteConfig::load(temp.path()).unwrap(), SiteConfig::default());

        fs::write(temp.path().join(CONFIG_FILE), "\n").unwrap();
        let config = SiteConfig::load(temp.path()).unwrap();
        assert_eq!(config.timezone(), "America/New_York");
    }

    #[test]
    fn overrides_are_read() {
        let config =
            SiteConfig::from_yaml("resources_dir: site/resources\ntimezone: America/Chicago\n")
                .unwrap();
        assert_eq!(config.resources_dir, Some(PathBuf::from("site/resources")));
        assert_eq!(config.timezone(), "America/Chicago");
        assert!(config.clock().is_ok());
    }

    #[test]
    fn unknown_keys_and_zones_are_config_errors() {
        let err = SiteConfig::from_yaml("output: dist\n").unwrap_err();
        assert!(matches!(err, SitegenError::Config(_)));

        let temp = tempdir().unwrap();
        fs::write(temp.path().join(CONFIG_FILE), "timezone: Nowhere/City\n").unwrap();
        let err = SiteConfig::load(temp.path()).unwrap_err();
        assert!(matches!(err, SitegenError::Config(_)));
        assert!(err.to_string().contains(CONFIG_FILE));
    }
}
