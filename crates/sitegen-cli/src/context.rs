use std::path::PathBuf;

use sitegen::{FilesystemSiteLocator, Site, SiteLocator, SitePaths};

use crate::error::CliError;
use crate::util::Verbosity;

pub struct CliSession {
    pub site: Site,
    pub verbosity: Verbosity,
}

impl CliSession {
    /// Resolves the site from `--root`, or by walking up from the current directory.
    pub fn bootstrap(root_override: Option<String>, verbosity: Verbosity) -> Result<Self, CliError> {
        let locator = match root_override {
            Some(path) => FilesystemSiteLocator::at(PathBuf::from(path)),
            None => FilesystemSiteLocator::from_current_dir()?,
        };
        let site = locator.site()?;

        Ok(Self { site, verbosity })
    }

    pub fn paths(&self) -> &SitePaths {
        &self.site.paths
    }

    pub fn timezone(&self) -> &str {
        self.site.config.timezone()
    }
}
