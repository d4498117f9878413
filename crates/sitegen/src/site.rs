use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{CONFIG_FILE, SiteConfig};
use crate::error::SitegenError;

/// Markers that identify a site root while walking up from a start directory.
const ROOT_MARKERS: [&str; 3] = [CONFIG_FILE, ".git", "package.json"];

const RESOURCES_DIR: &str = "resources";
const DRAFTS_DIR: &str = "drafts";
const TEMPLATE_FILE: &str = "TEMPLATE-resource-single.html";
const MANIFEST_FILE: &str = "resources.manifest.json";
const INDEX_FILE: &str = "index.html";

/// Canonical paths for a site.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SitePaths {
    root: PathBuf,
    resources_dir: PathBuf,
    drafts_dir: PathBuf,
    template: PathBuf,
    manifest: PathBuf,
    index: PathBuf,
}

impl SitePaths {
    /// Standard layout under `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_config(root, &SiteConfig::default())
    }

    /// Layout under `root` with `sitegen.yaml` overrides applied.
    pub fn with_config(root: impl Into<PathBuf>, config: &SiteConfig) -> Self {
        let root = root.into();
        let resources_dir = root.join(
            config
                .resources_dir
                .as_deref()
                .unwrap_or(Path::new(RESOURCES_DIR)),
        );
        let under_resources = |value: &Option<PathBuf>, default: &str| {
            resources_dir.join(value.as_deref().unwrap_or(Path::new(default)))
        };

        Self {
            drafts_dir: under_resources(&config.drafts_dir, DRAFTS_DIR),
            template: under_resources(&config.template, TEMPLATE_FILE),
            manifest: under_resources(&config.manifest, MANIFEST_FILE),
            index: under_resources(&config.index, INDEX_FILE),
            resources_dir,
            root,
        }
    }

    /// Returns the site root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Output directory for generated pages (`{root}/resources`).
    pub fn resources_dir(&self) -> &Path {
        &self.resources_dir
    }

    /// Markdown drafts (`{resources}/drafts`).
    pub fn drafts_dir(&self) -> &Path {
        &self.drafts_dir
    }

    pub fn template_path(&self) -> &Path {
        &self.template
    }

    pub fn manifest_path(&self) -> &Path {
        &self.manifest
    }

    pub fn index_path(&self) -> &Path {
        &self.index
    }

    /// Where the page for `slug` is written.
    pub fn page_path(&self, slug: &str) -> PathBuf {
        self.resources_dir.join(format!("{slug}.html"))
    }
}

/// A resolved site: its layout and the configuration it came from.
#[derive(Clone, Debug)]
pub struct Site {
    pub paths: SitePaths,
    pub config: SiteConfig,
}

impl Site {
    /// Opens the site rooted exactly at `root`, reading `sitegen.yaml` if present.
    pub fn open(root: impl AsRef<Path>) -> Result<Self, SitegenError> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(SitegenError::Site(format!(
                "site root {} is not a directory",
                root.display()
            )));
        }
        let root = fs::canonicalize(root)?;
        let config = SiteConfig::load(&root)?;
        Ok(Self {
            paths: SitePaths::with_config(root, &config),
            config,
        })
    }
}

/// Trait describing how commands find the site they operate on.
pub trait SiteLocator {
    fn site(&self) -> Result<Site, SitegenError>;
}

/// Filesystem-backed locator: an explicit root, or discovery upward from a start path.
pub struct FilesystemSiteLocator {
    start: PathBuf,
    explicit: bool,
}

impl FilesystemSiteLocator {
    /// Uses `root` as the site root without discovery.
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self {
            start: root.into(),
            explicit: true,
        }
    }

    /// Discovers the site root from `start` upward.
    pub fn discover_from(start: impl Into<PathBuf>) -> Self {
        Self {
            start: start.into(),
            explicit: false,
        }
    }

    pub fn from_current_dir() -> Result<Self, SitegenError> {
        Ok(Self::discover_from(env::current_dir()?))
    }
}

impl SiteLocator for FilesystemSiteLocator {
    fn site(&self) -> Result<Site, SitegenError> {
        if self.explicit {
            Site::open(&self.start)
        } else {
            Site::open(discover(&self.start)?)
        }
    }
}

/// Walks up from `start` to the nearest directory holding a root marker.
pub fn discover(start: impl AsRef<Path>) -> Result<PathBuf, SitegenError> {
    let start = start.as_ref();
    let canonical_start = fs::canonicalize(start).map_err(|err| {
        SitegenError::Site(format!("cannot resolve {}: {err}", start.display()))
    })?;

    for ancestor in canonical_start.ancestors() {
        if ROOT_MARKERS
            .iter()
            .any(|marker| ancestor.join(marker).exists())
        {
            return Ok(ancestor.to_path_buf());
        }
    }

    Err(SitegenError::Site(format!(
        "no site root ({}) found from {}",
        ROOT_MARKERS.join(", "),
        canonical_start.display()
    )))
}
