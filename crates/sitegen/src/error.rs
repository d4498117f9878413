use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// High-level error type shared across sitegen components.
#[derive(Debug, Error)]
pub enum SitegenError {
    #[error("site error: {0}")]
    Site(String),
    #[error("config error: {0}")]
    Config(String),
    #[error("manifest error: {0}")]
    Manifest(String),
    #[error("template error: {0}")]
    Template(String),
    #[error("index error: {0}")]
    Index(String),
    #[error("missing input: {0}")]
    MissingInput(PathBuf),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_yaml::Error> for SitegenError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<walkdir::Error> for SitegenError {
    fn from(err: walkdir::Error) -> Self {
        match err.into_io_error() {
            Some(io) => Self::Io(io),
            None => Self::Site("filesystem loop while listing drafts".into()),
        }
    }
}

impl SitegenError {
    pub fn context<T: fmt::Display>(self, ctx: T) -> Self {
        match self {
            SitegenError::Site(msg) => SitegenError::Site(format!("{ctx}: {msg}")),
            SitegenError::Config(msg) => SitegenError::Config(format!("{ctx}: {msg}")),
            SitegenError::Manifest(msg) => SitegenError::Manifest(format!("{ctx}: {msg}")),
            SitegenError::Template(msg) => SitegenError::Template(format!("{ctx}: {msg}")),
            SitegenError::Index(msg) => SitegenError::Index(format!("{ctx}: {msg}")),
            SitegenError::MissingInput(path) => SitegenError::MissingInput(path),
            SitegenError::Io(err) => {
                SitegenError::Io(std::io::Error::new(err.kind(), format!("{ctx}: {err}")))
            }
        }
    }
}
