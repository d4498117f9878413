use std::path::Path;

#[derive(Clone, Copy, Debug, Default)]
pub struct Verbosity {
    pub json: bool,
    pub verbose: bool,
}

/// Displays `path` relative to the site root when it lives under it.
pub fn site_relative(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .map(|relative| relative.to_string_lossy().into_owned())
        .unwrap_or_else(|_| path.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_outside_root_stay_absolute() {
        let root = Path::new("/srv/site");
        assert_eq!(
            site_relative(root, Path::new("/srv/site/resources/index.html")),
            "resources/index.html"
        );
        assert_eq!(site_relative(root, Path::new("/tmp/other.html")), "/tmp/other.html");
    }
}
