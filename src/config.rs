//! Configuration for a transformation run.

use std::path::{Component, Path, PathBuf};

/// Default source tree written by the benchmark pipeline.
pub const DEFAULT_SOURCE_ROOT: &str = "benchmark/results/agent-scaffold-stats";

/// Default destination folder read by the website.
pub const DEFAULT_DEST_ROOT: &str = "website/public/data/benchmark/raw";

/// Per-instance measurements file inside a model directory.
pub const COMBINED_STATS_FILE: &str = "combined_stats.json";

/// Aggregated metrics file inside a model directory.
pub const SUMMARY_STATS_FILE: &str = "summary_stats.json";

/// Subfolder of the destination holding summary copies.
pub const SUMMARY_DIR_NAME: &str = "summary";

/// Sibling folder of the destination holding the previous output.
pub const BACKUP_DIR_NAME: &str = "backup";

/// Paths used by [`crate::BenchmarkTransformer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformerConfig {
    /// Root containing `<scaffold>/<model>/` result directories.
    pub source_root: PathBuf,
    /// Folder receiving `<scaffold>_<model>.json` copies of combined stats.
    pub dest_root: PathBuf,
}

impl Default for TransformerConfig {
    fn default() -> Self {
        Self {
            source_root: PathBuf::from(DEFAULT_SOURCE_ROOT),
            dest_root: PathBuf::from(DEFAULT_DEST_ROOT),
        }
    }
}

impl TransformerConfig {
    /// Creates a configuration with explicit source and destination roots.
    pub fn new(source_root: impl Into<PathBuf>, dest_root: impl Into<PathBuf>) -> Self {
        Self {
            source_root: source_root.into(),
            dest_root: dest_root.into(),
        }
    }

    /// Sets the source root.
    pub fn with_source_root(mut self, dir: impl Into<PathBuf>) -> Self {
        self.source_root = dir.into();
        self
    }

    /// Sets the destination root.
    pub fn with_dest_root(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dest_root = dir.into();
        self
    }

    pub fn source_root(&self) -> &Path {
        &self.source_root
    }

    pub fn dest_root(&self) -> &Path {
        &self.dest_root
    }

    /// `DEST/summary`.
    pub fn summary_dir(&self) -> PathBuf {
        self.dest_root.join(SUMMARY_DIR_NAME)
    }

    /// Sibling `backup` folder of the destination, resolved lexically.
    ///
    /// `None` when the destination has no real parent (e.g. `.` or `raw`);
    /// the backup step resolves those against the filesystem instead.
    pub fn backup_dir(&self) -> Option<PathBuf> {
        backup_dir_for(&normalize_path(&self.dest_root))
    }
}

/// `<parent of dest>/backup`, if `dest` has a non-empty parent.
pub fn backup_dir_for(dest: &Path) -> Option<PathBuf> {
    dest.parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .map(|parent| parent.join(BACKUP_DIR_NAME))
}

/// Lexically drop `.` components and fold `name/..` pairs.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout() {
        let config = TransformerConfig::default();
        assert_eq!(config.source_root, PathBuf::from(DEFAULT_SOURCE_ROOT));
        assert_eq!(
            config.summary_dir(),
            PathBuf::from("website/public/data/benchmark/raw/summary")
        );
        assert_eq!(
            config.backup_dir(),
            Some(PathBuf::from("website/public/data/benchmark/backup"))
        );
    }

    #[test]
    fn test_builder_overrides() {
        let config = TransformerConfig::default()
            .with_source_root("/tmp/src")
            .with_dest_root("/tmp/site/raw");
        assert_eq!(config.source_root(), Path::new("/tmp/src"));
        assert_eq!(config.backup_dir(), Some(PathBuf::from("/tmp/site/backup")));
    }

    #[test]
    fn test_backup_dir_is_never_inside_destination() {
        let config = TransformerConfig::new("src", "/tmp/site/raw/..");
        assert_eq!(config.backup_dir(), Some(PathBuf::from("/tmp/backup")));

        let config = TransformerConfig::new("src", "/tmp/site/./raw/");
        assert_eq!(config.backup_dir(), Some(PathBuf::from("/tmp/site/backup")));
    }

    #[test]
    fn test_backup_dir_without_real_parent() {
        assert_eq!(TransformerConfig::new("src", "raw").backup_dir(), None);
        assert_eq!(TransformerConfig::new("src", ".").backup_dir(), None);
        assert_eq!(TransformerConfig::new("src", "x/raw/..").backup_dir(), None);
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path(Path::new("a/./b/../c")), PathBuf::from("a/c"));
        assert_eq!(normalize_path(Path::new("../a")), PathBuf::from("../a"));
        assert_eq!(normalize_path(Path::new("/..")), PathBuf::from("/"));
    }
}
