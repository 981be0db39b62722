//! Discovery of scaffold/model result directories.
//!
//! The source tree is expected to look like
//! `<root>/<scaffold>/<model>/{combined_stats,summary_stats}.json`.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, error, warn};

use crate::config::{COMBINED_STATS_FILE, SUMMARY_STATS_FILE};

/// One scaffold/model pair found in the source tree.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Combination {
    pub scaffold: String,
    pub model: String,
}

impl Combination {
    pub fn new(scaffold: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            scaffold: scaffold.into(),
            model: model.into(),
        }
    }

    /// Report key, `scaffold/model`.
    pub fn key(&self) -> String {
        format!("{}/{}", self.scaffold, self.model)
    }

    /// Flattened destination file name, `scaffold_model.json`.
    pub fn output_file_name(&self) -> String {
        format!("{}_{}.json", self.scaffold, self.model)
    }

    /// `<root>/<scaffold>/<model>`.
    pub fn source_dir(&self, source_root: &Path) -> PathBuf {
        source_root.join(&self.scaffold).join(&self.model)
    }
}

impl fmt::Display for Combination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.scaffold, self.model)
    }
}

/// Lists every combination under `source_root` that has both result files.
///
/// Model directories missing one of the files are skipped with a warning.
/// A missing source root is logged and yields an empty list. The result is
/// sorted by scaffold then model.
pub fn find_all_combinations(source_root: &Path) -> Vec<Combination> {
    if !source_root.exists() {
        error!("Source directory not found: {}", source_root.display());
        return Vec::new();
    }

    let mut combinations = Vec::new();

    for scaffold_dir in list_subdirectories(source_root) {
        let Some(scaffold) = dir_name(&scaffold_dir) else {
            continue;
        };

        for model_dir in list_subdirectories(&scaffold_dir) {
            let Some(model) = dir_name(&model_dir) else {
                continue;
            };

            let missing: Vec<&str> = [COMBINED_STATS_FILE, SUMMARY_STATS_FILE]
                .into_iter()
                .filter(|name| !model_dir.join(name).is_file())
                .collect();

            if !missing.is_empty() {
                warn!(
                    "Skipping {}/{}: missing {}",
                    scaffold,
                    model,
                    missing.join(", ")
                );
                continue;
            }

            debug!("Found combination {}/{}", scaffold, model);
            combinations.push(Combination::new(scaffold.clone(), model));
        }
    }

    combinations.sort();
    combinations
}

fn list_subdirectories(dir: &Path) -> Vec<PathBuf> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Cannot read directory {}: {}", dir.display(), e);
            return Vec::new();
        }
    };

    entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect()
}

fn dir_name(path: &Path) -> Option<String> {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
}
