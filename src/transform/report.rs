//! Run reports printed by the CLI.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::TransformerConfig;

/// Overall outcome of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Success,
    Partial,
    Failed,
}

impl RunStatus {
    fn from_counts(ok: usize, total: usize) -> Self {
        if total > 0 && ok == total {
            Self::Success
        } else if ok > 0 {
            Self::Partial
        } else {
            Self::Failed
        }
    }
}

/// Validation outcome keyed by `scaffold/model`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationReport {
    pub results: BTreeMap<String, bool>,
}

impl ValidationReport {
    pub fn record(&mut self, key: impl Into<String>, valid: bool) {
        self.results.insert(key.into(), valid);
    }

    pub fn total(&self) -> usize {
        self.results.len()
    }

    pub fn valid_count(&self) -> usize {
        self.results.values().filter(|ok| **ok).count()
    }

    pub fn is_valid(&self, key: &str) -> bool {
        self.results.get(key).copied().unwrap_or(false)
    }

    pub fn status(&self) -> RunStatus {
        RunStatus::from_counts(self.valid_count(), self.total())
    }
}

/// Outcome of copying combinations into the website data folder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformReport {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub validated: bool,
    pub succeeded: Vec<String>,
    pub failed: Vec<String>,
    pub backup: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationReport>,
}

impl TransformReport {
    pub fn new(config: &TransformerConfig, validated: bool) -> Self {
        Self {
            source: config.source_root.clone(),
            destination: config.dest_root.clone(),
            validated,
            succeeded: Vec::new(),
            failed: Vec::new(),
            backup: None,
            validation: None,
        }
    }

    pub fn record(&mut self, key: impl Into<String>, ok: bool) {
        if ok {
            self.succeeded.push(key.into());
        } else {
            self.failed.push(key.into());
        }
    }

    pub fn attempted(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    pub fn status(&self) -> RunStatus {
        RunStatus::from_counts(self.succeeded.len(), self.attempted())
    }
}
