//! The benchmark transformer: validate, back up, copy and rename.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{error, info, warn};

use crate::config::{TransformerConfig, COMBINED_STATS_FILE, SUMMARY_STATS_FILE};
use crate::discovery::{self, Combination};
use crate::error::TransformError;
use crate::validation::{check_json_file, validate_json_file, StatsFileType};

use super::backup;
use super::report::{TransformReport, ValidationReport};

/// Copies benchmark results into the flattened website layout.
///
/// Holds only configuration; every call reads the filesystem afresh.
#[derive(Debug, Clone, Default)]
pub struct BenchmarkTransformer {
    config: TransformerConfig,
}

impl BenchmarkTransformer {
    pub fn new(config: TransformerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TransformerConfig {
        &self.config
    }

    /// Every scaffold/model directory holding both result files.
    pub fn find_all_combinations(&self) -> Vec<Combination> {
        discovery::find_all_combinations(self.config.source_root())
    }

    pub fn combined_stats_path(&self, combination: &Combination) -> PathBuf {
        combination
            .source_dir(self.config.source_root())
            .join(COMBINED_STATS_FILE)
    }

    pub fn summary_stats_path(&self, combination: &Combination) -> PathBuf {
        combination
            .source_dir(self.config.source_root())
            .join(SUMMARY_STATS_FILE)
    }

    /// Whether both files of `combination` pass their schema checks.
    ///
    /// Both files are always checked so every problem gets logged.
    pub fn validate_combination(&self, combination: &Combination) -> bool {
        let combined = validate_json_file(
            &self.combined_stats_path(combination),
            StatsFileType::CombinedStats,
        );
        let summary = validate_json_file(
            &self.summary_stats_path(combination),
            StatsFileType::SummaryStats,
        );
        combined && summary
    }

    /// Typed variant of [`Self::validate_combination`].
    ///
    /// Both files are checked; a single bad file is returned as-is, two bad
    /// files as [`TransformError::InvalidCombination`].
    pub fn check_combination(&self, combination: &Combination) -> Result<(), TransformError> {
        let combined = check_json_file(
            &self.combined_stats_path(combination),
            StatsFileType::CombinedStats,
        );
        let summary = check_json_file(
            &self.summary_stats_path(combination),
            StatsFileType::SummaryStats,
        );

        match (combined, summary) {
            (Ok(_), Ok(_)) => Ok(()),
            (Err(e), Ok(_)) | (Ok(_), Err(e)) => Err(e),
            (Err(combined), Err(summary)) => Err(TransformError::InvalidCombination {
                combination: combination.key(),
                errors: vec![combined.to_string(), summary.to_string()],
            }),
        }
    }

    /// Discover and validate every combination.
    pub fn validate_all(&self) -> ValidationReport {
        let combinations = self.find_all_combinations();
        self.validate_combinations(&combinations)
    }

    fn validate_combinations(&self, combinations: &[Combination]) -> ValidationReport {
        let mut report = ValidationReport::default();
        for combination in combinations {
            let valid = self.validate_combination(combination);
            if valid {
                info!("✔ {} is valid", combination);
            } else {
                warn!("✘ {} failed validation", combination);
            }
            report.record(combination.key(), valid);
        }
        info!(
            "Validation summary: {}/{} combinations valid",
            report.valid_count(),
            report.total()
        );
        report
    }

    /// Copy the current destination to the backup folder, if it has content.
    pub fn backup_existing_data(&self) -> Result<Option<PathBuf>, TransformError> {
        backup::backup_existing_data(&self.config)
    }

    /// Create `DEST` and `DEST/summary`.
    pub fn ensure_destination_dirs(&self) -> Result<(), TransformError> {
        fs::create_dir_all(self.config.dest_root())?;
        fs::create_dir_all(self.config.summary_dir())?;
        Ok(())
    }

    /// Copy both files of `combination`, optionally validating first.
    pub fn try_transform_combination(
        &self,
        combination: &Combination,
        validate: bool,
    ) -> Result<(), TransformError> {
        if validate {
            self.check_combination(combination)?;
        }

        self.ensure_destination_dirs()?;

        let file_name = combination.output_file_name();
        copy_file(
            &self.combined_stats_path(combination),
            &self.config.dest_root().join(&file_name),
        )?;
        copy_file(
            &self.summary_stats_path(combination),
            &self.config.summary_dir().join(&file_name),
        )?;
        Ok(())
    }

    /// Copy both files of `combination`, logging instead of returning errors.
    pub fn transform_combination(&self, combination: &Combination, validate: bool) -> bool {
        match self.try_transform_combination(combination, validate) {
            Ok(()) => {
                info!("✔ {} -> {}", combination, combination.output_file_name());
                true
            }
            Err(e) => {
                error!("Failed to transform {}: {}", combination, e);
                false
            }
        }
    }

    /// Transform every discovered combination.
    ///
    /// With `validate`, only combinations passing validation are copied, and
    /// the run aborts before touching the destination if none pass. Individual
    /// copy failures are recorded in the report rather than returned.
    pub fn transform_all(&self, validate: bool) -> Result<TransformReport, TransformError> {
        let combinations = self.find_all_combinations();
        if combinations.is_empty() {
            return Err(self.nothing_found());
        }

        let mut report = TransformReport::new(&self.config, validate);

        let selected: Vec<Combination> = if validate {
            let validation = self.validate_combinations(&combinations);
            let passed: Vec<Combination> = combinations
                .into_iter()
                .filter(|c| validation.is_valid(&c.key()))
                .collect();
            if passed.is_empty() {
                error!("No valid combinations found, nothing will be copied");
                return Err(TransformError::NoValidCombinations {
                    total: validation.total(),
                });
            }
            report.validation = Some(validation);
            passed
        } else {
            warn!("Validation disabled, copying all {} combinations", combinations.len());
            combinations
        };

        match self.backup_existing_data() {
            Ok(backup) => report.backup = backup,
            Err(e) => warn!("Backup failed, continuing without one: {}", e),
        }

        self.ensure_destination_dirs()?;

        for combination in &selected {
            // Already validated above.
            let ok = self.transform_combination(combination, false);
            report.record(combination.key(), ok);
        }

        info!(
            "Done. {}/{} combinations copied to {}",
            report.succeeded.len(),
            report.attempted(),
            self.config.dest_root().display()
        );
        Ok(report)
    }

    /// Error for a run that found nothing to process.
    pub fn nothing_found(&self) -> TransformError {
        let root = self.config.source_root();
        if root.exists() {
            TransformError::NoCombinations(root.to_path_buf())
        } else {
            TransformError::MissingSourceRoot(root.to_path_buf())
        }
    }
}

fn copy_file(from: &Path, to: &Path) -> Result<(), TransformError> {
    fs::copy(from, to).map_err(|source| TransformError::CopyFailure {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map, Value};

    use crate::validation::schema_validator::SUMMARY_NUMERIC_FIELDS;

    fn combined_stats() -> Value {
        json!({
            "astropy__astropy-12907": {
                "input_tokens": 50210, "output_tokens": 1873, "cpu_time": 41.2,
                "gpu_time": 0, "duration": 212.7, "llm_calls": 14,
                "measured_gpu_time": 0.0, "measured_duration": 210.3, "resolved": false
            }
        })
    }

    fn summary_stats() -> Value {
        let mut summary = Map::new();
        for field in SUMMARY_NUMERIC_FIELDS {
            summary.insert(field.to_string(), json!(1));
        }
        summary.insert("avg_resolved".to_string(), json!(0.25));
        summary.insert("precision".to_string(), json!(0.5));
        Value::Object(summary)
    }

    fn write_combination(root: &Path, scaffold: &str, model: &str, combined: &Value) {
        let dir = root.join(scaffold).join(model);
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join(COMBINED_STATS_FILE),
            serde_json::to_string_pretty(combined).unwrap(),
        )
        .unwrap();
        fs::write(
            dir.join(SUMMARY_STATS_FILE),
            serde_json::to_string_pretty(&summary_stats()).unwrap(),
        )
        .unwrap();
    }

    fn transformer(root: &Path) -> BenchmarkTransformer {
        BenchmarkTransformer::new(TransformerConfig::new(
            root.join("results"),
            root.join("public").join("raw"),
        ))
    }

    #[test]
    fn test_validate_combination_flips_on_missing_field() {
        let dir = tempfile::tempdir().unwrap();
        let t = transformer(dir.path());
        write_combination(t.config().source_root(), "agentless", "GPT-4o", &combined_stats());
        let combo = Combination::new("agentless", "GPT-4o");
        assert!(t.validate_combination(&combo));

        let mut summary = summary_stats();
        summary.as_object_mut().unwrap().remove("avg_llm_calls");
        fs::write(t.summary_stats_path(&combo), summary.to_string()).unwrap();
        assert!(!t.validate_combination(&combo));
        assert!(matches!(
            t.check_combination(&combo),
            Err(TransformError::SchemaViolation { .. })
        ));
    }

    #[test]
    fn test_check_combination_reports_both_bad_files() {
        let dir = tempfile::tempdir().unwrap();
        let t = transformer(dir.path());
        write_combination(t.config().source_root(), "agentless", "GPT-4o", &json!({}));
        let combo = Combination::new("agentless", "GPT-4o");

        // Only combined stats broken.
        assert!(matches!(
            t.check_combination(&combo),
            Err(TransformError::SchemaViolation { .. })
        ));

        fs::write(t.summary_stats_path(&combo), "[]").unwrap();
        match t.check_combination(&combo) {
            Err(TransformError::InvalidCombination {
                combination,
                errors,
            }) => {
                assert_eq!(combination, "agentless/GPT-4o");
                assert_eq!(errors.len(), 2);
                assert!(errors[0].contains(COMBINED_STATS_FILE));
                assert!(errors[1].contains(SUMMARY_STATS_FILE));
            }
            other => panic!("expected InvalidCombination, got {:?}", other),
        }
        assert!(!t.transform_combination(&combo, true));
    }

    #[test]
    fn test_transform_combination_copies_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let t = transformer(dir.path());
        write_combination(t.config().source_root(), "agentless", "GPT-4o", &combined_stats());
        let combo = Combination::new("agentless", "GPT-4o");

        assert!(t.transform_combination(&combo, true));

        let raw = t.config().dest_root().join("agentless_GPT-4o.json");
        let summary = t.config().summary_dir().join("agentless_GPT-4o.json");
        assert_eq!(
            fs::read(&raw).unwrap(),
            fs::read(t.combined_stats_path(&combo)).unwrap()
        );
        assert_eq!(
            fs::read(&summary).unwrap(),
            fs::read(t.summary_stats_path(&combo)).unwrap()
        );
    }

    #[test]
    fn test_transform_combination_skips_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let t = transformer(dir.path());
        let mut bad = combined_stats();
        bad["astropy__astropy-12907"]["resolved"] = json!("true");
        write_combination(t.config().source_root(), "agentless", "GPT-4o", &bad);
        let combo = Combination::new("agentless", "GPT-4o");

        assert!(!t.transform_combination(&combo, true));
        assert!(!t.config().dest_root().join("agentless_GPT-4o.json").exists());

        // Without validation the file is copied as-is.
        assert!(t.transform_combination(&combo, false));
        assert!(t.config().dest_root().join("agentless_GPT-4o.json").exists());
    }

    #[test]
    fn test_transform_missing_combination_fails() {
        let dir = tempfile::tempdir().unwrap();
        let t = transformer(dir.path());
        let combo = Combination::new("ghost", "model");
        assert!(!t.transform_combination(&combo, false));
        assert!(matches!(
            t.try_transform_combination(&combo, false),
            Err(TransformError::CopyFailure { .. })
        ));
    }

    #[test]
    fn test_transform_all_keeps_partial_success() {
        let dir = tempfile::tempdir().unwrap();
        let t = transformer(dir.path());
        let src = t.config().source_root().to_path_buf();
        write_combination(&src, "agentless", "GPT-4o", &combined_stats());
        write_combination(&src, "agentless", "Claude", &json!({}));

        let report = t.transform_all(true).unwrap();
        assert_eq!(report.succeeded, vec!["agentless/GPT-4o".to_string()]);
        assert!(report.failed.is_empty());
        let validation = report.validation.expect("validation recorded");
        assert_eq!(validation.total(), 2);
        assert!(!t.config().dest_root().join("agentless_Claude.json").exists());
    }

    #[test]
    fn test_transform_all_without_validation_copies_everything() {
        let dir = tempfile::tempdir().unwrap();
        let t = transformer(dir.path());
        let src = t.config().source_root().to_path_buf();
        write_combination(&src, "agentless", "GPT-4o", &combined_stats());
        write_combination(&src, "agentless", "Claude", &json!({}));

        let report = t.transform_all(false).unwrap();
        assert_eq!(report.succeeded.len(), 2);
        assert!(report.validation.is_none());
        assert!(t.config().dest_root().join("agentless_Claude.json").exists());
    }

    #[test]
    fn test_transform_all_aborts_when_nothing_valid() {
        let dir = tempfile::tempdir().unwrap();
        let t = transformer(dir.path());
        write_combination(t.config().source_root(), "agentless", "GPT-4o", &json!([]));

        let err = t.transform_all(true).unwrap_err();
        assert!(matches!(err, TransformError::NoValidCombinations { total: 1 }));
        assert!(!t.config().dest_root().exists());
    }

    #[test]
    fn test_transform_all_missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let t = transformer(dir.path());
        assert!(matches!(
            t.transform_all(true),
            Err(TransformError::MissingSourceRoot(_))
        ));

        fs::create_dir_all(t.config().source_root()).unwrap();
        assert!(matches!(
            t.transform_all(false),
            Err(TransformError::NoCombinations(_))
        ));
    }

    #[test]
    fn test_transform_all_continues_when_backup_fails() {
        let dir = tempfile::tempdir().unwrap();
        let t = transformer(dir.path());
        write_combination(t.config().source_root(), "agentless", "GPT-4o", &combined_stats());
        t.transform_all(true).unwrap();

        // A plain file where the backup folder goes cannot be replaced by a directory.
        let backup_dir = t.config().backup_dir().unwrap();
        fs::write(&backup_dir, "not a directory").unwrap();

        let report = t.transform_all(true).unwrap();
        assert_eq!(report.succeeded, vec!["agentless/GPT-4o".to_string()]);
        assert!(report.failed.is_empty());
        assert_eq!(report.backup, None);
        assert_eq!(fs::read_to_string(&backup_dir).unwrap(), "not a directory");
    }

    #[test]
    fn test_second_run_preserves_previous_output_in_backup() {
        let dir = tempfile::tempdir().unwrap();
        let t = transformer(dir.path());
        let src = t.config().source_root().to_path_buf();
        write_combination(&src, "agentless", "GPT-4o", &combined_stats());
        t.transform_all(true).unwrap();
        let first = fs::read(t.config().dest_root().join("agentless_GPT-4o.json")).unwrap();

        let mut updated = combined_stats();
        updated["astropy__astropy-12907"]["resolved"] = json!(true);
        write_combination(&src, "agentless", "GPT-4o", &updated);
        let report = t.transform_all(true).unwrap();

        let backup = report.backup.expect("backup taken");
        assert_eq!(fs::read(backup.join("agentless_GPT-4o.json")).unwrap(), first);
        assert_ne!(
            fs::read(t.config().dest_root().join("agentless_GPT-4o.json")).unwrap(),
            first
        );
    }
}
