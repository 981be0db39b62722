//! Best-effort backup of the previous website data.
//!
//! Each backup replaces the last one; there is no versioning and no restore.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use walkdir::WalkDir;

use crate::config::{backup_dir_for, TransformerConfig, BACKUP_DIR_NAME};
use crate::error::TransformError;

/// Copy the destination folder to its sibling `backup` folder.
///
/// Returns `None` when the destination is missing or empty. Any previous
/// backup is deleted first, but only once the backup location is known to
/// lie outside the destination.
pub fn backup_existing_data(
    config: &TransformerConfig,
) -> Result<Option<PathBuf>, TransformError> {
    let dest = config.dest_root();
    if !dest.is_dir() || fs::read_dir(dest)?.next().is_none() {
        debug!("Nothing to back up in {}", dest.display());
        return Ok(None);
    }

    let dest = fs::canonicalize(dest)?;
    let backup = resolve_backup_dir(&dest)?;

    if backup.exists() {
        debug!("Removing previous backup {}", backup.display());
        fs::remove_dir_all(&backup)?;
    }

    let copied = copy_dir_recursive(&dest, &backup)?;
    info!(
        "Backed up {} files from {} to {}",
        copied,
        dest.display(),
        backup.display()
    );
    Ok(Some(backup))
}

/// Backup location for an already canonical destination.
fn resolve_backup_dir(dest: &Path) -> Result<PathBuf, TransformError> {
    let backup = backup_dir_for(dest).unwrap_or_else(|| dest.join(BACKUP_DIR_NAME));
    if backup.starts_with(dest) {
        return Err(TransformError::BackupInsideDestination {
            backup,
            dest: dest.to_path_buf(),
        });
    }
    Ok(backup)
}

/// Recursively copy `src` into `dst`, returning the number of files copied.
///
/// When `dst` lies under `src`, that subtree is not descended into.
pub fn copy_dir_recursive(src: &Path, dst: &Path) -> Result<usize, TransformError> {
    let mut copied = 0usize;

    let walker = WalkDir::new(src)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| !entry.path().starts_with(dst));

    for entry in walker {
        let entry = entry.map_err(|e| TransformError::Io(e.into()))?;
        let Ok(relative) = entry.path().strip_prefix(src) else {
            continue;
        };
        let target = dst.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else if entry.file_type().is_file() {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target).map_err(|source| TransformError::CopyFailure {
                from: entry.path().to_path_buf(),
                to: target.clone(),
                source,
            })?;
            copied = copied.saturating_add(1);
        }
    }

    Ok(copied)
}
