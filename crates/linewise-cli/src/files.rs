//! Turning globs into the list of files to format.

use anyhow::{Context, Result};
use linewise_config::Files;
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Expand `patterns` into regular files, sorted and without duplicates.
///
/// Directories and symlinks are skipped, as is anything matching an exclude
/// pattern from `files`. A pattern that matches nothing is logged, not an
/// error.
pub fn collect(patterns: &[String], files: &Files) -> Result<Vec<PathBuf>> {
    let mut found = BTreeSet::new();

    for pattern in patterns {
        let paths = glob::glob(pattern).with_context(|| format!("invalid glob {pattern:?}"))?;
        let mut matched = false;

        for entry in paths {
            let path = match entry {
                Ok(path) => path,
                Err(e) => {
                    log::warn!("cannot read {}: {}", e.path().display(), e.error());
                    continue;
                }
            };
            matched = true;

            let metadata = std::fs::symlink_metadata(&path)
                .with_context(|| format!("cannot stat {}", path.display()))?;
            if !metadata.file_type().is_file() {
                log::debug!("skipping {} (not a regular file)", path.display());
                continue;
            }
            if files.is_excluded(&path)? {
                log::debug!("skipping {} (excluded)", path.display());
                continue;
            }
            found.insert(path);
        }

        if !matched {
            log::warn!("no files match {pattern:?}");
        }
    }

    Ok(found.into_iter().collect())
}
