use std::path::{Path, PathBuf};

use log::{debug, warn};
use styx_run_model::{read_run_metadata, RunMetadata, RunMetadataError, METADATA_FILE_NAME};
use walkdir::WalkDir;

/// A run directory with valid metadata
#[derive(Debug, Clone, PartialEq)]
pub struct RunEntry {
    /// Name of the run directory, e.g. `ycsb_5000tps_4partitions_0101_1200`
    pub dir_name: String,
    pub path: PathBuf,
    pub metadata: RunMetadata,
}

/// Check whether a run directory name matches all keywords.
///
/// Keywords must already be lowercase. Matching is substring based and case-insensitive.
pub fn matches_keywords(dir_name: &str, keywords: &[String]) -> bool {
    let dir_name = dir_name.to_lowercase();
    keywords.iter().all(|keyword| dir_name.contains(keyword.as_str()))
}

/// Load the run in `run_dir`.
///
/// Returns `None` if the directory has no `metadata.json` or it cannot be parsed. These
/// directories are not runs and are skipped rather than failing the scan.
pub fn load_run(run_dir: &Path) -> Option<RunEntry> {
    let dir_name = run_dir.file_name()?.to_string_lossy().to_string();

    if !run_dir.join(METADATA_FILE_NAME).is_file() {
        debug!("Skipping {dir_name}: no {METADATA_FILE_NAME}");
        return None;
    }

    match read_run_metadata(run_dir) {
        Ok(metadata) => Some(RunEntry {
            dir_name,
            path: run_dir.to_path_buf(),
            metadata,
        }),
        Err(RunMetadataError::Io(e)) => {
            warn!("Skipping {dir_name}: failed to read {METADATA_FILE_NAME} ({e})");
            None
        }
        Err(RunMetadataError::Json(e)) => {
            warn!("Skipping {dir_name}: invalid {METADATA_FILE_NAME} ({e})");
            None
        }
    }
}

/// Find runs in `results_dir` whose directory name contains all `keywords`.
///
/// Only immediate subdirectories are considered, in lexicographic order of their names. A
/// missing results directory yields no runs.
pub fn find_runs_by_keyword<S>(results_dir: &Path, keywords: &[S]) -> Vec<RunEntry>
where
    S: AsRef<str>,
{
    let keywords = keywords
        .iter()
        .map(|keyword| keyword.as_ref().to_lowercase())
        .collect::<Vec<_>>();

    if !results_dir.is_dir() {
        warn!("Results directory not found: {}", results_dir.display());
        return Vec::new();
    }

    WalkDir::new(results_dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Skipping unreadable entry in {}: {e}", results_dir.display());
                None
            }
        })
        .filter(|entry| entry.file_type().is_dir())
        .filter(|entry| matches_keywords(&entry.file_name().to_string_lossy(), &keywords))
        .filter_map(|entry| load_run(entry.path()))
        .collect()
}
