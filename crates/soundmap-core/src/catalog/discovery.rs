//! Discovery of installed sound metadata files.
//!
//! Probes a fixed list of installation directories (see
//! [`crate::platform::metadata_search_dirs`]) for a fixed list of metadata
//! file names. No globbing: only exact paths are checked.

use super::{MergeReport, SoundCatalog};
use crate::config::CatalogConfig;
use crate::platform;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// A metadata file that was found but could not be merged.
#[derive(Debug, Clone, Serialize)]
pub struct FailedMetadata {
    pub path: PathBuf,
    pub error: String,
}

/// Outcome of a discovery scan.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DiscoveryReport {
    /// Files merged successfully, in scan order.
    pub merged: Vec<(PathBuf, MergeReport)>,
    /// Files skipped because they failed to read or parse.
    pub failed: Vec<FailedMetadata>,
}

impl DiscoveryReport {
    /// Number of metadata files found, merged or not.
    pub fn files_found(&self) -> usize {
        self.merged.len() + self.failed.len()
    }

    /// Number of catalog entries added across all merged files.
    pub fn sounds_added(&self) -> usize {
        self.merged.iter().map(|(_, report)| report.added).sum()
    }
}

impl SoundCatalog {
    /// Scan the platform's installation directories and merge every metadata
    /// file found.
    pub fn discover_and_merge(&mut self) -> DiscoveryReport {
        self.discover_and_merge_in(&platform::metadata_search_dirs())
    }

    /// Scan the given directories and merge every metadata file found.
    ///
    /// A file that fails to merge is logged and skipped; the scan always
    /// runs to completion.
    pub fn discover_and_merge_in(&mut self, search_dirs: &[PathBuf]) -> DiscoveryReport {
        let mut report = DiscoveryReport::default();

        for path in find_metadata_files(search_dirs) {
            match self.merge_from_metadata(&path) {
                Ok(merge) => {
                    info!("Loaded sound libraries from {}", path.display());
                    report.merged.push((path, merge));
                }
                Err(e) => {
                    warn!("Skipping sound metadata {}: {}", path.display(), e);
                    report.failed.push(FailedMetadata {
                        path,
                        error: e.to_string(),
                    });
                }
            }
        }

        if report.files_found() == 0 {
            info!("No sound metadata found, using default libraries");
        }

        report
    }
}

/// Existing metadata files below the given directories, in probe order.
pub(crate) fn find_metadata_files(search_dirs: &[PathBuf]) -> Vec<PathBuf> {
    let mut found = Vec::new();

    for dir in search_dirs {
        if !dir.exists() {
            debug!("Metadata search dir not present: {}", dir.display());
            continue;
        }

        for relative in CatalogConfig::METADATA_FILES {
            let candidate = join_all(dir, relative);
            if candidate.is_file() {
                debug!("Found sound metadata: {}", candidate.display());
                found.push(candidate);
            }
        }
    }

    found
}

fn join_all(base: &Path, parts: &[&str]) -> PathBuf {
    parts.iter().fold(base.to_path_buf(), |path, part| path.join(part))
}
