//! Results Catalog Module
//! Discovers region workbooks under the results directory.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Extension of results workbooks (matched case-insensitively).
pub const WORKBOOK_EXTENSION: &str = "xlsx";

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("No data available under {}", .0.display())]
    NoData(PathBuf),
    #[error("No data available for region '{0}'")]
    UnknownRegion(String),
}

/// Region name -> workbooks found in that region's directory.
///
/// Built once from an explicit results directory and never mutated.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    root: PathBuf,
    regions: BTreeMap<String, Vec<PathBuf>>,
}

impl Catalog {
    /// Walk `root` and group workbooks by their parent directory name.
    ///
    /// A missing root yields an empty catalog.
    pub fn scan(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        let mut regions: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();

        if !root.is_dir() {
            warn!(root = %root.display(), "Results directory does not exist");
            return Self {
                root: root.to_path_buf(),
                regions,
            };
        }

        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "Skipping unreadable entry");
                    continue;
                }
            };
            if !entry.file_type().is_file() || !is_workbook(entry.path()) {
                continue;
            }

            let region = entry
                .path()
                .parent()
                .and_then(|p| p.file_name())
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            debug!(region = %region, path = %entry.path().display(), "Found workbook");
            regions
                .entry(region)
                .or_default()
                .push(entry.path().to_path_buf());
        }

        info!(
            root = %root.display(),
            regions = regions.len(),
            workbooks = regions.values().map(Vec::len).sum::<usize>(),
            "Scanned results directory"
        );

        Self {
            root: root.to_path_buf(),
            regions,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Region names, sorted.
    pub fn regions(&self) -> Vec<String> {
        self.regions.keys().cloned().collect()
    }

    /// The region shown when nothing has been chosen yet.
    pub fn first_region(&self) -> Result<&str, CatalogError> {
        self.regions
            .keys()
            .next()
            .map(String::as_str)
            .ok_or_else(|| CatalogError::NoData(self.root.clone()))
    }

    /// Workbooks of one region in traversal order.
    pub fn files(&self, region: &str) -> Result<&[PathBuf], CatalogError> {
        if self.is_empty() {
            return Err(CatalogError::NoData(self.root.clone()));
        }
        self.regions
            .get(region)
            .map(Vec::as_slice)
            .ok_or_else(|| CatalogError::UnknownRegion(region.to_string()))
    }
}

/// `.xlsx` files, excluding Office lock files (`~$name.xlsx`).
fn is_workbook(path: &Path) -> bool {
    let has_extension = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(WORKBOOK_EXTENSION));
    let is_lock_file = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with("~$"));
    has_extension && !is_lock_file
}
