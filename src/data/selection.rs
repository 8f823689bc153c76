//! Selection Resolver
//! Region -> workbook -> sheet selection on top of the catalog.

use crate::data::catalog::{Catalog, CatalogError};
use crate::data::loader::{LoaderError, WorkbookLoader};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SelectionError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Loader(#[from] LoaderError),
    #[error("Workbook index {index} out of range for region '{region}' ({count} workbooks)")]
    IndexOutOfRange {
        region: String,
        index: usize,
        count: usize,
    },
    #[error("Workbook '{0}' has no sheets")]
    NoSheets(String),
    #[error("Sheet '{sheet}' not found in '{file}'")]
    UnknownSheet { file: String, sheet: String },
}

/// A fully resolved user selection.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub region: String,
    pub file_name: String,
    pub file_path: PathBuf,
    pub file_index: usize,
    pub sheet_name: String,
}

/// Resolves selections against a catalog. Any UI may drive it.
pub struct SelectionResolver<'a> {
    catalog: &'a Catalog,
}

impl<'a> SelectionResolver<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    /// Workbook names of a region with the extension stripped, for display.
    pub fn display_names(&self, region: &str) -> Result<Vec<String>, SelectionError> {
        Ok(self
            .catalog
            .files(region)?
            .iter()
            .map(|p| display_name(p))
            .collect())
    }

    /// File name (with extension) and path of the workbook at `index`.
    pub fn pick_file(&self, region: &str, index: usize) -> Result<(String, &'a Path), SelectionError> {
        let files = self.catalog.files(region)?;
        let path = files
            .get(index)
            .ok_or_else(|| SelectionError::IndexOutOfRange {
                region: region.to_string(),
                index,
                count: files.len(),
            })?;
        Ok((file_name(path), path.as_path()))
    }

    /// Sheets (districts) of the workbook at `index`.
    pub fn sheets(&self, region: &str, index: usize) -> Result<Vec<String>, SelectionError> {
        let (_, path) = self.pick_file(region, index)?;
        Ok(WorkbookLoader::sheet_names(path)?)
    }

    /// Resolve region, workbook index and sheet into a [`Selection`].
    ///
    /// Without a requested sheet the first sheet is chosen.
    pub fn resolve(
        &self,
        region: &str,
        index: usize,
        sheet: Option<&str>,
    ) -> Result<Selection, SelectionError> {
        let (file_name, path) = self.pick_file(region, index)?;
        let sheets = WorkbookLoader::sheet_names(path)?;

        let sheet_name = match sheet {
            Some(wanted) => sheets
                .into_iter()
                .find(|s| s == wanted)
                .ok_or_else(|| SelectionError::UnknownSheet {
                    file: file_name.clone(),
                    sheet: wanted.to_string(),
                })?,
            None => sheets
                .into_iter()
                .next()
                .ok_or_else(|| SelectionError::NoSheets(file_name.clone()))?,
        };

        Ok(Selection {
            region: region.to_string(),
            file_name,
            file_path: path.to_path_buf(),
            file_index: index,
            sheet_name,
        })
    }
}

fn display_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}
