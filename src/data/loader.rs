//! Workbook Loader Module
//! Reads results workbooks with calamine and builds Polars tables from sheets.

use crate::data::processor::{LATITUDE, LONGITUDE};
use calamine::{open_workbook, Data, Range, Reader, Xlsx, XlsxError};
use polars::prelude::*;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to read workbook: {0}")]
    WorkbookError(#[from] XlsxError),
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Sheet '{0}' is empty")]
    EmptySheet(String),
    #[error("Sheet '{sheet}' has no '{column}' column")]
    MissingColumn { sheet: String, column: String },
    #[error("Non-numeric value '{value}' in sheet '{sheet}', column '{column}', row {row}")]
    NonNumeric {
        sheet: String,
        column: String,
        row: usize,
        value: String,
    },
}

/// Reads sheets out of `.xlsx` workbooks.
///
/// Nothing is cached; every call reopens the workbook.
pub struct WorkbookLoader;

impl WorkbookLoader {
    /// Sheet names in the workbook's declared order.
    pub fn sheet_names(path: &Path) -> Result<Vec<String>, LoaderError> {
        let workbook: Xlsx<_> = open_workbook(path)?;
        Ok(workbook.sheet_names())
    }

    /// Load a single sheet as a district table.
    pub fn load_sheet(path: &Path, sheet: &str) -> Result<DataFrame, LoaderError> {
        let mut workbook: Xlsx<_> = open_workbook(path)?;
        let range = workbook.worksheet_range(sheet)?;
        let df = Self::range_to_dataframe(sheet, &range)?;

        debug!(
            path = %path.display(),
            sheet,
            rows = df.height(),
            columns = df.width(),
            "Loaded sheet"
        );
        Ok(df)
    }

    /// Load every district sheet of a workbook, in declared order.
    ///
    /// Blank sheets and sheets without coordinate columns hold no district
    /// data and are skipped. Non-numeric values still fail the load.
    pub fn load_all_sheets(path: &Path) -> Result<Vec<(String, DataFrame)>, LoaderError> {
        let mut workbook: Xlsx<_> = open_workbook(path)?;
        let mut sheets = Vec::new();

        for name in workbook.sheet_names() {
            let range = workbook.worksheet_range(&name)?;
            match Self::range_to_dataframe(&name, &range) {
                Ok(df) => sheets.push((name, df)),
                Err(e @ (LoaderError::EmptySheet(_) | LoaderError::MissingColumn { .. })) => {
                    warn!(path = %path.display(), sheet = %name, error = %e, "Skipping non-district sheet");
                }
                Err(e) => return Err(e),
            }
        }

        info!(path = %path.display(), sheets = sheets.len(), "Loaded workbook");
        Ok(sheets)
    }

    /// First row is the header; every column becomes a nullable Float64.
    fn range_to_dataframe(sheet: &str, range: &Range<Data>) -> Result<DataFrame, LoaderError> {
        let first_row = range.start().map(|(row, _)| row as usize).unwrap_or(0);
        let mut rows = range.rows();
        let header = rows
            .next()
            .ok_or_else(|| LoaderError::EmptySheet(sheet.to_string()))?;
        let names: Vec<String> = header
            .iter()
            .enumerate()
            .map(|(idx, cell)| header_name(idx, cell))
            .collect();

        for required in [LATITUDE, LONGITUDE] {
            if !names.iter().any(|n| n == required) {
                return Err(LoaderError::MissingColumn {
                    sheet: sheet.to_string(),
                    column: required.to_string(),
                });
            }
        }

        let mut values: Vec<Vec<Option<f64>>> = vec![Vec::new(); names.len()];
        for (row_idx, row) in rows.enumerate() {
            for (col_idx, name) in names.iter().enumerate() {
                let cell = row.get(col_idx).unwrap_or(&Data::Empty);
                let value = cell_value(cell).map_err(|value| LoaderError::NonNumeric {
                    sheet: sheet.to_string(),
                    column: name.clone(),
                    // 1-based spreadsheet row, header included
                    row: first_row + row_idx + 2,
                    value,
                })?;
                values[col_idx].push(value);
            }
        }

        let columns: Vec<Column> = names
            .into_iter()
            .zip(values)
            .map(|(name, vals)| Column::new(name.into(), vals))
            .collect();

        Ok(DataFrame::new(columns)?)
    }
}

fn header_name(idx: usize, cell: &Data) -> String {
    match cell {
        Data::Empty => format!("Unnamed: {}", idx),
        Data::String(s) => s.trim().to_string(),
        other => other.to_string(),
    }
}

/// Numeric cell value; `Err` carries the offending text.
fn cell_value(cell: &Data) -> Result<Option<f64>, String> {
    match cell {
        Data::Empty | Data::Error(_) => Ok(None),
        Data::Float(v) => Ok(Some(*v)),
        Data::Int(v) => Ok(Some(*v as f64)),
        Data::String(s) if s.trim().is_empty() => Ok(None),
        Data::String(s) => s.trim().parse::<f64>().map(Some).map_err(|_| s.clone()),
        other => Err(other.to_string()),
    }
}
