//! Dashboard Pipeline
//! One full recomputation for a user request: selection, load, convert,
//! aggregate, then everything the charts need.

use crate::data::{
    choose_fallback, resolve_date, Catalog, DataProcessor, DateResolution, LoaderError,
    MonthLabel, ProcessorError, Selection, SelectionError, SelectionResolver, WorkbookLoader,
};
use crate::stats::{MapSummary, MonthlySeries, MonthlySeriesBuilder};
use polars::prelude::*;
use thiserror::Error;
use tracing::{info, instrument};

/// Location title used for the aggregated region map.
pub const REGION_LOCATION: &str = "selected State";

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error(transparent)]
    Selection(#[from] SelectionError),
    #[error(transparent)]
    Loader(#[from] LoaderError),
    #[error(transparent)]
    Processor(#[from] ProcessorError),
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Date '{0}' is not one of the available dates")]
    InvalidFallback(String),
}

/// What the user has chosen in the control panel.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardRequest {
    pub region: String,
    pub file_index: usize,
    pub sheet: Option<String>,
    pub month: MonthLabel,
    /// Pick made after a date fallback was offered.
    pub fallback_date: Option<String>,
}

/// Result of one recomputation.
#[derive(Debug, Clone)]
pub struct DashboardView {
    pub selection: Selection,
    pub date: DateResolution,
    /// Date column shown on the maps; `None` while a fallback pick is pending.
    pub active_date: Option<String>,
    pub district_map: Option<MapSummary>,
    pub region_map: Option<MapSummary>,
    pub district_series: MonthlySeries,
    pub region_series: MonthlySeries,
    pub district_rows: usize,
    pub region_rows: usize,
}

impl DashboardView {
    pub fn district_trend_title(&self) -> String {
        format!(
            "Mean Methane Concentration from January to December for {} per 1.23Km^2",
            self.selection.sheet_name
        )
    }

    pub fn region_trend_title(&self) -> String {
        "Mean Methane Concentration from January to December for state per 1.23Km^2".to_string()
    }

    /// Dates the user may fall back to; empty when the chosen month exists.
    pub fn fallback_dates(&self) -> &[String] {
        match &self.date {
            DateResolution::Fallback { available, .. } => available.as_slice(),
            DateResolution::Found(_) => &[],
        }
    }
}

/// Build the full dashboard view for a request.
#[instrument(skip_all, fields(region = %request.region, month = %request.month))]
pub fn build_view(catalog: &Catalog, request: &DashboardRequest) -> Result<DashboardView, DashboardError> {
    let selection = SelectionResolver::new(catalog).resolve(
        &request.region,
        request.file_index,
        request.sheet.as_deref(),
    )?;

    let raw = WorkbookLoader::load_sheet(&selection.file_path, &selection.sheet_name)?;
    let district = DataProcessor::convert_units(&raw)?;

    let date = resolve_date(&district, request.month)?;
    let active_date = match &date {
        DateResolution::Found(label) => Some(label.clone()),
        DateResolution::Fallback { available, .. } => match &request.fallback_date {
            Some(choice) => Some(
                choose_fallback(available, choice)
                    .ok_or_else(|| DashboardError::InvalidFallback(choice.clone()))?,
            ),
            None => None,
        },
    };

    let sheets: Vec<DataFrame> = WorkbookLoader::load_all_sheets(&selection.file_path)?
        .into_iter()
        .map(|(_, df)| df)
        .collect();
    let region = DataProcessor::combine_sheets(&sheets)?;

    let (district_map, region_map) = match &active_date {
        Some(label) => (
            Some(MapSummary::from_table(&district, label, &selection.sheet_name)?),
            Some(MapSummary::from_table(&region, label, REGION_LOCATION)?),
        ),
        None => (None, None),
    };

    let year = request.month.year();
    let district_series = MonthlySeriesBuilder::build(&district, year)?;
    let region_series = MonthlySeriesBuilder::build(&region, year)?;

    info!(
        file = %selection.file_name,
        sheet = %selection.sheet_name,
        date = active_date.as_deref().unwrap_or("pending"),
        district_rows = district.height(),
        region_rows = region.height(),
        "Dashboard refreshed"
    );

    Ok(DashboardView {
        district_rows: district.height(),
        region_rows: region.height(),
        selection,
        date,
        active_date,
        district_map,
        region_map,
        district_series,
        region_series,
    })
}
