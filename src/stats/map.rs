//! Map Summary
//! Scatter points, colour range and total for one date column.

use crate::data::{round_to_cents, DataProcessor, ProcessorError, LATITUDE, LONGITUDE};
use polars::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub value: f64,
}

/// Everything the geographic scatter needs for one table and date.
#[derive(Debug, Clone, PartialEq)]
pub struct MapSummary {
    pub location: String,
    pub date_label: String,
    pub points: Vec<MapPoint>,
    /// Sum of plotted values, rounded to 2 decimals.
    pub total: f64,
    pub min: f64,
    pub max: f64,
}

impl MapSummary {
    /// Rows with a missing coordinate or value are dropped before anything
    /// is computed.
    pub fn from_table(
        df: &DataFrame,
        date_label: &str,
        location: &str,
    ) -> Result<Self, ProcessorError> {
        let lat = DataProcessor::column_values(df, LATITUDE)?;
        let lon = DataProcessor::column_values(df, LONGITUDE)?;
        let values = DataProcessor::column_values(df, date_label)?;

        let points: Vec<MapPoint> = lat
            .into_iter()
            .zip(lon)
            .zip(values)
            .filter_map(|((lat, lon), value)| match (lat, lon, value) {
                (Some(latitude), Some(longitude), Some(value)) if !value.is_nan() => {
                    Some(MapPoint {
                        latitude,
                        longitude,
                        value,
                    })
                }
                _ => None,
            })
            .collect();

        let (min, max) = if points.is_empty() {
            (0.0, 0.0)
        } else {
            points.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
                (lo.min(p.value), hi.max(p.value))
            })
        };
        let total = round_to_cents(points.iter().fold(0.0, |acc, p| acc + p.value));

        Ok(Self {
            location: location.to_string(),
            date_label: date_label.to_string(),
            points,
            total,
            min,
            max,
        })
    }

    /// Colour scale midpoint.
    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }

    pub fn title(&self) -> String {
        format!(
            "Total methane content in the atmosphere is {} tonnes for {}",
            format_total(self.total),
            self.location
        )
    }
}

/// Shortest form of the total, keeping at least one decimal (`100.0`, `31.55`).
fn format_total(total: f64) -> String {
    if total.is_finite() && total.fract() == 0.0 {
        format!("{:.1}", total)
    } else {
        total.to_string()
    }
}
