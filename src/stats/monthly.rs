//! Monthly Series Builder
//! Per-month mean values for one year of a table.

use crate::data::MonthLabel;
use polars::prelude::*;
use statrs::statistics::Statistics;

/// One point of a monthly trend line.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyPoint {
    pub month: MonthLabel,
    pub label: String,
    pub mean: f64,
}

/// Mean value per month, restricted to months whose column exists.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonthlySeries {
    pub year: i32,
    pub points: Vec<MonthlyPoint>,
}

impl MonthlySeries {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

pub struct MonthlySeriesBuilder;

impl MonthlySeriesBuilder {
    /// Probe `YYYY_01_01` through `YYYY_12_01` and average each present
    /// column, ignoring missing values.
    ///
    /// Months without a column are gaps: no placeholder, no interpolation.
    /// A column holding only missing values averages to NaN.
    pub fn build(df: &DataFrame, year: i32) -> PolarsResult<MonthlySeries> {
        let mut points = Vec::new();

        for month in MonthLabel::months_of(year) {
            let label = month.label();
            let Ok(column) = df.column(&label) else {
                continue;
            };

            let values = column.cast(&DataType::Float64)?;
            let mean = values.f64()?.into_iter().flatten().mean();
            points.push(MonthlyPoint { month, label, mean });
        }

        Ok(MonthlySeries { year, points })
    }
}
