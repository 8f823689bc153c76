//! Data Processor Module
//! Handles unit conversion and region aggregation of district tables.

use polars::prelude::*;
use thiserror::Error;
use tracing::debug;

/// Coordinate column names; never unit-converted.
pub const LATITUDE: &str = "latitude";
pub const LONGITUDE: &str = "longitude";

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("No sheets to combine")]
    NoSheets,
    #[error("Table has no date columns")]
    NoDateColumns,
}

/// Convert one raw column value to tonnes, rounded to 2 decimals.
///
/// 0.706 * 10^4 * 1113.2^2 / 10^12, i.e. column density over a
/// 1113.2 m grid cell expressed in tonnes.
pub fn to_tonnes(raw: f64) -> f64 {
    round_to_cents((0.706 * 10000.0 * 1113.2 * 1113.2 * raw) / (1000.0 * 1000000.0 * 1000.0))
}

/// Round to 2 decimal places, ties to even.
pub fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

pub fn is_coordinate(name: &str) -> bool {
    name == LATITUDE || name == LONGITUDE
}

/// Handles table transformations for the dashboard.
pub struct DataProcessor;

impl DataProcessor {
    /// Scale every non-coordinate column to tonnes.
    ///
    /// Column order and row alignment are preserved; nulls stay null.
    pub fn convert_units(df: &DataFrame) -> Result<DataFrame, ProcessorError> {
        let columns = df
            .get_columns()
            .iter()
            .map(|column| {
                if is_coordinate(column.name().as_str()) {
                    return Ok(column.clone());
                }

                let values = column.cast(&DataType::Float64)?;
                let converted: Vec<Option<f64>> = values
                    .f64()?
                    .into_iter()
                    .map(|v| v.map(to_tonnes))
                    .collect();
                Ok(Column::new(column.name().clone(), converted))
            })
            .collect::<Result<Vec<_>, ProcessorError>>()?;

        Ok(DataFrame::new(columns)?)
    }

    /// Stack all district tables of a workbook into one region table, then
    /// convert units.
    ///
    /// Columns are the union of every sheet's columns in first-seen order.
    /// A sheet lacking a column contributes nulls for it.
    pub fn combine_sheets(sheets: &[DataFrame]) -> Result<DataFrame, ProcessorError> {
        let mut union: Vec<PlSmallStr> = Vec::new();
        for df in sheets {
            for name in df.get_column_names() {
                if !union.contains(name) {
                    union.push(name.clone());
                }
            }
        }

        let mut combined: Option<DataFrame> = None;
        for df in sheets {
            let widened = Self::widen(df, &union)?;
            match combined.as_mut() {
                Some(acc) => {
                    acc.vstack_mut(&widened)?;
                }
                None => combined = Some(widened),
            }
        }

        let combined = combined.ok_or(ProcessorError::NoSheets)?;
        debug!(
            sheets = sheets.len(),
            rows = combined.height(),
            columns = union.len(),
            "Combined region table"
        );

        Self::convert_units(&combined)
    }

    /// Project a sheet onto the union column set, null-filling what it lacks.
    fn widen(df: &DataFrame, union: &[PlSmallStr]) -> Result<DataFrame, ProcessorError> {
        let columns = union
            .iter()
            .map(|name| match df.column(name.as_str()) {
                Ok(column) => column.cast(&DataType::Float64),
                Err(_) => Ok(Column::full_null(
                    name.clone(),
                    df.height(),
                    &DataType::Float64,
                )),
            })
            .collect::<PolarsResult<Vec<_>>>()?;

        Ok(DataFrame::new(columns)?)
    }

    /// Date-labelled columns: everything except the coordinates.
    pub fn date_columns(df: &DataFrame) -> Vec<String> {
        df.get_column_names()
            .iter()
            .filter(|name| !is_coordinate(name.as_str()))
            .map(|name| name.to_string())
            .collect()
    }

    /// Non-null values of a column as f64.
    pub fn column_values(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>, ProcessorError> {
        let values = df.column(name)?.cast(&DataType::Float64)?;
        Ok(values.f64()?.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn district(lat: &[f64], lon: &[f64], cols: &[(&str, Vec<Option<f64>>)]) -> DataFrame {
        let mut columns = vec![
            Column::new(LATITUDE.into(), lat.to_vec()),
            Column::new(LONGITUDE.into(), lon.to_vec()),
        ];
        for (name, values) in cols {
            columns.push(Column::new((*name).into(), values.clone()));
        }
        DataFrame::new(columns).unwrap()
    }

    fn expected(raw: f64) -> f64 {
        ((0.706 * 10000.0 * 1113.2 * 1113.2 * raw / 1e12) * 100.0).round_ties_even() / 100.0
    }

    #[test]
    fn conversion_leaves_coordinates_bit_identical() {
        let lat = [26.123456789, 27.5, -3.25];
        let lon = [91.987654321, 92.0, 100.125];
        let df = district(
            &lat,
            &lon,
            &[("2023_01_01", vec![Some(1800.0), Some(1850.5), None])],
        );

        let converted = DataProcessor::convert_units(&df).unwrap();

        let got_lat = DataProcessor::column_values(&converted, LATITUDE).unwrap();
        let got_lon = DataProcessor::column_values(&converted, LONGITUDE).unwrap();
        for (got, want) in got_lat.iter().zip(lat.iter()) {
            assert_eq!(got.unwrap().to_bits(), want.to_bits());
        }
        for (got, want) in got_lon.iter().zip(lon.iter()) {
            assert_eq!(got.unwrap().to_bits(), want.to_bits());
        }
    }

    #[test]
    fn conversion_scales_and_rounds_value_columns() {
        let raw = [1800.0, 1850.5, 1.0, 0.0, 123456.789];
        let df = district(
            &[0.0; 5],
            &[0.0; 5],
            &[("2023_01_01", raw.iter().map(|&v| Some(v)).collect())],
        );

        let converted = DataProcessor::convert_units(&df).unwrap();
        let values = DataProcessor::column_values(&converted, "2023_01_01").unwrap();

        for (got, &x) in values.iter().zip(raw.iter()) {
            let got = got.unwrap();
            assert!((got - expected(x)).abs() < 1e-9, "{} -> {}", x, got);
        }
        // 1800 raw units is roughly 15.75 tonnes
        assert!((values[0].unwrap() - 15.75).abs() < 0.011);
    }

    #[test]
    fn rounding_ties_go_to_even() {
        // Exactly representable halves of a cent
        assert_eq!(round_to_cents(0.125), 0.12);
        assert_eq!(round_to_cents(0.375), 0.38);
        assert_eq!(round_to_cents(-0.125), -0.12);
        assert_eq!(round_to_cents(15.7549), 15.75);
    }

    #[test]
    fn conversion_keeps_nulls_and_column_order() {
        let df = district(
            &[1.0, 2.0],
            &[3.0, 4.0],
            &[
                ("2022_12_01", vec![None, Some(10.0)]),
                ("2022_11_01", vec![Some(20.0), None]),
            ],
        );

        let converted = DataProcessor::convert_units(&df).unwrap();

        let names: Vec<String> = converted
            .get_column_names()
            .iter()
            .map(|n| n.to_string())
            .collect();
        assert_eq!(names, ["latitude", "longitude", "2022_12_01", "2022_11_01"]);
        let dec = DataProcessor::column_values(&converted, "2022_12_01").unwrap();
        assert_eq!(dec[0], None);
        assert_eq!(dec[1], Some(expected(10.0)));
    }

    #[test]
    fn combine_preserves_sheet_and_row_order() {
        let a = district(&[1.0, 2.0], &[10.0, 20.0], &[("2023_01_01", vec![Some(1.0), Some(2.0)])]);
        let b = district(&[3.0], &[30.0], &[("2023_01_01", vec![Some(3.0)])]);
        let c = district(
            &[4.0, 5.0, 6.0],
            &[40.0, 50.0, 60.0],
            &[("2023_01_01", vec![Some(4.0), Some(5.0), Some(6.0)])],
        );

        let combined = DataProcessor::combine_sheets(&[a, b, c]).unwrap();

        assert_eq!(combined.height(), 6);
        let lat: Vec<f64> = DataProcessor::column_values(&combined, LATITUDE)
            .unwrap()
            .into_iter()
            .flatten()
            .collect();
        assert_eq!(lat, [1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn combine_fills_missing_columns_with_nulls() {
        let a = district(&[1.0], &[10.0], &[("2023_01_01", vec![Some(100.0)])]);
        let b = district(&[2.0], &[20.0], &[("2023_02_01", vec![Some(200.0)])]);

        let combined = DataProcessor::combine_sheets(&[a, b]).unwrap();

        assert_eq!(
            DataProcessor::date_columns(&combined),
            ["2023_01_01", "2023_02_01"]
        );
        let jan = DataProcessor::column_values(&combined, "2023_01_01").unwrap();
        let feb = DataProcessor::column_values(&combined, "2023_02_01").unwrap();
        assert_eq!(jan, [Some(expected(100.0)), None]);
        assert_eq!(feb, [None, Some(expected(200.0))]);
    }

    #[test]
    fn combine_converts_values_but_not_coordinates() {
        let a = district(&[26.5], &[91.5], &[("2023_01_01", vec![Some(1800.0)])]);

        let combined = DataProcessor::combine_sheets(&[a]).unwrap();

        assert_eq!(
            DataProcessor::column_values(&combined, LATITUDE).unwrap(),
            [Some(26.5)]
        );
        assert_eq!(
            DataProcessor::column_values(&combined, "2023_01_01").unwrap(),
            [Some(expected(1800.0))]
        );
    }

    #[test]
    fn combine_without_sheets_is_an_error() {
        assert!(matches!(
            DataProcessor::combine_sheets(&[]),
            Err(ProcessorError::NoSheets)
        ));
    }

    #[test]
    fn date_columns_exclude_coordinates() {
        let df = district(
            &[1.0],
            &[2.0],
            &[("2014_01_01", vec![Some(1.0)]), ("2014_02_01", vec![None])],
        );
        assert_eq!(DataProcessor::date_columns(&df), ["2014_01_01", "2014_02_01"]);
    }
}
