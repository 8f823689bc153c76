//! Date labels for monthly measurement columns.
//!
//! Every monthly column in a results sheet is named `YYYY_MM_01`. This module
//! builds and parses those labels and decides what happens when a chosen
//! month has no column in the loaded table.

use crate::data::processor::{DataProcessor, ProcessorError};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::warn;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

#[derive(Error, Debug, Clone, PartialEq)]
#[error("Invalid date label '{0}', expected YYYY_MM_01")]
pub struct DateLabelError(pub String);

/// A (year, month) pair identifying one monthly column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthLabel {
    year: i32,
    month: u32,
}

impl MonthLabel {
    /// Returns `None` unless `month` is in 1..=12.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    pub const fn january(year: i32) -> Self {
        Self { year, month: 1 }
    }

    pub const fn december(year: i32) -> Self {
        Self { year, month: 12 }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Column name, e.g. `2023_03_01`.
    pub fn label(&self) -> String {
        format!("{:04}_{:02}_01", self.year, self.month)
    }

    pub fn month_name(&self) -> &'static str {
        MONTH_NAMES[(self.month - 1) as usize]
    }

    /// January through December of `year`.
    pub fn months_of(year: i32) -> impl Iterator<Item = MonthLabel> {
        (1..=12).map(move |month| MonthLabel { year, month })
    }
}

impl fmt::Display for MonthLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for MonthLabel {
    type Err = DateLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || DateLabelError(s.to_string());
        let mut parts = s.trim().split('_');
        let (Some(year), Some(month), Some("01"), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(err());
        };
        if year.len() != 4 || month.len() != 2 {
            return Err(err());
        }
        let year: i32 = year.parse().map_err(|_| err())?;
        let month: u32 = month.parse().map_err(|_| err())?;
        MonthLabel::new(year, month).ok_or_else(err)
    }
}

impl TryFrom<String> for MonthLabel {
    type Error = DateLabelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MonthLabel> for String {
    fn from(value: MonthLabel) -> Self {
        value.label()
    }
}

/// Outcome of looking up the chosen month in a loaded table.
#[derive(Debug, Clone, PartialEq)]
pub enum DateResolution {
    /// The label is a column of the table.
    Found(String),
    /// The label is absent; the user must pick one of `available`.
    Fallback {
        requested: String,
        available: Vec<String>,
    },
}

impl DateResolution {
    pub fn is_fallback(&self) -> bool {
        matches!(self, DateResolution::Fallback { .. })
    }
}

/// Resolve the chosen month against a table's columns.
///
/// Never substitutes a default: a missing label yields the table's own date
/// columns for the user to choose from.
pub fn resolve_date(df: &DataFrame, requested: MonthLabel) -> Result<DateResolution, ProcessorError> {
    let label = requested.label();
    let available = DataProcessor::date_columns(df);

    if available.iter().any(|c| *c == label) {
        return Ok(DateResolution::Found(label));
    }
    if available.is_empty() {
        return Err(ProcessorError::NoDateColumns);
    }

    warn!(requested = %label, available = available.len(), "Date not present in table, asking for another");
    Ok(DateResolution::Fallback {
        requested: label,
        available,
    })
}

/// Accept a fallback pick only if it is one of the offered dates.
pub fn choose_fallback(available: &[String], choice: &str) -> Option<String> {
    available.iter().find(|c| c.as_str() == choice).cloned()
}
