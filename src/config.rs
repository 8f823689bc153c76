//! Dashboard configuration.
//!
//! Read from an optional JSON file, with the results directory overridable
//! from the environment. Nothing here is global: `main` loads one value and
//! hands it to the application.

use crate::data::MonthLabel;
use serde::{Deserialize, Serialize};
use std::env;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Names a JSON config file to load instead of the default one.
pub const CONFIG_ENV: &str = "METHANE_DASHBOARD_CONFIG";
/// Overrides `results_dir`.
pub const RESULTS_DIR_ENV: &str = "METHANE_RESULTS_DIR";
/// Loaded from the working directory when present.
pub const DEFAULT_CONFIG_FILE: &str = "methane_dashboard.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("first_month {first} is after last_month {last}")]
    InvalidRange { first: MonthLabel, last: MonthLabel },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Root holding one subdirectory of workbooks per region.
    pub results_dir: PathBuf,
    /// Earliest month offered by the date selector.
    pub first_month: MonthLabel,
    /// Latest month offered by the date selector.
    pub last_month: MonthLabel,
    /// Used when `RUST_LOG` is not set.
    pub log_filter: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            results_dir: PathBuf::from("results"),
            first_month: MonthLabel::january(2014),
            last_month: MonthLabel::december(2023),
            log_filter: "info".to_string(),
        }
    }
}

impl DashboardConfig {
    /// Config file from `METHANE_DASHBOARD_CONFIG`, else `methane_dashboard.json`
    /// if it exists, else defaults; then the results directory override.
    pub fn load() -> Result<Self, ConfigError> {
        let config = match env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_file(Path::new(&path))?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };

        let config = config.with_results_dir(env::var_os(RESULTS_DIR_ENV).map(PathBuf::from));
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn with_results_dir(mut self, dir: Option<PathBuf>) -> Self {
        if let Some(dir) = dir {
            self.results_dir = dir;
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.first_month > self.last_month {
            return Err(ConfigError::InvalidRange {
                first: self.first_month,
                last: self.last_month,
            });
        }
        Ok(())
    }

    /// Years offered by the date selector.
    pub fn years(&self) -> RangeInclusive<i32> {
        self.first_month.year()..=self.last_month.year()
    }

    /// Months of `year` inside the configured bounds.
    pub fn months_in(&self, year: i32) -> RangeInclusive<u32> {
        let first = if year == self.first_month.year() {
            self.first_month.month()
        } else {
            1
        };
        let last = if year == self.last_month.year() {
            self.last_month.month()
        } else {
            12
        };
        first..=last
    }

    /// Pull a month back inside the configured bounds.
    pub fn clamp(&self, month: MonthLabel) -> MonthLabel {
        month.clamp(self.first_month, self.last_month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn month(year: i32, month: u32) -> MonthLabel {
        MonthLabel::new(year, month).unwrap()
    }

    #[test]
    fn defaults_match_the_published_data_range() {
        let config = DashboardConfig::default();
        assert_eq!(config.results_dir, PathBuf::from("results"));
        assert_eq!(config.first_month, month(2014, 1));
        assert_eq!(config.last_month, month(2023, 12));
        assert_eq!(config.years(), 2014..=2023);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("methane_dashboard.json");
        std::fs::write(
            &path,
            r#"{ "results_dir": "/data/results", "last_month": "2024_06_01" }"#,
        )
        .unwrap();

        let config = DashboardConfig::from_file(&path).unwrap();

        assert_eq!(config.results_dir, PathBuf::from("/data/results"));
        assert_eq!(config.first_month, month(2014, 1));
        assert_eq!(config.last_month, month(2024, 6));
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn malformed_json_reports_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, r#"{ "first_month": "January" }"#).unwrap();

        let err = DashboardConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("broken.json"));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = DashboardConfig::from_file(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn results_dir_override_wins() {
        let config = DashboardConfig::default().with_results_dir(Some(PathBuf::from("/srv/ch4")));
        assert_eq!(config.results_dir, PathBuf::from("/srv/ch4"));

        let config = DashboardConfig::default().with_results_dir(None);
        assert_eq!(config.results_dir, PathBuf::from("results"));
    }

    #[test]
    fn inverted_range_is_rejected() {
        let config = DashboardConfig {
            first_month: month(2023, 1),
            last_month: month(2022, 12),
            ..DashboardConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidRange { .. })
        ));
    }

    #[test]
    fn months_are_bounded_at_the_range_ends() {
        let config = DashboardConfig {
            first_month: month(2014, 4),
            last_month: month(2016, 9),
            ..DashboardConfig::default()
        };
        assert_eq!(config.months_in(2014), 4..=12);
        assert_eq!(config.months_in(2015), 1..=12);
        assert_eq!(config.months_in(2016), 1..=9);
        assert_eq!(config.clamp(month(2013, 6)), month(2014, 4));
        assert_eq!(config.clamp(month(2017, 1)), month(2016, 9));
        assert_eq!(config.clamp(month(2015, 2)), month(2015, 2));
    }
}
