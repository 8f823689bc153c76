//! Stats module - monthly trends and map summaries

mod map;
mod monthly;

pub use map::{MapPoint, MapSummary};
pub use monthly::{MonthlySeries, MonthlySeriesBuilder};
