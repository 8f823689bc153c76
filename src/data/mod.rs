//! Data module - results discovery, workbook loading and processing

mod catalog;
mod dates;
mod loader;
mod processor;
mod selection;

pub use catalog::Catalog;
pub use dates::{choose_fallback, resolve_date, DateResolution, MonthLabel};
pub use loader::{LoaderError, WorkbookLoader};
pub use processor::{round_to_cents, DataProcessor, ProcessorError, LATITUDE, LONGITUDE};
pub use selection::{Selection, SelectionError, SelectionResolver};
