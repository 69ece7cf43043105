//! Data module - CSV loading and revenue aggregation

mod analyzer;
mod loader;

pub use analyzer::{AgeGroupShare, Aggregation, AnalyzerError, SalesAnalyzer};
pub use loader::{CsvImporter, LoaderError};
