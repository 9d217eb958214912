//! Annotation datasets: typed tables of per-structure metadata.
//!
//! Tables come from an [`AnnotationSource`], most commonly a custom report
//! returned by the PDB report service as CSV ([`report`]). Column types are
//! inferred from the data, with well-known report columns using their declared
//! type ([`fields`]).

pub mod error;
pub mod fields;
pub mod report;
pub mod schema;
pub mod table;
pub mod value;

pub use error::DatasetError;
pub use report::{CsvReportSource, parse_report};
pub use schema::{Field, Schema};
pub use table::{AnnotationTable, Row};
pub use value::{DataType, Value};

/// Provides annotation tables restricted to a list of requested columns.
pub trait AnnotationSource {
    /// Retrieves a table holding the requested columns for every entry.
    ///
    /// # Errors
    ///
    /// Returns an error when the data cannot be retrieved or a requested
    /// column does not exist.
    fn fetch(&self, columns: &[String]) -> Result<AnnotationTable, DatasetError>;
}
