use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed CSV report: {0}")]
    Csv(#[from] csv::Error),

    #[error("Requested column '{name}' is not present in the report")]
    MissingColumn { name: String },

    #[error("Report contains no header row")]
    EmptyReport,

    #[error("Row {row} has {found} values but the schema has {expected} fields")]
    RowArity {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Annotation source failed: {0}")]
    Source(String),
}
