use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FilterError {
    #[error("Invalid input: no structure available for entry '{structure_id}'")]
    InvalidInput { structure_id: String },
}
