use crate::core::filters::FilterError;
use crate::dataset::DatasetError;
use crate::query::QueryError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Unsupported master '{0}' (expected 'local', 'local[N]' or 'local[*]')")]
    UnsupportedMaster(String),

    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("Failed to read session configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid session configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Table or view not found: {name}")]
    UnknownView { name: String },

    #[error("Query failed: {0}")]
    Query(#[from] QueryError),

    #[error("Dataset error: {0}")]
    Dataset(#[from] DatasetError),

    #[error("Structure filter failed: {0}")]
    Filter(#[from] FilterError),
}
