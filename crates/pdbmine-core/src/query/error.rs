use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("Unexpected character '{found}' at position {position}")]
    UnexpectedCharacter { position: usize, found: char },

    #[error("Unterminated string literal starting at position {position}")]
    UnterminatedString { position: usize },

    #[error("Invalid number '{text}' at position {position}")]
    InvalidNumber { position: usize, text: String },

    #[error("Expected {expected}, found {found}")]
    UnexpectedToken { expected: String, found: String },

    #[error("Expected {expected}, found end of query")]
    UnexpectedEnd { expected: String },

    #[error("Unknown column '{name}'")]
    UnknownColumn { name: String },

    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    #[error("Condition is nested more than {limit} levels deep")]
    NestingTooDeep { limit: usize },

    #[error("Invalid LIKE pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
}
