use thiserror::Error;

use crate::types::UserId;

/// Errors raised while splitting, loading, querying or evaluating.
#[derive(Error, Debug)]
pub enum RecoError {
    /// File system I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed delimited input or a failed write
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Missing or incompatible model artifact
    #[error("Model deserialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid split ratio: {0}")]
    InvalidRatio(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The model was asked to score a user it has never seen
    #[error("Cannot score user {0}, it is not in the training set")]
    UnknownUser(UserId),
}

pub type Result<T> = std::result::Result<T, RecoError>;
