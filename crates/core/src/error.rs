use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArkresError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON serialization/deserialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Parsing error: {0}")]
    Parsing(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<tokio::task::JoinError> for ArkresError {
    fn from(err: tokio::task::JoinError) -> Self {
        ArkresError::Internal(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ArkresError>;
