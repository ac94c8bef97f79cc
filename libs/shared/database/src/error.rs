use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Constraint violated: {0}")]
    Conflict(String),

    #[error("Referenced record does not exist: {0}")]
    MissingReference(String),

    #[error("Storage backend error: {0}")]
    Backend(String),

    #[error("Failed to decode stored record: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage request failed: {0}")]
    Transport(#[from] reqwest::Error),
}
