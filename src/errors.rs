use thiserror::Error;

/// Error type that captures common flow-engine failures.
#[derive(Debug, Error)]
pub enum FlowError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Gateway error: {0}")]
    Gateway(String),
    #[error("Step {0} is not skippable")]
    NotSkippable(usize),
    #[error("Invalid reference: {0}")]
    InvalidRef(String),
}

impl From<reqwest::Error> for FlowError {
    fn from(err: reqwest::Error) -> Self {
        FlowError::Gateway(err.to_string())
    }
}
