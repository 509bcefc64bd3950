//! Errors reported by the native measurement engine

use thiserror::Error;

/// Result type for engine calls
pub type EngineResult<T> = Result<T, EngineError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The engine refused the credentials it was configured with
    #[error("Engine rejected configuration: {0}")]
    Configuration(String),

    /// The engine could not begin or end a measurement
    #[error("Engine failure: {0}")]
    Failure(String),
}

impl From<EngineError> for bridge_traits::error::BridgeError {
    fn from(err: EngineError) -> Self {
        bridge_traits::error::BridgeError::OperationFailed(err.to_string())
    }
}
