use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
    /// The running platform has no implementation of the capability.
    #[error("{0}")]
    Unavailable(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{0}")]
    NotConfigured(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Unknown event name: {0}")]
    UnknownEvent(String),

    #[error("Bridge operation failed: {0}")]
    OperationFailed(String),
}

impl BridgeError {
    /// Stable machine-readable code surfaced to host applications.
    pub fn code(&self) -> &'static str {
        match self {
            BridgeError::Unavailable(_) => "UNAVAILABLE",
            BridgeError::InvalidArgument(_) => "INVALID_ARGUMENT",
            BridgeError::NotConfigured(_) => "NOT_CONFIGURED",
            BridgeError::InvalidState(_) => "INVALID_STATE",
            BridgeError::UnknownEvent(_) => "UNKNOWN_EVENT",
            BridgeError::OperationFailed(_) => "OPERATION_FAILED",
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, BridgeError::Unavailable(_))
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;
