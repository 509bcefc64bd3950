//! Request and response records exchanged across the bridge.
//!
//! Field names serialize in camelCase so the JSON shape matches what host
//! JavaScript passes and receives.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{BridgeError, Result};

/// Credentials passed to `setup`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetupRequest {
    pub api_key: String,
}

impl SetupRequest {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
        }
    }

    /// Rejects empty or whitespace-only keys.
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(BridgeError::InvalidArgument(
                "API key is required and cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

// The key never shows up in debug output.
impl fmt::Debug for SetupRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SetupRequest")
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetupResponse {
    pub message: String,
}

impl SetupResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopResponse {
    pub message: String,
}

impl StopResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityResponse {
    pub available: bool,
}

impl AvailabilityResponse {
    pub const AVAILABLE: Self = Self { available: true };
    pub const UNAVAILABLE: Self = Self { available: false };
}

/// Lifecycle of a measurement session on a real backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionState {
    #[default]
    Idle,
    Running,
    Stopped,
}

impl SessionState {
    /// Whether `start` may be issued from this state.
    pub fn can_start(&self) -> bool {
        matches!(self, SessionState::Idle | SessionState::Stopped)
    }

    pub fn is_running(&self) -> bool {
        matches!(self, SessionState::Running)
    }
}
