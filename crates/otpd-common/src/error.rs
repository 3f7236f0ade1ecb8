use serde::{Deserialize, Serialize};

/// Machine-readable error codes for the wire protocol.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvalidPayload,
    InvalidCandidate,
    KeyNotFound,
    DecryptionFailed,
    SeedNotInitialized,
    StorageCorrupted,
    StorageUnavailable,
    Internal,
}

impl ErrorCode {
    /// Suggested HTTP status code for this error.
    /// Transport-agnostic (returns u16, not an axum type).
    pub fn http_status(&self) -> u16 {
        match self {
            Self::InvalidPayload | Self::InvalidCandidate => 400,
            Self::KeyNotFound
            | Self::DecryptionFailed
            | Self::SeedNotInitialized
            | Self::StorageCorrupted
            | Self::StorageUnavailable
            | Self::Internal => 500,
        }
    }
}
