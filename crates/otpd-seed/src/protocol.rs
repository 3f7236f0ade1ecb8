//! Request and response bodies for the seed routes.

use serde::{Deserialize, Serialize};

/// POST /decrypt-seed body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecryptRequest {
    pub encrypted_seed: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DecryptResponse {
    pub status: String,
}

impl DecryptResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}

/// GET /generate-2fa response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GenerateResponse {
    pub code: String,
    pub valid_for: u64,
}

/// POST /verify-2fa body. A missing `code` is reported as an invalid
/// candidate rather than a payload error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VerifyRequest {
    #[serde(default)]
    pub code: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VerifyResponse {
    pub valid: bool,
}
