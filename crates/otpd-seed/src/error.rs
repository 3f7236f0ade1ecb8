//! Seed domain error types.
//!
//! `Display` strings are what remote callers see. Causes that could carry
//! paths or crypto detail are attached as `#[source]` and only logged.

use otpd_common::error::ErrorCode;

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("private key not found")]
    KeyNotFound,

    #[error("decryption failed")]
    DecryptionFailed,

    #[error("seed not decrypted yet")]
    SeedNotInitialized,

    #[error("stored seed is corrupted")]
    StorageCorrupted,

    #[error("seed storage unavailable")]
    StorageUnavailable(#[source] std::io::Error),

    #[error("missing code")]
    InvalidCandidate,
}

impl From<&SeedError> for ErrorCode {
    fn from(e: &SeedError) -> Self {
        match e {
            SeedError::KeyNotFound => ErrorCode::KeyNotFound,
            SeedError::DecryptionFailed => ErrorCode::DecryptionFailed,
            SeedError::SeedNotInitialized => ErrorCode::SeedNotInitialized,
            SeedError::StorageCorrupted => ErrorCode::StorageCorrupted,
            SeedError::StorageUnavailable(_) => ErrorCode::StorageUnavailable,
            SeedError::InvalidCandidate => ErrorCode::InvalidCandidate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_variant_maps_to_its_code() {
        let cases = vec![
            (SeedError::KeyNotFound, ErrorCode::KeyNotFound),
            (SeedError::DecryptionFailed, ErrorCode::DecryptionFailed),
            (SeedError::SeedNotInitialized, ErrorCode::SeedNotInitialized),
            (SeedError::StorageCorrupted, ErrorCode::StorageCorrupted),
            (
                SeedError::StorageUnavailable(std::io::Error::other("disk")),
                ErrorCode::StorageUnavailable,
            ),
            (SeedError::InvalidCandidate, ErrorCode::InvalidCandidate),
        ];
        for (err, code) in &cases {
            assert_eq!(ErrorCode::from(err), *code, "{err:?}");
        }
    }

    #[test]
    fn storage_message_hides_io_detail() {
        let err = SeedError::StorageUnavailable(std::io::Error::other(
            "permission denied: /data/seed.txt",
        ));
        assert_eq!(err.to_string(), "seed storage unavailable");
    }
}
