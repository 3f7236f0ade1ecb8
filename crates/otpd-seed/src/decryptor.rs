//! Encrypted seed → plaintext seed.

use std::path::{Path, PathBuf};

use otpd_crypto::keys::{self, CryptoError};
use otpd_crypto::seed::PlaintextSeed;

use crate::error::SeedError;

/// Decrypts seeds with the private key at a fixed location.
///
/// The key is read on every call, so a key provisioned after startup is
/// picked up without a restart.
#[derive(Debug, Clone)]
pub struct SeedDecryptor {
    key_path: PathBuf,
}

impl SeedDecryptor {
    pub fn new(key_path: impl Into<PathBuf>) -> Self {
        Self {
            key_path: key_path.into(),
        }
    }

    pub fn key_path(&self) -> &Path {
        &self.key_path
    }

    pub fn decrypt(&self, encrypted_seed: &str) -> Result<PlaintextSeed, SeedError> {
        decrypt(encrypted_seed, &self.key_path)
    }
}

/// Decrypt `encrypted_seed` with the PEM private key at `key_path`.
///
/// Only `KeyNotFound` and `DecryptionFailed` come out of here; the precise
/// crypto failure is logged and dropped.
pub fn decrypt(encrypted_seed: &str, key_path: &Path) -> Result<PlaintextSeed, SeedError> {
    let key = keys::load_private_key(key_path).map_err(|e| match &e {
        CryptoError::KeyNotFound { .. } => {
            tracing::warn!(error = %e, "Private key unavailable");
            SeedError::KeyNotFound
        }
        _ => {
            tracing::warn!(error = %e, path = %key_path.display(), "Private key unusable");
            SeedError::DecryptionFailed
        }
    })?;

    keys::decrypt_seed(&key, encrypted_seed).map_err(|e| {
        tracing::debug!(error = %e, "Seed decryption failed");
        SeedError::DecryptionFailed
    })
}
