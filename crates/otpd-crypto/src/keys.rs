//! RSA private key loading and seed decryption.
//!
//! Encrypted seeds are base64 RSA-OAEP ciphertexts (SHA-256 for both the
//! label hash and MGF1). The private key is a PEM file in PKCS#8 or PKCS#1
//! form, provisioned outside this process.

use std::io;
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs8::DecodePrivateKey;
use rsa::{Oaep, RsaPrivateKey};
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::seed::{PlaintextSeed, SeedFormatError};

/// Failures of key loading and seed decryption.
///
/// Messages may name paths and causes; they are meant for logs, not for
/// remote callers.
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    #[error("private key not readable at {}", .path.display())]
    KeyNotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("private key is not an RSA PEM (PKCS#8 or PKCS#1)")]
    InvalidKey,

    #[error("encrypted seed is empty")]
    EmptyCiphertext,

    #[error("encrypted seed is not valid base64")]
    InvalidEncoding,

    #[error("RSA-OAEP decryption failed")]
    Decryption,

    #[error("decrypted seed is malformed: {0}")]
    MalformedSeed(#[from] SeedFormatError),
}

/// Read and parse the RSA private key at `path`.
pub fn load_private_key(path: &Path) -> Result<RsaPrivateKey, CryptoError> {
    let pem = Zeroizing::new(std::fs::read_to_string(path).map_err(|source| {
        CryptoError::KeyNotFound {
            path: path.to_path_buf(),
            source,
        }
    })?);

    RsaPrivateKey::from_pkcs8_pem(&pem)
        .or_else(|_| RsaPrivateKey::from_pkcs1_pem(&pem))
        .map_err(|_| CryptoError::InvalidKey)
}

/// Decrypt a base64 RSA-OAEP ciphertext into a validated hex seed.
///
/// Whitespace anywhere in `encrypted_b64` is ignored so line-wrapped
/// blobs decode the same as single-line ones.
pub fn decrypt_seed(key: &RsaPrivateKey, encrypted_b64: &str) -> Result<PlaintextSeed, CryptoError> {
    let compact: String = encrypted_b64
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    if compact.is_empty() {
        return Err(CryptoError::EmptyCiphertext);
    }

    let ciphertext = STANDARD
        .decode(compact.as_bytes())
        .map_err(|_| CryptoError::InvalidEncoding)?;

    let plaintext = Zeroizing::new(
        key.decrypt(Oaep::new::<Sha256>(), &ciphertext)
            .map_err(|_| CryptoError::Decryption)?,
    );

    let text = std::str::from_utf8(&plaintext).map_err(|_| SeedFormatError::NotHex)?;
    Ok(PlaintextSeed::parse(text)?)
}
