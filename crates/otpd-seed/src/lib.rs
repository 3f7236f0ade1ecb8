//! otpd Seed: the seed lifecycle behind the 2FA endpoints.
//!
//! An encrypted seed is decrypted with the provisioned RSA key
//! ([`SeedDecryptor`]), persisted as the single seed record
//! ([`SeedStore`]), and fed to the TOTP engine on every generate/verify
//! request. [`SeedService`] composes the three and is shared with the HTTP
//! handlers through an `Arc`.

mod decryptor;
pub mod error;
mod http;
pub mod protocol;
mod store;

#[cfg(test)]
mod test_support;

use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;

use otpd_crypto::totp::{GeneratedCode, TotpEngine};

pub use decryptor::{decrypt, SeedDecryptor};
pub use error::SeedError;
pub use otpd_crypto::seed::PlaintextSeed;
pub use store::SeedStore;

/// Locations and policy needed to build a [`SeedService`].
#[derive(Debug, Clone)]
pub struct SeedConfig {
    pub data_dir: PathBuf,
    pub private_key: PathBuf,
    /// Adjacent time steps accepted on each side during verification.
    pub skew: u8,
}

pub struct SeedService {
    decryptor: SeedDecryptor,
    store: SeedStore,
    engine: TotpEngine,
}

impl SeedService {
    pub fn new(decryptor: SeedDecryptor, store: SeedStore, engine: TotpEngine) -> Self {
        Self {
            decryptor,
            store,
            engine,
        }
    }

    pub fn from_config(config: &SeedConfig) -> Self {
        Self::new(
            SeedDecryptor::new(&config.private_key),
            SeedStore::in_dir(&config.data_dir),
            TotpEngine::with_skew(config.skew),
        )
    }

    pub fn decryptor(&self) -> &SeedDecryptor {
        &self.decryptor
    }

    pub fn store(&self) -> &SeedStore {
        &self.store
    }

    pub fn engine(&self) -> &TotpEngine {
        &self.engine
    }

    /// Decrypt `encrypted_seed` and make it the stored seed.
    ///
    /// Nothing is written unless decryption succeeds.
    pub fn decrypt_and_store(&self, encrypted_seed: &str) -> Result<(), SeedError> {
        let seed = self.decryptor.decrypt(encrypted_seed)?;
        self.store.save(&seed)?;
        tracing::info!("Seed decrypted and stored");
        Ok(())
    }

    pub fn generate(&self) -> Result<GeneratedCode, SeedError> {
        let seed = self.store.load()?;
        Ok(self.engine.generate(&seed))
    }

    pub fn generate_at(&self, unix_secs: u64) -> Result<GeneratedCode, SeedError> {
        let seed = self.store.load()?;
        Ok(self.engine.generate_at(&seed, unix_secs))
    }

    /// Verify `candidate` against the stored seed.
    ///
    /// An empty candidate is `InvalidCandidate`; any other malformed code is
    /// simply not valid.
    pub fn verify(&self, candidate: &str) -> Result<bool, SeedError> {
        if candidate.is_empty() {
            return Err(SeedError::InvalidCandidate);
        }
        let seed = self.store.load()?;
        Ok(self.engine.verify(&seed, candidate))
    }

    pub fn verify_at(&self, candidate: &str, unix_secs: u64) -> Result<bool, SeedError> {
        if candidate.is_empty() {
            return Err(SeedError::InvalidCandidate);
        }
        let seed = self.store.load()?;
        Ok(self.engine.verify_at(&seed, candidate, unix_secs))
    }
}

/// Build the seed router.
///
/// Routes: `POST /decrypt-seed`, `GET /generate-2fa`, `POST /verify-2fa`.
pub fn routes(state: Arc<SeedService>) -> Router {
    http::routes(state)
}
