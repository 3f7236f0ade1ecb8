//! Persistence of the single plaintext seed record.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use otpd_common::{paths, persist};
use otpd_crypto::seed::PlaintextSeed;
use zeroize::Zeroizing;

use crate::error::SeedError;

/// Owner of the persisted seed.
///
/// Saves are serialized by an internal mutex and land via atomic replace.
/// Loads take no lock: they read whichever complete file the last rename
/// left in place.
#[derive(Debug)]
pub struct SeedStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl SeedStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Store backed by `seed.txt` inside `data_dir`.
    pub fn in_dir(data_dir: &Path) -> Self {
        Self::new(paths::seed_path(data_dir))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_initialized(&self) -> bool {
        self.path.is_file()
    }

    /// Overwrite the stored seed.
    pub fn save(&self, seed: &PlaintextSeed) -> Result<(), SeedError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);

        let contents = Zeroizing::new(format!("{}\n", seed.as_hex()));
        persist::write_text_atomic(&self.path, &contents).map_err(|e| {
            tracing::warn!(error = %e, path = %self.path.display(), "Failed to save seed");
            SeedError::StorageUnavailable(e)
        })?;

        tracing::debug!(path = %self.path.display(), "Seed saved");
        Ok(())
    }

    pub fn load(&self) -> Result<PlaintextSeed, SeedError> {
        let text = match persist::read_text_if_exists(&self.path) {
            Ok(Some(text)) => Zeroizing::new(text),
            Ok(None) => return Err(SeedError::SeedNotInitialized),
            Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                tracing::warn!(error = %e, path = %self.path.display(), "Stored seed is not UTF-8");
                return Err(SeedError::StorageCorrupted);
            }
            Err(e) => {
                tracing::warn!(error = %e, path = %self.path.display(), "Failed to read seed");
                return Err(SeedError::StorageUnavailable(e));
            }
        };

        PlaintextSeed::parse(&text).map_err(|e| {
            tracing::warn!(error = %e, path = %self.path.display(), "Stored seed failed validation");
            SeedError::StorageCorrupted
        })
    }
}
