//! Hex-encoded TOTP seed with validation and zeroize-on-drop.

use std::fmt;

use zeroize::{Zeroize, Zeroizing};

/// Smallest accepted seed (128 bits, the floor `totp-rs` enforces for HMAC keys).
pub const MIN_SEED_BYTES: usize = 16;

/// Largest accepted seed (one SHA-1 block).
pub const MAX_SEED_BYTES: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SeedFormatError {
    #[error("seed is empty")]
    Empty,

    #[error("seed is not valid hex")]
    NotHex,

    #[error("seed decodes to {len} bytes, expected 16..=64")]
    BadLength { len: usize },
}

/// The shared TOTP secret, kept in its hex form.
///
/// Construction validates the hex and the decoded length, so holders of a
/// `PlaintextSeed` can always derive HMAC key bytes from it.
#[derive(Clone, PartialEq, Eq)]
pub struct PlaintextSeed {
    hex: String,
}

impl PlaintextSeed {
    /// Parse a hex seed. Surrounding whitespace is ignored; case is kept.
    pub fn parse(text: &str) -> Result<Self, SeedFormatError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(SeedFormatError::Empty);
        }
        let bytes = Zeroizing::new(hex::decode(trimmed).map_err(|_| SeedFormatError::NotHex)?);
        if !(MIN_SEED_BYTES..=MAX_SEED_BYTES).contains(&bytes.len()) {
            return Err(SeedFormatError::BadLength { len: bytes.len() });
        }
        Ok(Self {
            hex: trimmed.to_string(),
        })
    }

    /// The hex text exactly as it will be persisted.
    pub fn as_hex(&self) -> &str {
        &self.hex
    }

    /// Decoded secret bytes for use as an HMAC key.
    pub fn to_bytes(&self) -> Zeroizing<Vec<u8>> {
        // Validated at construction.
        Zeroizing::new(hex::decode(&self.hex).unwrap_or_default())
    }
}

impl fmt::Debug for PlaintextSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaintextSeed")
            .field("hex", &"<redacted>")
            .finish()
    }
}

impl Drop for PlaintextSeed {
    fn drop(&mut self) {
        self.hex.zeroize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RFC_SEED: &str = "3132333435363738393031323334353637383930";

    #[test]
    fn parses_rfc_seed() {
        let seed = PlaintextSeed::parse(RFC_SEED).unwrap();
        assert_eq!(seed.as_hex(), RFC_SEED);
        assert_eq!(seed.to_bytes().as_slice(), b"12345678901234567890");
    }

    #[test]
    fn accepts_64_char_seed_and_trims_whitespace() {
        let hex = "ab".repeat(32);
        let seed = PlaintextSeed::parse(&format!("  {hex}\n")).unwrap();
        assert_eq!(seed.as_hex(), hex);
    }

    #[test]
    fn preserves_case() {
        let hex = "AbCd".repeat(8);
        assert_eq!(PlaintextSeed::parse(&hex).unwrap().as_hex(), hex);
    }

    #[test]
    fn rejects_empty() {
        assert_eq!(PlaintextSeed::parse("  \n"), Err(SeedFormatError::Empty));
    }

    #[test]
    fn rejects_non_hex_and_odd_length() {
        assert_eq!(
            PlaintextSeed::parse(&"zz".repeat(20)),
            Err(SeedFormatError::NotHex)
        );
        assert_eq!(
            PlaintextSeed::parse(&format!("{RFC_SEED}0")),
            Err(SeedFormatError::NotHex)
        );
    }

    #[test]
    fn rejects_out_of_range_lengths() {
        assert_eq!(
            PlaintextSeed::parse(&"00".repeat(15)),
            Err(SeedFormatError::BadLength { len: 15 })
        );
        assert_eq!(
            PlaintextSeed::parse(&"00".repeat(65)),
            Err(SeedFormatError::BadLength { len: 65 })
        );
    }

    #[test]
    fn debug_output_is_redacted() {
        let seed = PlaintextSeed::parse(RFC_SEED).unwrap();
        let debug = format!("{seed:?}");
        assert!(!debug.contains(RFC_SEED));
        assert!(debug.contains("redacted"));
    }
}
