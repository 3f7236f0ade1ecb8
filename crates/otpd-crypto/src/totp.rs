//! TOTP generation and verification.
//!
//! RFC 6238 with HMAC-SHA1, 6-digit codes and 30-second time steps by
//! default. Verification accepts a configurable number of adjacent steps
//! for clock skew and compares every window slot in constant time via the
//! `subtle` crate. There is no replay tracking: a code stays acceptable for
//! as long as its step is inside the window.

use std::time::{SystemTime, UNIX_EPOCH};

use subtle::{Choice, ConstantTimeEq};
use totp_rs::{Algorithm, TOTP};

use crate::seed::PlaintextSeed;

/// Standard TOTP time step.
pub const DEFAULT_STEP_SECS: u64 = 30;

/// Standard code width.
pub const DEFAULT_DIGITS: usize = 6;

/// Steps accepted on each side of the current one.
pub const DEFAULT_SKEW_STEPS: u8 = 1;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TotpConfigError {
    #[error("time step must be at least one second")]
    ZeroStep,

    #[error("code width must be 6 to 8 digits, got {0}")]
    Digits(usize),
}

/// A freshly generated code and the seconds until it rolls over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedCode {
    pub code: String,
    pub valid_for: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TotpEngine {
    step: u64,
    digits: usize,
    skew: u8,
}

impl TotpEngine {
    pub fn new(step: u64, digits: usize, skew: u8) -> Result<Self, TotpConfigError> {
        if step == 0 {
            return Err(TotpConfigError::ZeroStep);
        }
        if !(6..=8).contains(&digits) {
            return Err(TotpConfigError::Digits(digits));
        }
        Ok(Self { step, digits, skew })
    }

    /// Standard parameters with a custom skew tolerance.
    pub fn with_skew(skew: u8) -> Self {
        Self {
            skew,
            ..Self::default()
        }
    }

    pub fn step(&self) -> u64 {
        self.step
    }

    pub fn digits(&self) -> usize {
        self.digits
    }

    pub fn skew(&self) -> u8 {
        self.skew
    }

    /// Counter `T` for the given Unix time.
    pub fn time_step(&self, unix_secs: u64) -> u64 {
        unix_secs / self.step
    }

    /// Seconds until the code for `unix_secs` changes.
    pub fn valid_for(&self, unix_secs: u64) -> u64 {
        self.step - unix_secs % self.step
    }

    pub fn generate(&self, seed: &PlaintextSeed) -> GeneratedCode {
        self.generate_at(seed, unix_now())
    }

    pub fn generate_at(&self, seed: &PlaintextSeed, unix_secs: u64) -> GeneratedCode {
        GeneratedCode {
            code: self.build(seed).generate(unix_secs),
            valid_for: self.valid_for(unix_secs),
        }
    }

    pub fn verify(&self, seed: &PlaintextSeed, candidate: &str) -> bool {
        self.verify_at(seed, candidate, unix_now())
    }

    /// Check `candidate` against the step containing `unix_secs` and
    /// `skew` steps on either side.
    ///
    /// Malformed candidates (wrong width, non-ASCII-digit characters) are
    /// a plain mismatch.
    pub fn verify_at(&self, seed: &PlaintextSeed, candidate: &str, unix_secs: u64) -> bool {
        if !self.is_well_formed(candidate) {
            return false;
        }

        let totp = self.build(seed);
        let current = self.time_step(unix_secs);
        let skew = i64::from(self.skew);

        let mut matched = Choice::from(0u8);
        for offset in -skew..=skew {
            let Some(counter) = current.checked_add_signed(offset) else {
                continue;
            };
            let Some(time) = counter.checked_mul(self.step) else {
                continue;
            };
            let expected = totp.generate(time);
            matched |= expected.as_bytes().ct_eq(candidate.as_bytes());
        }
        matched.into()
    }

    fn is_well_formed(&self, candidate: &str) -> bool {
        candidate.len() == self.digits && candidate.bytes().all(|b| b.is_ascii_digit())
    }

    fn build(&self, seed: &PlaintextSeed) -> TOTP {
        // PlaintextSeed guarantees at least 128 bits, so the checked
        // constructor's secret-size rule always holds.
        TOTP::new_unchecked(
            Algorithm::SHA1,
            self.digits,
            self.skew,
            self.step,
            seed.to_bytes().to_vec(),
        )
    }
}

impl Default for TotpEngine {
    fn default() -> Self {
        Self {
            step: DEFAULT_STEP_SECS,
            digits: DEFAULT_DIGITS,
            skew: DEFAULT_SKEW_STEPS,
        }
    }
}

/// Current Unix time in seconds (zero if the clock is before the epoch).
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
