//! otpd Crypto: the cryptographic pieces of the seed lifecycle.
//!
//! Provides the validated [`seed::PlaintextSeed`] type, RSA-OAEP decryption
//! of encrypted seeds with a PEM private key, and RFC 6238 TOTP generation
//! and verification.

pub mod keys;
pub mod seed;
pub mod totp;
