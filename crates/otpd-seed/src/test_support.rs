use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use rand::rngs::OsRng;
use rsa::pkcs8::{EncodePrivateKey, LineEnding};
use rsa::{Oaep, RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;

pub const RFC_SEED: &str = "3132333435363738393031323334353637383930";

pub fn test_key() -> &'static RsaPrivateKey {
    static KEY: OnceLock<RsaPrivateKey> = OnceLock::new();
    KEY.get_or_init(|| RsaPrivateKey::new(&mut OsRng, 2048).unwrap())
}

pub fn other_key() -> &'static RsaPrivateKey {
    static KEY: OnceLock<RsaPrivateKey> = OnceLock::new();
    KEY.get_or_init(|| RsaPrivateKey::new(&mut OsRng, 2048).unwrap())
}

/// Write `key` as PKCS#8 PEM into `dir` and return the file path.
pub fn write_key_pem(dir: &Path, key: &RsaPrivateKey) -> PathBuf {
    let path = dir.join("student_private.pem");
    let pem = key.to_pkcs8_pem(LineEnding::LF).unwrap();
    std::fs::write(&path, pem.as_bytes()).unwrap();
    path
}

/// Base64 RSA-OAEP(SHA-256) encryption of `plaintext` for `key`.
pub fn encrypt_for(key: &RsaPrivateKey, plaintext: &str) -> String {
    let public = RsaPublicKey::from(key);
    let ct = public
        .encrypt(&mut OsRng, Oaep::new::<Sha256>(), plaintext.as_bytes())
        .unwrap();
    STANDARD.encode(ct)
}
