//! AES-256-GCM paragraph cipher.
//!
//! Every encryption draws its own nonce from the OS CSPRNG. There is no way to
//! pass a nonce into [`encrypt`], so a (key, nonce) pair cannot be reused by
//! accident.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use rand::rngs::OsRng;
use rand::RngCore;

use super::key::DerivedKey;
use crate::error::{LetterError, Result};
use crate::limits::NONCE_LEN;

/// Encrypt a paragraph's plaintext under `key`.
///
/// Returns the freshly generated nonce and the ciphertext with the
/// authentication tag appended.
pub fn encrypt(plaintext: &str, key: &DerivedKey) -> Result<([u8; NONCE_LEN], Vec<u8>)> {
    let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| LetterError::Crypto(format!("Failed to create cipher: {}", e)))?;

    let mut nonce_bytes = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce_bytes);

    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce_bytes), plaintext.as_bytes())
        .map_err(|_| LetterError::Crypto("Encryption failed".to_string()))?;

    Ok((nonce_bytes, ciphertext))
}

/// Decrypt a paragraph's ciphertext.
///
/// # Errors
///
/// Returns `LetterError::AuthenticationFailure` if:
/// - The key was derived from the wrong password
/// - The ciphertext, nonce or tag were modified
/// - The verified plaintext is not valid UTF-8
///
/// These cases are intentionally indistinguishable.
pub fn decrypt(ciphertext: &[u8], key: &DerivedKey, nonce: &[u8; NONCE_LEN]) -> Result<String> {
    let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| LetterError::Crypto(format!("Failed to create cipher: {}", e)))?;

    let plaintext = cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| LetterError::AuthenticationFailure)?;

    String::from_utf8(plaintext).map_err(|_| LetterError::AuthenticationFailure)
}
