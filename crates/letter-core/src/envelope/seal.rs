//! Sealing: turning plaintext paragraphs into an encrypted letter.
//!
//! Each paragraph gets its own salt, its own derived key and its own nonce.
//! Paragraphs are encrypted on separate blocking tasks and reassembled in
//! input order.

use std::sync::Arc;

use secrecy::ExposeSecret;
use tokio::task::JoinHandle;
use tracing::debug;

use super::types::{normalize_optional, EncryptedLetter, EncryptedParagraph, Paragraph};
use super::validation::validate_draft;
use crate::crypto::{cipher, generate_salt, KeyDerivation, Pbkdf2Sha256};
use crate::error::{LetterError, Result};

/// Seal a letter with the default key derivation (PBKDF2-HMAC-SHA256).
///
/// # Errors
///
/// Returns `LetterError::Validation` if any paragraph has a blank message or
/// password, or if a limit is exceeded. No key is derived in that case.
///
/// # Examples
///
/// ```
/// use letter_core::{seal, Paragraph};
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let letter = seal(
///     Some("Note".to_string()),
///     vec![Paragraph::new("Meet at noon", "swordfish", Some("time".to_string()))],
/// )
/// .await
/// .unwrap();
/// assert_eq!(letter.len(), 1);
/// # });
/// ```
pub async fn seal(title: Option<String>, paragraphs: Vec<Paragraph>) -> Result<EncryptedLetter> {
    seal_with(Arc::new(Pbkdf2Sha256), title, paragraphs).await
}

/// Seal a letter using the given key derivation primitive.
pub async fn seal_with(
    kdf: Arc<dyn KeyDerivation>,
    title: Option<String>,
    paragraphs: Vec<Paragraph>,
) -> Result<EncryptedLetter> {
    let title = normalize_optional(title);
    validate_draft(title.as_deref(), &paragraphs)?;

    debug!(paragraphs = paragraphs.len(), "sealing letter");

    let handles: Vec<JoinHandle<Result<EncryptedParagraph>>> = paragraphs
        .into_iter()
        .map(|paragraph| {
            let kdf = Arc::clone(&kdf);
            tokio::task::spawn_blocking(move || encrypt_paragraph(kdf.as_ref(), paragraph))
        })
        .collect();

    // Joined in spawn order, so completion order never affects paragraph order.
    let mut sealed = Vec::with_capacity(handles.len());
    for handle in handles {
        let paragraph = handle
            .await
            .map_err(|e| LetterError::Crypto(format!("Paragraph task failed: {}", e)))??;
        sealed.push(paragraph);
    }

    debug!(paragraphs = sealed.len(), "letter sealed");
    Ok(EncryptedLetter::new(title, sealed))
}

/// Encrypt one paragraph under a key derived from a fresh salt.
///
/// Blocking: runs the full key derivation. The derived key is dropped (and
/// zeroized) before this returns.
pub fn encrypt_paragraph(kdf: &dyn KeyDerivation, paragraph: Paragraph) -> Result<EncryptedParagraph> {
    let salt = generate_salt();
    let key = kdf.derive_key(paragraph.password.expose_secret(), &salt);
    let (nonce, ciphertext) = cipher::encrypt(&paragraph.message, &key)?;
    drop(key);

    Ok(EncryptedParagraph::new(paragraph.hint, salt, nonce, ciphertext))
}
