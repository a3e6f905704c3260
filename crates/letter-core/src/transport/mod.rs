//! Transport codec: letter <-> URL-safe token.
//!
//! Encoding: canonical JSON, raw DEFLATE, then URL-safe Base64 without
//! padding. The token alphabet is `A-Z a-z 0-9 - _`, so it can sit in a query
//! string without percent-encoding.
//!
//! Decoding runs the inverse and finishes with
//! [`validate_structure`](crate::envelope::validate_structure). Every failure
//! comes back as `LetterError::Decode`.

pub mod compression;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use tracing::debug;

use crate::envelope::{validate_structure, EncryptedLetter};
use crate::error::{LetterError, Result};
use crate::limits::{MAX_DECOMPRESSED_BYTES, MAX_TOKEN_CHARS};

/// Encode a letter into a URL-safe token.
///
/// Any token returned here is accepted by [`decode`].
///
/// # Errors
///
/// Returns `LetterError::Validation` if the letter is outside the bounds
/// `decode` enforces (too many paragraphs, oversized fields, or a canonical
/// form or token over the size limits).
pub fn encode(letter: &EncryptedLetter) -> Result<String> {
    let canonical = letter.to_canonical_json()?;
    if canonical.len() > MAX_DECOMPRESSED_BYTES {
        return Err(LetterError::Validation(format!(
            "Letter too large to encode (max {} bytes inflated)",
            MAX_DECOMPRESSED_BYTES
        )));
    }
    let value: serde_json::Value = serde_json::from_slice(&canonical)?;
    validate_structure(value).map_err(|e| match e {
        LetterError::Structure(reason) => LetterError::Validation(reason),
        other => other,
    })?;

    let compressed = compression::compress(&canonical)?;
    let token = URL_SAFE_NO_PAD.encode(compressed);
    if token.len() > MAX_TOKEN_CHARS {
        return Err(LetterError::Validation(format!(
            "Letter too large to encode (max {} token characters)",
            MAX_TOKEN_CHARS
        )));
    }

    debug!(
        paragraphs = letter.len(),
        canonical_bytes = canonical.len(),
        token_chars = token.len(),
        "encoded letter"
    );
    Ok(token)
}

/// Decode a token back into a letter.
///
/// Surrounding whitespace is ignored.
///
/// # Errors
///
/// Returns `LetterError::Decode` if:
/// - The token is empty, too long, or not URL-safe Base64
/// - Decompression fails or yields no output
/// - The inflated text is not JSON
/// - Structural validation rejects the shape
pub fn decode(token: &str) -> Result<EncryptedLetter> {
    let token = token.trim();
    if token.is_empty() {
        return Err(LetterError::Decode("Token is empty".to_string()));
    }
    if token.len() > MAX_TOKEN_CHARS {
        return Err(LetterError::Decode(format!(
            "Token exceeds {} characters",
            MAX_TOKEN_CHARS
        )));
    }

    let compressed = URL_SAFE_NO_PAD
        .decode(token)
        .map_err(|e| LetterError::Decode(format!("Token is not validly encoded: {}", e)))?;

    let canonical = compression::decompress(&compressed, MAX_DECOMPRESSED_BYTES)?;

    let value: serde_json::Value = serde_json::from_slice(&canonical)
        .map_err(|e| LetterError::Decode(format!("Letter is not parseable: {}", e)))?;

    let letter = validate_structure(value).map_err(|e| match e {
        LetterError::Structure(reason) => LetterError::Decode(reason),
        other => LetterError::Decode(other.to_string()),
    })?;

    debug!(paragraphs = letter.len(), "decoded letter");
    Ok(letter)
}

/// Whether a token is longer than `threshold`, past which some browsers may
/// truncate the link. [`TOKEN_WARN_LENGTH`] is the usual threshold.
///
/// [`TOKEN_WARN_LENGTH`]: crate::limits::TOKEN_WARN_LENGTH
pub fn exceeds_warn_length(token: &str, threshold: usize) -> bool {
    token.len() > threshold
}
