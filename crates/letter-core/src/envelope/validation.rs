//! Structural validation of candidate letters and pre-flight checks on drafts.
//!
//! [`validate_structure`] is the only gate between untrusted JSON and an
//! [`EncryptedLetter`]. It checks shape and sizes; it cannot tell whether a
//! ciphertext will decrypt.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use super::types::{EncryptedLetter, EncryptedParagraph, Paragraph, WireLetter, WireParagraph};
use crate::error::{LetterError, Result};
use crate::limits::{
    MAX_CIPHERTEXT_BYTES, MAX_HINT_CHARS, MAX_LETTER_BYTES, MAX_MESSAGE_BYTES, MAX_PARAGRAPHS,
    MAX_TITLE_CHARS, NONCE_LEN, SALT_LEN, TAG_LEN,
};

/// Fields every paragraph object must carry.
const PARAGRAPH_FIELDS: [&str; 4] = ["hint", "salt", "iv", "ciphertext"];

/// Check that `candidate` has the shape of an encrypted letter and build it.
///
/// Requirements:
/// - An object with a string `title` and an array `paragraphs`
/// - Every paragraph an object with string `hint`, `salt`, `iv`, `ciphertext`
/// - `salt`, `iv`, `ciphertext` standard Base64 of 16, 12 and at least 16 bytes
/// - Counts and lengths within [`crate::limits`]
///
/// Missing or mistyped fields are rejected, never defaulted.
pub fn validate_structure(candidate: serde_json::Value) -> Result<EncryptedLetter> {
    let object = candidate
        .as_object()
        .ok_or_else(|| LetterError::Structure("Letter must be a JSON object".to_string()))?;

    match object.get("title") {
        Some(value) if value.is_string() => {}
        Some(_) => {
            return Err(LetterError::Structure(
                "Field title must be a string".to_string(),
            ))
        }
        None => return Err(LetterError::Structure("Missing field: title".to_string())),
    }

    let paragraphs = match object.get("paragraphs") {
        Some(value) => value.as_array().ok_or_else(|| {
            LetterError::Structure("Field paragraphs must be an array".to_string())
        })?,
        None => {
            return Err(LetterError::Structure(
                "Missing field: paragraphs".to_string(),
            ))
        }
    };

    if paragraphs.len() > MAX_PARAGRAPHS {
        return Err(LetterError::Structure(format!(
            "Too many paragraphs (max {})",
            MAX_PARAGRAPHS
        )));
    }

    for (index, paragraph) in paragraphs.iter().enumerate() {
        let fields = paragraph.as_object().ok_or_else(|| {
            LetterError::Structure(format!("Paragraph {} must be a JSON object", index))
        })?;
        for name in PARAGRAPH_FIELDS {
            match fields.get(name) {
                Some(value) if value.is_string() => {}
                Some(_) => {
                    return Err(LetterError::Structure(format!(
                        "Paragraph {} field {} must be a string",
                        index, name
                    )))
                }
                None => {
                    return Err(LetterError::Structure(format!(
                        "Paragraph {} missing field: {}",
                        index, name
                    )))
                }
            }
        }
    }

    let wire: WireLetter = serde_json::from_value(candidate)
        .map_err(|e| LetterError::Structure(e.to_string()))?;

    if wire.title.chars().count() > MAX_TITLE_CHARS {
        return Err(LetterError::Structure(format!(
            "Title too long (max {} characters)",
            MAX_TITLE_CHARS
        )));
    }

    let paragraphs = wire
        .paragraphs
        .into_iter()
        .enumerate()
        .map(|(index, paragraph)| paragraph_from_wire(index, paragraph))
        .collect::<Result<Vec<_>>>()?;

    Ok(EncryptedLetter::new(Some(wire.title), paragraphs))
}

fn paragraph_from_wire(index: usize, wire: WireParagraph) -> Result<EncryptedParagraph> {
    if wire.hint.chars().count() > MAX_HINT_CHARS {
        return Err(LetterError::Structure(format!(
            "Paragraph {} hint too long (max {} characters)",
            index, MAX_HINT_CHARS
        )));
    }

    let salt: [u8; SALT_LEN] = decode_fixed(index, "salt", &wire.salt)?;
    let nonce: [u8; NONCE_LEN] = decode_fixed(index, "iv", &wire.iv)?;

    let ciphertext = decode_base64(index, "ciphertext", &wire.ciphertext)?;
    if ciphertext.len() < TAG_LEN {
        return Err(LetterError::Structure(format!(
            "Paragraph {} ciphertext shorter than the authentication tag",
            index
        )));
    }
    if ciphertext.len() > MAX_CIPHERTEXT_BYTES {
        return Err(LetterError::Structure(format!(
            "Paragraph {} ciphertext too long (max {} bytes)",
            index, MAX_CIPHERTEXT_BYTES
        )));
    }

    Ok(EncryptedParagraph::new(
        Some(wire.hint),
        salt,
        nonce,
        ciphertext,
    ))
}

fn decode_base64(index: usize, field: &str, value: &str) -> Result<Vec<u8>> {
    BASE64.decode(value).map_err(|e| {
        LetterError::Structure(format!(
            "Paragraph {} field {} is not valid base64: {}",
            index, field, e
        ))
    })
}

fn decode_fixed<const N: usize>(index: usize, field: &str, value: &str) -> Result<[u8; N]> {
    let bytes = decode_base64(index, field, value)?;
    let len = bytes.len();
    bytes.try_into().map_err(|_| {
        LetterError::Structure(format!(
            "Paragraph {} field {} must be {} bytes (got {})",
            index, field, N, len
        ))
    })
}

/// Pre-flight checks run by `seal` before any key is derived.
///
/// Every paragraph needs a non-blank message and password. All paragraphs are
/// checked; the first problem found is reported.
pub fn validate_draft(title: Option<&str>, paragraphs: &[Paragraph]) -> Result<()> {
    if paragraphs.is_empty() {
        return Err(LetterError::Validation(
            "Letter must contain at least one paragraph".to_string(),
        ));
    }
    if paragraphs.len() > MAX_PARAGRAPHS {
        return Err(LetterError::Validation(format!(
            "Too many paragraphs (max {})",
            MAX_PARAGRAPHS
        )));
    }
    if let Some(title) = title {
        if title.chars().count() > MAX_TITLE_CHARS {
            return Err(LetterError::Validation(format!(
                "Title too long (max {} characters)",
                MAX_TITLE_CHARS
            )));
        }
    }

    for (index, paragraph) in paragraphs.iter().enumerate() {
        let number = index + 1;
        if paragraph.has_blank_message() {
            return Err(LetterError::Validation(format!(
                "Paragraph {} message cannot be empty",
                number
            )));
        }
        if paragraph.has_blank_password() {
            return Err(LetterError::Validation(format!(
                "Paragraph {} password cannot be empty",
                number
            )));
        }
        if paragraph.message.len() > MAX_MESSAGE_BYTES {
            return Err(LetterError::Validation(format!(
                "Paragraph {} message too long (max {} bytes)",
                number, MAX_MESSAGE_BYTES
            )));
        }
        if let Some(hint) = &paragraph.hint {
            if hint.chars().count() > MAX_HINT_CHARS {
                return Err(LetterError::Validation(format!(
                    "Paragraph {} hint too long (max {} characters)",
                    number, MAX_HINT_CHARS
                )));
            }
        }
    }

    let total: usize = paragraphs.iter().map(|p| p.message.len()).sum();
    if total > MAX_LETTER_BYTES {
        return Err(LetterError::Validation(format!(
            "Letter too long (max {} bytes across all paragraphs)",
            MAX_LETTER_BYTES
        )));
    }

    Ok(())
}
