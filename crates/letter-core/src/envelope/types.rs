//! Core data types for the letter envelope.
//!
//! [`Paragraph`] is the sender's plaintext working form and is never
//! serialized. [`EncryptedParagraph`] and [`EncryptedLetter`] are the wire
//! forms; the letter is immutable once built.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

use crate::limits::{NONCE_LEN, SALT_LEN};

/// A plaintext paragraph on the sender side.
pub struct Paragraph {
    /// Opaque identifier, stable while the draft is edited
    pub id: Uuid,

    /// Paragraph text
    pub message: String,

    /// Password protecting this paragraph
    pub password: SecretString,

    /// Optional hint shown to the receiver next to the password prompt
    pub hint: Option<String>,
}

impl Paragraph {
    pub fn new(
        message: impl Into<String>,
        password: impl Into<String>,
        hint: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            message: message.into(),
            password: SecretString::from(password.into()),
            hint,
        }
    }

    /// Whether the message is blank after trimming.
    pub fn has_blank_message(&self) -> bool {
        self.message.trim().is_empty()
    }

    /// Whether the password is blank after trimming.
    pub fn has_blank_password(&self) -> bool {
        self.password.expose_secret().trim().is_empty()
    }
}

impl std::fmt::Debug for Paragraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Paragraph")
            .field("id", &self.id)
            .field("message", &"[REDACTED]")
            .field("password", &"[REDACTED]")
            .field("hint", &self.hint)
            .finish()
    }
}

/// One encrypted paragraph as it travels inside a letter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedParagraph {
    hint: Option<String>,
    salt: [u8; SALT_LEN],
    nonce: [u8; NONCE_LEN],
    ciphertext: Vec<u8>,
}

impl EncryptedParagraph {
    /// Build a paragraph from its parts.
    ///
    /// A blank hint is stored as `None`.
    pub fn new(
        hint: Option<String>,
        salt: [u8; SALT_LEN],
        nonce: [u8; NONCE_LEN],
        ciphertext: Vec<u8>,
    ) -> Self {
        Self {
            hint: normalize_optional(hint),
            salt,
            nonce,
            ciphertext,
        }
    }

    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }

    pub fn salt(&self) -> &[u8; SALT_LEN] {
        &self.salt
    }

    pub fn nonce(&self) -> &[u8; NONCE_LEN] {
        &self.nonce
    }

    /// Ciphertext with the authentication tag appended.
    pub fn ciphertext(&self) -> &[u8] {
        &self.ciphertext
    }
}

/// A sealed letter: an optional title and its ordered encrypted paragraphs.
///
/// Serializes to the canonical JSON form:
///
/// ```text
/// { "title": string, "paragraphs": [ { "hint": string, "salt": base64,
///   "iv": base64, "ciphertext": base64 }, ... ] }
/// ```
///
/// Deserializing always runs [`validate_structure`](super::validate_structure).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedLetter {
    title: Option<String>,
    paragraphs: Vec<EncryptedParagraph>,
}

impl EncryptedLetter {
    /// Build a letter. A blank title is stored as `None`.
    pub fn new(title: Option<String>, paragraphs: Vec<EncryptedParagraph>) -> Self {
        Self {
            title: normalize_optional(title),
            paragraphs,
        }
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn paragraphs(&self) -> &[EncryptedParagraph] {
        &self.paragraphs
    }

    pub fn paragraph(&self, index: usize) -> Option<&EncryptedParagraph> {
        self.paragraphs.get(index)
    }

    pub fn len(&self) -> usize {
        self.paragraphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }

    /// Parse a letter from its canonical JSON text.
    ///
    /// This is the bulk-import path; the parsed value goes through
    /// [`validate_structure`](super::validate_structure).
    pub fn from_json(json: &str) -> crate::Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        super::validate_structure(value)
    }

    /// Serialize to canonical JSON bytes.
    pub fn to_canonical_json(&self) -> crate::Result<Vec<u8>> {
        Ok(serde_json::to_vec(&WireLetter::from(self))?)
    }
}

impl Serialize for EncryptedLetter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        WireLetter::from(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for EncryptedLetter {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        super::validate_structure(value).map_err(serde::de::Error::custom)
    }
}

/// Canonical on-the-wire letter. Field order here is the serialized order.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct WireLetter {
    pub title: String,
    pub paragraphs: Vec<WireParagraph>,
}

/// Canonical on-the-wire paragraph. Binary fields are standard Base64.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct WireParagraph {
    pub hint: String,
    pub salt: String,
    pub iv: String,
    pub ciphertext: String,
}

impl From<&EncryptedLetter> for WireLetter {
    fn from(letter: &EncryptedLetter) -> Self {
        Self {
            title: letter.title.clone().unwrap_or_default(),
            paragraphs: letter.paragraphs.iter().map(WireParagraph::from).collect(),
        }
    }
}

impl From<&EncryptedParagraph> for WireParagraph {
    fn from(paragraph: &EncryptedParagraph) -> Self {
        Self {
            hint: paragraph.hint.clone().unwrap_or_default(),
            salt: BASE64.encode(paragraph.salt),
            iv: BASE64.encode(paragraph.nonce),
            ciphertext: BASE64.encode(&paragraph.ciphertext),
        }
    }
}

/// Trim-check an optional text field; blank becomes `None`.
pub(crate) fn normalize_optional(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
