//! Error types for sealed letter operations.
//!
//! Errors are descriptive at the core level; the CLI layer maps these
//! to user-friendly messages. Decryption failures are deliberately generic:
//! a wrong password and a tampered ciphertext produce the same error.

use thiserror::Error;

/// Result type alias for letter operations.
pub type Result<T> = std::result::Result<T, LetterError>;

/// Core error type for letter operations.
#[derive(Debug, Error)]
pub enum LetterError {
    /// Sender input rejected before any cryptographic work
    #[error("Validation error: {0}")]
    Validation(String),

    /// Candidate envelope does not have the expected shape
    #[error("Invalid letter structure: {0}")]
    Structure(String),

    /// Token could not be turned back into a letter
    #[error("Invalid or corrupted link: {0}")]
    Decode(String),

    /// Integrity tag did not verify (wrong password or corrupted data)
    #[error("Incorrect password or corrupted data")]
    AuthenticationFailure,

    /// Decrypt attempted without a password
    #[error("Password cannot be empty")]
    EmptyPassword,

    /// Receiver addressed a paragraph that does not exist
    #[error("No paragraph at index {0}")]
    InvalidIndex(usize),

    /// A newer decrypt attempt on the same paragraph replaced this one
    #[error("Decrypt attempt superseded by a newer attempt")]
    Superseded,

    /// Failure inside a cryptographic primitive or its task
    #[error("Encryption error: {0}")]
    Crypto(String),

    /// JSON serialization/deserialization error
    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },
}

impl LetterError {
    /// Whether this error only concerns a single paragraph.
    ///
    /// Item-scoped errors never abort sibling paragraphs.
    pub fn is_item_scoped(&self) -> bool {
        matches!(
            self,
            LetterError::AuthenticationFailure
                | LetterError::EmptyPassword
                | LetterError::Superseded
        )
    }
}
