//! # Letter Core
//!
//! Core library for sealed letters: short multi-paragraph messages where every
//! paragraph is locked behind its own password and the whole letter travels
//! inside a single link.
//!
//! This crate holds the cryptography, the envelope format, the link codec and
//! the receiver-side decryption state, independent of any interface.
//!
//! ## Architecture
//!
//! - **crypto**: PBKDF2 key derivation and AES-256-GCM
//! - **envelope**: Plaintext drafts, sealing, the wire letter and its validation
//! - **transport**: Canonical JSON, DEFLATE and URL-safe Base64 tokens
//! - **receiver**: Per-paragraph decryption controller
//! - **limits**: Size and format constants
//!
//! ## Example
//!
//! ```
//! use letter_core::{decode, decrypt_one, encode, seal, Paragraph};
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let letter = seal(
//!     Some("Note".to_string()),
//!     vec![Paragraph::new("Meet at noon", "swordfish", Some("time".to_string()))],
//! )
//! .await
//! .unwrap();
//!
//! let token = encode(&letter).unwrap();
//! let received = decode(&token).unwrap();
//! let message = decrypt_one(&received.paragraphs()[0], "swordfish").await.unwrap();
//! assert_eq!(message, "Meet at noon");
//! # });
//! ```

pub mod crypto;
pub mod envelope;
pub mod error;
pub mod limits;
pub mod receiver;
pub mod transport;

#[cfg(test)]
mod proptests;

pub use envelope::{
    seal, seal_with, validate_structure, EncryptedLetter, EncryptedParagraph, LetterDraft,
    Paragraph,
};
pub use error::{LetterError, Result};
pub use receiver::{
    decrypt_one, decrypt_one_with, Decryptable, DecryptFailure, DecryptionController,
    DecryptionItem, DecryptionState,
};
pub use transport::{decode, encode};

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
