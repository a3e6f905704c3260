//! The letter envelope.
//!
//! A letter is a title plus an ordered list of independently encrypted
//! paragraphs. This module covers:
//! - **types**: plaintext and wire data model
//! - **seal**: concurrent per-paragraph encryption
//! - **draft**: sender-side editing before sealing
//! - **validation**: pre-flight checks and structural validation

pub mod draft;
pub mod seal;
pub mod types;
pub mod validation;

pub use draft::LetterDraft;
pub use seal::{encrypt_paragraph, seal, seal_with};
pub use types::{EncryptedLetter, EncryptedParagraph, Paragraph};
pub use validation::{validate_draft, validate_structure};
