//! Property-based tests for the envelope and transport layers.
//!
//! - Decoding arbitrary input never panics and only ever fails with a decode error
//! - Well-formed letters survive encode/decode unchanged
//! - Blank titles and hints always normalize to absent

use proptest::prelude::*;

use crate::envelope::{EncryptedLetter, EncryptedParagraph};
use crate::error::LetterError;
use crate::limits::{NONCE_LEN, SALT_LEN, TAG_LEN};
use crate::transport::{decode, encode};

fn paragraph_strategy() -> impl Strategy<Value = EncryptedParagraph> {
    (
        proptest::option::of(".{0,40}"),
        any::<[u8; SALT_LEN]>(),
        any::<[u8; NONCE_LEN]>(),
        proptest::collection::vec(any::<u8>(), TAG_LEN..TAG_LEN + 200),
    )
        .prop_map(|(hint, salt, nonce, ciphertext)| {
            EncryptedParagraph::new(hint, salt, nonce, ciphertext)
        })
}

fn letter_strategy() -> impl Strategy<Value = EncryptedLetter> {
    (
        proptest::option::of(".{0,60}"),
        proptest::collection::vec(paragraph_strategy(), 0..6),
    )
        .prop_map(|(title, paragraphs)| EncryptedLetter::new(title, paragraphs))
}

// ==================== Transport Property Tests ====================

proptest! {
    /// Arbitrary strings either decode or fail with a decode error.
    #[test]
    fn decode_never_panics(input in ".{0,200}") {
        if let Err(err) = decode(&input) {
            prop_assert!(matches!(err, LetterError::Decode(_)));
        }
    }

    /// Arbitrary URL-safe strings are rejected cleanly.
    #[test]
    fn decode_url_safe_garbage(input in "[A-Za-z0-9_-]{1,300}") {
        if let Err(err) = decode(&input) {
            prop_assert!(matches!(err, LetterError::Decode(_)));
        }
    }

    /// Encoding then decoding yields an equal letter.
    #[test]
    fn encode_decode_preserves_letter(letter in letter_strategy()) {
        let token = encode(&letter).unwrap();
        prop_assert!(token.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
        let decoded = decode(&token).unwrap();
        prop_assert_eq!(decoded, letter);
    }
}

// ==================== Normalization Property Tests ====================

proptest! {
    /// Whitespace-only hints are never stored.
    #[test]
    fn blank_hint_is_absent(hint in "[ \t\n]{0,10}") {
        let paragraph = EncryptedParagraph::new(
            Some(hint),
            [0; SALT_LEN],
            [0; NONCE_LEN],
            vec![0; TAG_LEN],
        );
        prop_assert_eq!(paragraph.hint(), None);
    }

    /// Whitespace-only titles are never stored.
    #[test]
    fn blank_title_is_absent(title in "[ \t\n]{0,10}") {
        let letter = EncryptedLetter::new(Some(title), Vec::new());
        prop_assert_eq!(letter.title(), None);
    }
}
