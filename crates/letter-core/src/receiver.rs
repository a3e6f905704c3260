//! Receiver-side decryption controller.
//!
//! A loaded letter becomes one [`DecryptionItem`] per paragraph. Each item
//! carries its own password input, state and result; an attempt on one item
//! never reads or writes another.
//!
//! Item lifecycle:
//!
//! ```text
//! Pending --request--> Decrypting --ok--> Decrypted (terminal)
//!    ^                     |
//!    |                     +--auth failure--> Failed --request--> Decrypting
//!    +-- empty password rejected, state unchanged
//! ```

use std::sync::Arc;

use tracing::{debug, warn};
use zeroize::Zeroizing;

use crate::crypto::{cipher, KeyDerivation, Pbkdf2Sha256};
use crate::envelope::{EncryptedLetter, EncryptedParagraph};
use crate::error::{LetterError, Result};

/// Decryption state of a single item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecryptionState {
    Pending,
    Decrypting,
    Decrypted,
    Failed,
}

/// Error kind recorded on an item after a failed request.
///
/// Deliberately coarse: a wrong password and corrupted data look the same.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecryptFailure {
    IncorrectPasswordOrCorrupted,
    EmptyPassword,
}

impl std::fmt::Display for DecryptFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecryptFailure::IncorrectPasswordOrCorrupted => {
                write!(f, "Incorrect password or corrupted data")
            }
            DecryptFailure::EmptyPassword => write!(f, "Password cannot be empty"),
        }
    }
}

/// Anything that wraps an encrypted paragraph and can be decrypted.
pub trait Decryptable {
    /// The immutable wire paragraph.
    fn encrypted(&self) -> &EncryptedParagraph;

    fn hint(&self) -> Option<&str> {
        self.encrypted().hint()
    }
}

impl Decryptable for EncryptedParagraph {
    fn encrypted(&self) -> &EncryptedParagraph {
        self
    }
}

/// One paragraph of a loaded letter plus its per-session attempt state.
pub struct DecryptionItem {
    index: usize,
    paragraph: EncryptedParagraph,
    password_input: Zeroizing<String>,
    decrypted_message: Zeroizing<String>,
    last_error: Option<DecryptFailure>,
    state: DecryptionState,
    /// State to fall back to when an attempt fails for a reason other than
    /// the password.
    resume_state: DecryptionState,
    generation: u64,
}

impl DecryptionItem {
    fn new(index: usize, paragraph: EncryptedParagraph) -> Self {
        Self {
            index,
            paragraph,
            password_input: Zeroizing::new(String::new()),
            decrypted_message: Zeroizing::new(String::new()),
            last_error: None,
            state: DecryptionState::Pending,
            resume_state: DecryptionState::Pending,
            generation: 0,
        }
    }

    /// Position of this paragraph in the letter.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn password_input(&self) -> &str {
        &self.password_input
    }

    /// Revealed text; empty until the item is decrypted.
    pub fn decrypted_message(&self) -> &str {
        &self.decrypted_message
    }

    pub fn last_error(&self) -> Option<DecryptFailure> {
        self.last_error
    }

    pub fn state(&self) -> DecryptionState {
        self.state
    }

    pub fn is_decrypted(&self) -> bool {
        self.state == DecryptionState::Decrypted
    }
}

impl Decryptable for DecryptionItem {
    fn encrypted(&self) -> &EncryptedParagraph {
        &self.paragraph
    }
}

impl std::fmt::Debug for DecryptionItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecryptionItem")
            .field("index", &self.index)
            .field("hint", &self.paragraph.hint())
            .field("password_input", &"[REDACTED]")
            .field("decrypted_message", &"[REDACTED]")
            .field("last_error", &self.last_error)
            .field("state", &self.state)
            .finish()
    }
}

/// A decrypt request detached from the controller.
///
/// Owns copies of everything it needs, so the controller stays usable while
/// the attempt runs. Feed the resulting [`AttemptOutcome`] back through
/// [`DecryptionController::complete`].
pub struct DecryptAttempt {
    index: usize,
    generation: u64,
    paragraph: EncryptedParagraph,
    password: Zeroizing<String>,
    kdf: Arc<dyn KeyDerivation>,
}

impl DecryptAttempt {
    pub fn index(&self) -> usize {
        self.index
    }

    /// Run the attempt on a blocking task.
    pub async fn run(self) -> AttemptOutcome {
        let index = self.index;
        let generation = self.generation;
        let result = tokio::task::spawn_blocking(move || self.execute())
            .await
            .map_err(|e| LetterError::Crypto(format!("Decrypt task failed: {}", e)))
            .and_then(|result| result);
        AttemptOutcome {
            index,
            generation,
            result,
        }
    }

    /// Run the attempt on the current thread.
    pub fn run_blocking(self) -> AttemptOutcome {
        let index = self.index;
        let generation = self.generation;
        let result = self.execute();
        AttemptOutcome {
            index,
            generation,
            result,
        }
    }

    fn execute(self) -> Result<String> {
        open_paragraph(self.kdf.as_ref(), &self.paragraph, &self.password)
    }
}

/// Result of a [`DecryptAttempt`], tagged with the item it belongs to.
pub struct AttemptOutcome {
    index: usize,
    generation: u64,
    result: Result<String>,
}

impl AttemptOutcome {
    pub fn index(&self) -> usize {
        self.index
    }
}

/// Per-letter receiver state: one item per paragraph, in letter order.
pub struct DecryptionController {
    title: Option<String>,
    items: Vec<DecryptionItem>,
    kdf: Arc<dyn KeyDerivation>,
}

impl DecryptionController {
    /// Load a letter using the default key derivation.
    pub fn new(letter: EncryptedLetter) -> Self {
        Self::with_key_derivation(letter, Arc::new(Pbkdf2Sha256))
    }

    pub fn with_key_derivation(letter: EncryptedLetter, kdf: Arc<dyn KeyDerivation>) -> Self {
        let title = letter.title().map(str::to_string);
        let items = letter
            .paragraphs()
            .iter()
            .cloned()
            .enumerate()
            .map(|(index, paragraph)| DecryptionItem::new(index, paragraph))
            .collect();
        Self { title, items, kdf }
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[DecryptionItem] {
        &self.items
    }

    pub fn item(&self, index: usize) -> Result<&DecryptionItem> {
        self.items.get(index).ok_or(LetterError::InvalidIndex(index))
    }

    /// Number of items already revealed.
    pub fn decrypted_count(&self) -> usize {
        self.items.iter().filter(|item| item.is_decrypted()).count()
    }

    pub fn is_fully_decrypted(&self) -> bool {
        self.items.iter().all(DecryptionItem::is_decrypted)
    }

    /// Record what the user typed for one item.
    pub fn set_password_input(&mut self, index: usize, input: impl Into<String>) -> Result<()> {
        let item = self.item_mut(index)?;
        item.password_input = Zeroizing::new(input.into());
        Ok(())
    }

    /// Start a decrypt attempt for one item using its current password input.
    ///
    /// Returns `Ok(None)` when the item is already decrypted; revealed text
    /// is never derived again.
    ///
    /// # Errors
    ///
    /// - `LetterError::InvalidIndex` if there is no such item
    /// - `LetterError::EmptyPassword` if the input is blank; the state is left
    ///   as it was
    pub fn begin_decrypt(&mut self, index: usize) -> Result<Option<DecryptAttempt>> {
        let kdf = Arc::clone(&self.kdf);
        let item = self.item_mut(index)?;

        if item.is_decrypted() {
            return Ok(None);
        }
        if item.password_input.trim().is_empty() {
            item.last_error = Some(DecryptFailure::EmptyPassword);
            return Err(LetterError::EmptyPassword);
        }

        item.generation += 1;
        if item.state != DecryptionState::Decrypting {
            item.resume_state = item.state;
        }
        item.state = DecryptionState::Decrypting;
        debug!(index, generation = item.generation, "decrypt attempt started");

        Ok(Some(DecryptAttempt {
            index,
            generation: item.generation,
            paragraph: item.paragraph.clone(),
            password: item.password_input.clone(),
            kdf,
        }))
    }

    /// Apply a finished attempt to its item.
    ///
    /// # Errors
    ///
    /// - `LetterError::Superseded` if a newer attempt was started on the item
    ///   (the outcome is discarded)
    /// - `LetterError::AuthenticationFailure` if the password was wrong or the
    ///   paragraph is corrupted; the item moves to `Failed`
    /// - Any other error from the attempt; the item goes back to the state it
    ///   had before the attempt and can be retried
    pub fn complete(&mut self, outcome: AttemptOutcome) -> Result<&str> {
        let item = self.item_mut(outcome.index)?;

        if outcome.generation != item.generation || item.state != DecryptionState::Decrypting {
            debug!(index = outcome.index, "discarding superseded decrypt outcome");
            return Err(LetterError::Superseded);
        }

        match outcome.result {
            Ok(message) => {
                item.decrypted_message = Zeroizing::new(message);
                item.last_error = None;
                item.state = DecryptionState::Decrypted;
                debug!(index = outcome.index, "paragraph decrypted");
                Ok(item.decrypted_message.as_str())
            }
            Err(LetterError::AuthenticationFailure) => {
                item.decrypted_message = Zeroizing::new(String::new());
                item.last_error = Some(DecryptFailure::IncorrectPasswordOrCorrupted);
                item.state = DecryptionState::Failed;
                debug!(index = outcome.index, "paragraph decrypt failed");
                Err(LetterError::AuthenticationFailure)
            }
            Err(err) => {
                item.state = item.resume_state;
                warn!(index = outcome.index, error = %err, "decrypt attempt aborted");
                Err(err)
            }
        }
    }

    /// Decrypt one item with its current password input.
    ///
    /// An already decrypted item returns its text without any derivation.
    pub async fn decrypt(&mut self, index: usize) -> Result<&str> {
        match self.begin_decrypt(index)? {
            Some(attempt) => {
                let outcome = attempt.run().await;
                self.complete(outcome)
            }
            None => Ok(self.items[index].decrypted_message()),
        }
    }

    /// Set the password input for one item and decrypt it.
    pub async fn decrypt_with(&mut self, index: usize, password: impl Into<String>) -> Result<&str> {
        if !self.item(index)?.is_decrypted() {
            self.set_password_input(index, password)?;
        }
        self.decrypt(index).await
    }

    fn item_mut(&mut self, index: usize) -> Result<&mut DecryptionItem> {
        self.items
            .get_mut(index)
            .ok_or(LetterError::InvalidIndex(index))
    }
}

/// Decrypt a single paragraph with a password (blocking).
///
/// The key is derived from the paragraph's own salt, used once and dropped.
pub fn open_paragraph(
    kdf: &dyn KeyDerivation,
    paragraph: &EncryptedParagraph,
    password: &str,
) -> Result<String> {
    let key = kdf.derive_key(password, paragraph.salt());
    cipher::decrypt(paragraph.ciphertext(), &key, paragraph.nonce())
}

/// Decrypt one paragraph off the calling task with the default key derivation.
///
/// # Errors
///
/// - `LetterError::EmptyPassword` if the password is blank
/// - `LetterError::AuthenticationFailure` if the password is wrong or the
///   data is corrupted
pub async fn decrypt_one<D>(item: &D, password: &str) -> Result<String>
where
    D: Decryptable + ?Sized,
{
    decrypt_one_with(Arc::new(Pbkdf2Sha256), item, password).await
}

/// [`decrypt_one`] with an explicit key derivation primitive.
pub async fn decrypt_one_with<D>(
    kdf: Arc<dyn KeyDerivation>,
    item: &D,
    password: &str,
) -> Result<String>
where
    D: Decryptable + ?Sized,
{
    if password.trim().is_empty() {
        return Err(LetterError::EmptyPassword);
    }

    let paragraph = item.encrypted().clone();
    let password = Zeroizing::new(password.to_string());

    tokio::task::spawn_blocking(move || open_paragraph(kdf.as_ref(), &paragraph, &password))
        .await
        .map_err(|e| LetterError::Crypto(format!("Decrypt task failed: {}", e)))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::DerivedKey;
    use crate::envelope::{encrypt_paragraph, Paragraph};
    use crate::limits::SALT_LEN;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct FastKdf {
        calls: AtomicUsize,
    }

    impl KeyDerivation for FastKdf {
        fn derive_key(&self, password: &str, salt: &[u8; SALT_LEN]) -> DerivedKey {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut key = [0u8; 32];
            pbkdf2::pbkdf2_hmac::<sha2::Sha256>(password.as_bytes(), salt, 1, &mut key);
            DerivedKey::from_bytes(key)
        }
    }

    fn letter(kdf: &FastKdf, parts: &[(&str, &str)]) -> EncryptedLetter {
        let paragraphs = parts
            .iter()
            .map(|(message, password)| {
                encrypt_paragraph(kdf, Paragraph::new(*message, *password, None)).unwrap()
            })
            .collect();
        EncryptedLetter::new(Some("Test".into()), paragraphs)
    }

    fn loaded(parts: &[(&str, &str)]) -> (DecryptionController, Arc<FastKdf>) {
        let kdf = Arc::new(FastKdf::default());
        let letter = letter(&kdf, parts);
        kdf.calls.store(0, Ordering::SeqCst);
        let controller = DecryptionController::with_key_derivation(letter, kdf.clone());
        (controller, kdf)
    }

    #[test]
    fn test_items_start_pending() {
        let (controller, _) = loaded(&[("a", "1"), ("b", "2")]);
        assert_eq!(controller.len(), 2);
        assert_eq!(controller.title(), Some("Test"));
        for (index, item) in controller.items().iter().enumerate() {
            assert_eq!(item.index(), index);
            assert_eq!(item.state(), DecryptionState::Pending);
            assert_eq!(item.decrypted_message(), "");
            assert_eq!(item.last_error(), None);
        }
    }

    #[tokio::test]
    async fn test_correct_password_decrypts() {
        let (mut controller, _) = loaded(&[("Meet at noon", "swordfish")]);
        let message = controller.decrypt_with(0, "swordfish").await.unwrap();
        assert_eq!(message, "Meet at noon");

        let item = controller.item(0).unwrap();
        assert!(item.is_decrypted());
        assert_eq!(item.last_error(), None);
        assert!(controller.is_fully_decrypted());
    }

    #[tokio::test]
    async fn test_empty_password_keeps_state() {
        let (mut controller, kdf) = loaded(&[("text", "pw")]);
        controller.set_password_input(0, "   ").unwrap();

        let result = controller.decrypt(0).await;
        assert!(matches!(result, Err(LetterError::EmptyPassword)));

        let item = controller.item(0).unwrap();
        assert_eq!(item.state(), DecryptionState::Pending);
        assert_eq!(item.last_error(), Some(DecryptFailure::EmptyPassword));
        assert_eq!(kdf.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failure_is_not_sticky() {
        let (mut controller, _) = loaded(&[("text", "right")]);

        let result = controller.decrypt_with(0, "wrong").await;
        assert!(matches!(result, Err(LetterError::AuthenticationFailure)));
        let item = controller.item(0).unwrap();
        assert_eq!(item.state(), DecryptionState::Failed);
        assert_eq!(
            item.last_error(),
            Some(DecryptFailure::IncorrectPasswordOrCorrupted)
        );
        assert_eq!(item.decrypted_message(), "");

        let message = controller.decrypt_with(0, "right").await.unwrap();
        assert_eq!(message, "text");
        assert_eq!(controller.item(0).unwrap().last_error(), None);
    }

    #[tokio::test]
    async fn test_decrypted_item_is_terminal() {
        let (mut controller, kdf) = loaded(&[("text", "right")]);
        controller.decrypt_with(0, "right").await.unwrap();
        let calls = kdf.calls.load(Ordering::SeqCst);

        // A later wrong password neither re-derives nor overwrites.
        let message = controller.decrypt_with(0, "wrong").await.unwrap();
        assert_eq!(message, "text");
        assert_eq!(kdf.calls.load(Ordering::SeqCst), calls);
        assert!(controller.begin_decrypt(0).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_items_are_independent() {
        let (mut controller, _) = loaded(&[("one", "a"), ("two", "b"), ("three", "c")]);
        controller.decrypt_with(0, "a").await.unwrap();

        let result = controller.decrypt_with(1, "not-b").await;
        assert!(matches!(result, Err(LetterError::AuthenticationFailure)));

        let first = controller.item(0).unwrap();
        assert!(first.is_decrypted());
        assert_eq!(first.decrypted_message(), "one");

        let third = controller.item(2).unwrap();
        assert_eq!(third.state(), DecryptionState::Pending);
        assert_eq!(third.decrypted_message(), "");
        assert_eq!(controller.decrypted_count(), 1);
    }

    #[test]
    fn test_superseded_outcome_discarded() {
        let (mut controller, _) = loaded(&[("text", "right")]);

        controller.set_password_input(0, "wrong").unwrap();
        let stale = controller.begin_decrypt(0).unwrap().unwrap();
        controller.set_password_input(0, "right").unwrap();
        let fresh = controller.begin_decrypt(0).unwrap().unwrap();

        let stale_outcome = stale.run_blocking();
        let fresh_outcome = fresh.run_blocking();

        assert!(matches!(
            controller.complete(stale_outcome),
            Err(LetterError::Superseded)
        ));
        assert_eq!(controller.item(0).unwrap().state(), DecryptionState::Decrypting);

        assert_eq!(controller.complete(fresh_outcome).unwrap(), "text");
    }

    #[test]
    fn test_task_failure_leaves_item_retryable() {
        let (mut controller, _) = loaded(&[("text", "right")]);

        controller.set_password_input(0, "right").unwrap();
        let attempt = controller.begin_decrypt(0).unwrap().unwrap();
        let aborted = AttemptOutcome {
            index: 0,
            generation: attempt.generation,
            result: Err(LetterError::Crypto("Decrypt task failed: cancelled".into())),
        };
        assert!(matches!(
            controller.complete(aborted),
            Err(LetterError::Crypto(_))
        ));

        let item = controller.item(0).unwrap();
        assert_eq!(item.state(), DecryptionState::Pending);
        assert_eq!(item.last_error(), None);

        let retry = controller.begin_decrypt(0).unwrap().unwrap();
        let outcome = retry.run_blocking();
        assert_eq!(controller.complete(outcome).unwrap(), "text");
    }

    #[test]
    fn test_task_failure_after_wrong_password_stays_failed() {
        let (mut controller, _) = loaded(&[("text", "right")]);

        controller.set_password_input(0, "wrong").unwrap();
        let wrong = controller.begin_decrypt(0).unwrap().unwrap().run_blocking();
        assert!(controller.complete(wrong).is_err());

        let attempt = controller.begin_decrypt(0).unwrap().unwrap();
        let aborted = AttemptOutcome {
            index: 0,
            generation: attempt.generation,
            result: Err(LetterError::Crypto("Decrypt task failed: cancelled".into())),
        };
        assert!(controller.complete(aborted).is_err());

        let item = controller.item(0).unwrap();
        assert_eq!(item.state(), DecryptionState::Failed);
        assert_eq!(
            item.last_error(),
            Some(DecryptFailure::IncorrectPasswordOrCorrupted)
        );
    }

    #[test]
    fn test_invalid_index() {
        let (mut controller, _) = loaded(&[("text", "pw")]);
        assert!(matches!(controller.item(5), Err(LetterError::InvalidIndex(5))));
        assert!(matches!(
            controller.set_password_input(5, "x"),
            Err(LetterError::InvalidIndex(5))
        ));
    }

    #[tokio::test]
    async fn test_decrypt_one_on_wire_paragraph() {
        let kdf = Arc::new(FastKdf::default());
        let sealed = encrypt_paragraph(kdf.as_ref(), Paragraph::new("hi", "pw", None)).unwrap();

        let message = decrypt_one_with(kdf.clone(), &sealed, "pw").await.unwrap();
        assert_eq!(message, "hi");

        assert!(matches!(
            decrypt_one_with(kdf.clone(), &sealed, "").await,
            Err(LetterError::EmptyPassword)
        ));
        assert!(matches!(
            decrypt_one_with(kdf, &sealed, "nope").await,
            Err(LetterError::AuthenticationFailure)
        ));
    }

    #[test]
    fn test_item_debug_redacts() {
        let (mut controller, _) = loaded(&[("SECRET_TEXT", "pw")]);
        controller.set_password_input(0, "TYPED_PASSWORD").unwrap();
        let debug_output = format!("{:?}", controller.item(0).unwrap());
        assert!(!debug_output.contains("TYPED_PASSWORD"));
    }
}
