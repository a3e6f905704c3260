//! Sender-side working set of paragraphs.

use std::sync::Arc;

use secrecy::SecretString;
use uuid::Uuid;

use super::seal::{seal, seal_with};
use super::types::{EncryptedLetter, Paragraph};
use crate::crypto::KeyDerivation;
use crate::error::Result;

/// A letter being composed.
///
/// Paragraphs can be added, edited and removed freely until the draft is
/// sealed; sealing consumes it.
#[derive(Debug, Default)]
pub struct LetterDraft {
    title: Option<String>,
    paragraphs: Vec<Paragraph>,
}

impl LetterDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            paragraphs: Vec::new(),
        }
    }

    pub fn set_title(&mut self, title: Option<String>) {
        self.title = title;
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Append a paragraph and return its identifier.
    pub fn add_paragraph(
        &mut self,
        message: impl Into<String>,
        password: impl Into<String>,
        hint: Option<String>,
    ) -> Uuid {
        let paragraph = Paragraph::new(message, password, hint);
        let id = paragraph.id;
        self.paragraphs.push(paragraph);
        id
    }

    /// Remove a paragraph. Returns `false` if no paragraph has that id.
    pub fn remove_paragraph(&mut self, id: Uuid) -> bool {
        let before = self.paragraphs.len();
        self.paragraphs.retain(|paragraph| paragraph.id != id);
        self.paragraphs.len() != before
    }

    /// Replace the message of a paragraph. Returns `false` if not found.
    pub fn update_message(&mut self, id: Uuid, message: impl Into<String>) -> bool {
        match self.find_mut(id) {
            Some(paragraph) => {
                paragraph.message = message.into();
                true
            }
            None => false,
        }
    }

    /// Replace the password of a paragraph. Returns `false` if not found.
    pub fn update_password(&mut self, id: Uuid, password: impl Into<String>) -> bool {
        match self.find_mut(id) {
            Some(paragraph) => {
                paragraph.password = SecretString::from(password.into());
                true
            }
            None => false,
        }
    }

    /// Replace the hint of a paragraph. Returns `false` if not found.
    pub fn update_hint(&mut self, id: Uuid, hint: Option<String>) -> bool {
        match self.find_mut(id) {
            Some(paragraph) => {
                paragraph.hint = hint;
                true
            }
            None => false,
        }
    }

    pub fn paragraphs(&self) -> &[Paragraph] {
        &self.paragraphs
    }

    pub fn len(&self) -> usize {
        self.paragraphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }

    /// Seal the draft into an encrypted letter.
    pub async fn seal(self) -> Result<EncryptedLetter> {
        seal(self.title, self.paragraphs).await
    }

    /// Seal the draft with an explicit key derivation primitive.
    pub async fn seal_with(self, kdf: Arc<dyn KeyDerivation>) -> Result<EncryptedLetter> {
        seal_with(kdf, self.title, self.paragraphs).await
    }

    fn find_mut(&mut self, id: Uuid) -> Option<&mut Paragraph> {
        self.paragraphs.iter_mut().find(|paragraph| paragraph.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_add_and_remove_paragraphs() {
        let mut draft = LetterDraft::with_title("Note");
        let first = draft.add_paragraph("one", "a", None);
        let second = draft.add_paragraph("two", "b", Some("hint".into()));
        assert_eq!(draft.len(), 2);
        assert_ne!(first, second);

        assert!(draft.remove_paragraph(first));
        assert!(!draft.remove_paragraph(first));
        assert_eq!(draft.len(), 1);
        assert_eq!(draft.paragraphs()[0].id, second);
    }

    #[test]
    fn test_update_paragraph_fields() {
        let mut draft = LetterDraft::new();
        let id = draft.add_paragraph("draft text", "old", None);

        assert!(draft.update_message(id, "final text"));
        assert!(draft.update_password(id, "new"));
        assert!(draft.update_hint(id, Some("a fish".into())));

        let paragraph = &draft.paragraphs()[0];
        assert_eq!(paragraph.message, "final text");
        assert_eq!(paragraph.password.expose_secret(), "new");
        assert_eq!(paragraph.hint.as_deref(), Some("a fish"));

        assert!(!draft.update_message(Uuid::new_v4(), "nothing"));
    }

    #[test]
    fn test_order_preserved_after_removal() {
        let mut draft = LetterDraft::new();
        draft.add_paragraph("one", "a", None);
        let middle = draft.add_paragraph("two", "b", None);
        draft.add_paragraph("three", "c", None);
        draft.remove_paragraph(middle);

        let messages: Vec<_> = draft.paragraphs().iter().map(|p| p.message.as_str()).collect();
        assert_eq!(messages, vec!["one", "three"]);
    }

    #[tokio::test]
    async fn test_empty_draft_fails_to_seal() {
        let draft = LetterDraft::with_title("Empty");
        assert!(draft.is_empty());
        assert!(draft.seal().await.is_err());
    }
}
