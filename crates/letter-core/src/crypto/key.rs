//! Key derivation using PBKDF2-HMAC-SHA256.
//!
//! Sender and receiver each re-derive the paragraph key from the password and
//! the salt stored next to the ciphertext; the key itself is never transmitted.

use pbkdf2::pbkdf2_hmac;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Sha256;
use zeroize::ZeroizeOnDrop;

use crate::limits::{KEY_LEN, PBKDF2_ITERATIONS, SALT_LEN};

/// A cryptographic key derived from a password.
///
/// Key material is zeroized from memory when dropped. Keys are never cached:
/// each one lives for a single encrypt or decrypt call.
#[derive(ZeroizeOnDrop)]
pub struct DerivedKey {
    /// The raw key bytes (zeroized on drop)
    key: [u8; KEY_LEN],
}

impl DerivedKey {
    /// Create a new DerivedKey from raw bytes.
    ///
    /// # Security
    ///
    /// The caller is responsible for ensuring the bytes come from a secure source.
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self { key: bytes }
    }

    /// Get a reference to the raw key bytes.
    ///
    /// # Security
    ///
    /// Avoid storing or logging this value. Use only for immediate encryption operations.
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.key
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivedKey")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// A password-based key derivation primitive.
///
/// Sealing and the receiver controller go through this trait so the
/// primitive can be swapped or observed. Implementations must be
/// deterministic and must not memoize keys.
pub trait KeyDerivation: Send + Sync {
    /// Derive a 256-bit key from `password` and `salt`.
    fn derive_key(&self, password: &str, salt: &[u8; SALT_LEN]) -> DerivedKey;
}

/// PBKDF2-HMAC-SHA256 with [`PBKDF2_ITERATIONS`] rounds.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pbkdf2Sha256;

impl KeyDerivation for Pbkdf2Sha256 {
    fn derive_key(&self, password: &str, salt: &[u8; SALT_LEN]) -> DerivedKey {
        derive_key(password, salt)
    }
}

/// Derive an encryption key from a password using PBKDF2-HMAC-SHA256.
///
/// # Security
///
/// - Same password + salt always produces same key (deterministic)
/// - Different salt produces different key (salt travels with the paragraph)
/// - An empty password is accepted; it only yields a weak key
///
/// # Examples
///
/// ```
/// use letter_core::crypto::derive_key;
///
/// let salt = [7u8; 16];
/// let key = derive_key("my-password", &salt);
/// assert_eq!(key.as_bytes().len(), 32);
/// ```
pub fn derive_key(password: &str, salt: &[u8; SALT_LEN]) -> DerivedKey {
    let mut key_bytes = [0u8; KEY_LEN];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, PBKDF2_ITERATIONS, &mut key_bytes);
    DerivedKey::from_bytes(key_bytes)
}

/// Generate a fresh random salt from the OS CSPRNG.
pub fn generate_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);
    salt
}
