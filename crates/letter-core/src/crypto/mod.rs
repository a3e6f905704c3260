//! Cryptographic operations for sealed letters.
//!
//! This module provides key derivation and authenticated encryption using
//! well-audited RustCrypto implementations:
//! - **PBKDF2-HMAC-SHA256**: password-based key derivation, 100 000 rounds
//! - **AES-256-GCM**: authenticated encryption, 96-bit random nonces
//!
//! ## Security Model
//!
//! - One random salt and one random nonce per paragraph per sealing
//! - Keys are derived on demand, never cached, zeroized on drop
//! - Wrong password and corrupted data fail identically
//!
//! ## Threat Model
//!
//! We defend against:
//! - Interception of the link carrying the token
//! - Offline guessing of one paragraph's password revealing another paragraph
//!
//! We do NOT defend against:
//! - Weak passwords
//! - Compromised sender or receiver devices

pub mod cipher;
pub mod key;

pub use key::{derive_key, generate_salt, DerivedKey, KeyDerivation, Pbkdf2Sha256};
