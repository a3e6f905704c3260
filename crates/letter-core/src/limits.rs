//! Size limits and wire constants.
//!
//! Tokens arrive from untrusted links, so every dimension of a decoded
//! letter is bounded here and enforced both when sealing and when decoding.

// === Cryptography ===

/// Salt length in bytes (one per paragraph).
pub const SALT_LEN: usize = 16;

/// AES-GCM nonce length in bytes (96 bits).
pub const NONCE_LEN: usize = 12;

/// Derived key length in bytes (256 bits).
pub const KEY_LEN: usize = 32;

/// Authentication tag appended to every ciphertext.
pub const TAG_LEN: usize = 16;

/// PBKDF2-HMAC-SHA256 iteration count.
///
/// Fixed at compile time so every letter produced by this version can be
/// opened by every other build of it.
pub const PBKDF2_ITERATIONS: u32 = 100_000;

// === Letters ===

/// Maximum paragraphs per letter.
pub const MAX_PARAGRAPHS: usize = 256;

/// Maximum title length in characters.
pub const MAX_TITLE_CHARS: usize = 512;

/// Maximum hint length in characters.
pub const MAX_HINT_CHARS: usize = 512;

/// Maximum plaintext size of a single paragraph in bytes (64 KiB).
pub const MAX_MESSAGE_BYTES: usize = 64 * 1024;

/// Maximum ciphertext size of a single paragraph, tag included.
pub const MAX_CIPHERTEXT_BYTES: usize = MAX_MESSAGE_BYTES + TAG_LEN;

/// Maximum plaintext size of a whole letter in bytes (1 MiB).
///
/// Keeps the canonical form of any sealable letter well under
/// [`MAX_DECOMPRESSED_BYTES`] after Base64 and per-paragraph overhead.
pub const MAX_LETTER_BYTES: usize = 1024 * 1024;

// === Transport ===

/// Query parameter that carries the token on a receiver URL.
pub const TOKEN_QUERY_PARAM: &str = "d";

/// Token length above which some user agents start truncating URLs.
pub const TOKEN_WARN_LENGTH: usize = 8000;

/// Maximum accepted token length in characters (6 MiB).
///
/// Covers any token whose inflated form fits [`MAX_DECOMPRESSED_BYTES`]:
/// DEFLATE adds a few bytes per stored block and Base64 adds a third.
pub const MAX_TOKEN_CHARS: usize = 6 * 1024 * 1024;

/// Maximum size of the inflated canonical form (4 MiB).
pub const MAX_DECOMPRESSED_BYTES: usize = 4 * 1024 * 1024;
