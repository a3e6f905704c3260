//! DEFLATE compression of the canonical letter form.
//!
//! The canonical JSON is mostly Base64 with repeated field names, which
//! DEFLATE shrinks enough to keep typical links short.

use std::io::Read;

use flate2::read::{DeflateDecoder, DeflateEncoder};
use flate2::Compression;

use crate::error::{LetterError, Result};

/// Compress bytes with raw DEFLATE at the best compression level.
pub fn compress(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = DeflateEncoder::new(data, Compression::best());
    let mut compressed = Vec::new();
    encoder
        .read_to_end(&mut compressed)
        .map_err(|e| LetterError::Decode(format!("Compression failed: {}", e)))?;
    Ok(compressed)
}

/// Inflate raw DEFLATE data, refusing to produce more than `limit` bytes.
///
/// # Errors
///
/// Returns `LetterError::Decode` if the stream is malformed, inflates to
/// nothing, or exceeds `limit`.
pub fn decompress(data: &[u8], limit: usize) -> Result<Vec<u8>> {
    let decoder = DeflateDecoder::new(data);
    let mut decompressed = Vec::new();

    decoder
        .take(limit as u64 + 1)
        .read_to_end(&mut decompressed)
        .map_err(|e| LetterError::Decode(format!("Decompression failed: {}", e)))?;

    if decompressed.is_empty() {
        return Err(LetterError::Decode(
            "Decompression produced no output".to_string(),
        ));
    }
    if decompressed.len() > limit {
        return Err(LetterError::Decode(format!(
            "Decompressed letter exceeds {} bytes",
            limit
        )));
    }

    Ok(decompressed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compress_decompress_round_trip() {
        let data = b"{\"title\":\"Note\",\"paragraphs\":[{\"hint\":\"time\"},{\"hint\":\"time\"}]}";
        let compressed = compress(data).unwrap();
        let decompressed = decompress(&compressed, 1024).unwrap();
        assert_eq!(decompressed, data);
    }

    #[test]
    fn test_repetitive_data_shrinks() {
        let data = "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA".repeat(20).into_bytes();
        let compressed = compress(&data).unwrap();
        assert!(compressed.len() < data.len());
    }

    #[test]
    fn test_empty_output_rejected() {
        let compressed = compress(b"").unwrap();
        let result = decompress(&compressed, 1024);
        assert!(matches!(result, Err(LetterError::Decode(_))));
    }

    #[test]
    fn test_garbage_rejected() {
        let result = decompress(&[0xFF, 0xFF, 0xFF, 0xFF, 0x00, 0x12], 1024);
        assert!(matches!(result, Err(LetterError::Decode(_))));
    }

    #[test]
    fn test_inflation_limit_enforced() {
        let data = vec![b'x'; 10_000];
        let compressed = compress(&data).unwrap();
        let result = decompress(&compressed, 1_000);
        assert!(result.unwrap_err().to_string().contains("exceeds"));
    }
}
