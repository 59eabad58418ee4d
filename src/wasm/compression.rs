//! Contract payload compression
//!
//! Code is always uploaded gzip compressed:
//! - Raw wasm binaries are compressed with default settings
//! - Gzip payloads pass through untouched
//! - Anything else is rejected

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::{self, Read, Write};
use thiserror::Error;

// =============================================================================
// Constants
// =============================================================================

/// Magic header of a wasm module (`\0asm`)
pub const WASM_IDENT: [u8; 4] = [0x00, 0x61, 0x73, 0x6d];

/// Magic header of a gzip stream using deflate
pub const GZIP_IDENT: [u8; 3] = [0x1f, 0x8b, 0x08];

// =============================================================================
// Classification
// =============================================================================

/// Payload format detected from the leading bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    RawBinary,
    CompressedBinary,
    Unrecognized,
}

#[derive(Error, Debug)]
pub enum PayloadError {
    #[error("invalid input file: use wasm binary or gzip")]
    Unrecognized,
    #[error("compression failed: {0}")]
    Compress(#[source] io::Error),
    #[error("decompression failed: {0}")]
    Decompress(#[source] io::Error),
    #[error("uncompressed code exceeds {0} bytes")]
    TooLarge(usize),
}

pub fn is_wasm(input: &[u8]) -> bool {
    input.starts_with(&WASM_IDENT)
}

pub fn is_gzip(input: &[u8]) -> bool {
    input.starts_with(&GZIP_IDENT)
}

/// Inspect only the magic prefix of `input`
pub fn classify(input: &[u8]) -> PayloadKind {
    if is_wasm(input) {
        PayloadKind::RawBinary
    } else if is_gzip(input) {
        PayloadKind::CompressedBinary
    } else {
        PayloadKind::Unrecognized
    }
}

// =============================================================================
// Normalization
// =============================================================================

/// Gzip `input` with the default compression level
pub fn gzip_it(input: &[u8]) -> Result<Vec<u8>, PayloadError> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(input).map_err(PayloadError::Compress)?;
    encoder.finish().map_err(PayloadError::Compress)
}

/// Bring a payload into its on-wire form
pub fn normalize(payload: Vec<u8>) -> Result<Vec<u8>, PayloadError> {
    match classify(&payload) {
        PayloadKind::RawBinary => {
            let compressed = gzip_it(&payload)?;
            log::debug!(
                "compressed wasm binary from {} to {} bytes",
                payload.len(),
                compressed.len()
            );
            Ok(compressed)
        }
        PayloadKind::CompressedBinary => Ok(payload),
        PayloadKind::Unrecognized => Err(PayloadError::Unrecognized),
    }
}

/// Inflate a gzip payload, refusing output larger than `limit` bytes
pub fn uncompress(src: &[u8], limit: usize) -> Result<Vec<u8>, PayloadError> {
    if !is_gzip(src) {
        return Ok(src.to_vec());
    }

    let mut out = Vec::new();
    GzDecoder::new(src)
        .take(limit as u64 + 1)
        .read_to_end(&mut out)
        .map_err(PayloadError::Decompress)?;

    if out.len() > limit {
        return Err(PayloadError::TooLarge(limit));
    }
    Ok(out)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_wasm() -> Vec<u8> {
        let mut code = WASM_IDENT.to_vec();
        code.extend_from_slice(&[0x01, 0x00, 0x00, 0x00]);
        code.extend(std::iter::repeat(0x2a).take(4096));
        code
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify(&sample_wasm()), PayloadKind::RawBinary);
        assert_eq!(classify(&[0x1f, 0x8b, 0x08, 0x00]), PayloadKind::CompressedBinary);
        assert_eq!(classify(b"hello world"), PayloadKind::Unrecognized);
        assert_eq!(classify(&[]), PayloadKind::Unrecognized);
        // a truncated magic prefix is not enough
        assert_eq!(classify(&[0x00, 0x61, 0x73]), PayloadKind::Unrecognized);
        assert_eq!(classify(&[0x1f, 0x8b]), PayloadKind::Unrecognized);
    }

    #[test]
    fn test_normalize_raw_round_trip() {
        let raw = sample_wasm();
        let compressed = normalize(raw.clone()).unwrap();

        assert!(is_gzip(&compressed));
        assert!(compressed.len() < raw.len());
        assert_eq!(uncompress(&compressed, 1 << 20).unwrap(), raw);
    }

    #[test]
    fn test_normalize_gzip_passthrough() {
        let gz = gzip_it(&sample_wasm()).unwrap();
        assert_eq!(normalize(gz.clone()).unwrap(), gz);
    }

    #[test]
    fn test_normalize_rejects_unknown() {
        let err = normalize(b"#!/bin/sh\necho hi".to_vec()).unwrap_err();
        assert!(matches!(err, PayloadError::Unrecognized));
        assert!(err.to_string().contains("wasm binary or gzip"));
    }

    #[test]
    fn test_uncompress_limit() {
        let gz = gzip_it(&sample_wasm()).unwrap();
        let err = uncompress(&gz, 100).unwrap_err();
        assert!(matches!(err, PayloadError::TooLarge(100)));
    }
}
