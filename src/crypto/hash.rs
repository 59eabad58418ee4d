//! Hashing utilities
//!
//! SHA-256 for sign documents, code checksums and transaction hashes,
//! RIPEMD160(SHA256) for account identifiers.

use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

/// Computes SHA-256 hash of the input data
pub fn sha256(data: &[u8]) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().to_vec()
}

/// Computes SHA-256 hash and returns it as a hex string
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(sha256(data))
}

/// RIPEMD160 of the SHA-256 of the input, the 20-byte account id
pub fn hash160(data: &[u8]) -> [u8; 20] {
    let mut ripemd = Ripemd160::new();
    ripemd.update(sha256(data));
    let mut id = [0u8; 20];
    id.copy_from_slice(&ripemd.finalize());
    id
}
