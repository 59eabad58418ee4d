//! Cryptographic utilities
//!
//! This module provides:
//! - SHA-256 and RIPEMD160 hashing
//! - ECDSA key management (secp256k1)

pub mod hash;
pub mod keys;

pub use hash::{hash160, sha256, sha256_hex};
pub use keys::{public_key_from_bytes, sign_message, verify_signature, KeyError, KeyPair};
