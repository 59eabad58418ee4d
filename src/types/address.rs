//! Bech32 account addresses
//!
//! An account address is the 20-byte RIPEMD160(SHA256(pubkey)) identifier
//! shown to users as a bech32 string with a chain specific prefix.

use bech32::{FromBase32, ToBase32, Variant};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use thiserror::Error;

/// Length of an account identifier in bytes
pub const ADDR_LEN: usize = 20;

/// Human readable prefix used when none is configured
pub const DEFAULT_BECH32_PREFIX: &str = "fetch";

/// Address decoding errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("empty address string is not allowed")]
    Empty,
    #[error("decoding bech32 failed: {0}")]
    Bech32(#[from] bech32::Error),
    #[error("bech32m encoding is not accepted")]
    WrongVariant,
    #[error("invalid bech32 prefix: expected {expected}, got {found}")]
    WrongPrefix { expected: String, found: String },
    #[error("incorrect address length: expected {ADDR_LEN} bytes, got {0}")]
    InvalidLength(usize),
}

/// A decoded account address
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct AccAddress {
    prefix: String,
    bytes: Vec<u8>,
    encoded: String,
}

impl AccAddress {
    /// Build an address from raw identifier bytes
    pub fn new(prefix: &str, bytes: &[u8]) -> Result<Self, AddressError> {
        if bytes.len() != ADDR_LEN {
            return Err(AddressError::InvalidLength(bytes.len()));
        }
        let encoded = bech32::encode(prefix, bytes.to_base32(), Variant::Bech32)?;
        Ok(Self {
            prefix: prefix.to_string(),
            bytes: bytes.to_vec(),
            encoded,
        })
    }

    /// Decode a bech32 address, requiring the given prefix and a 20-byte payload
    pub fn from_bech32(address: &str, expected_prefix: &str) -> Result<Self, AddressError> {
        let addr = Self::decode(address)?;
        if addr.prefix != expected_prefix {
            return Err(AddressError::WrongPrefix {
                expected: expected_prefix.to_string(),
                found: addr.prefix,
            });
        }
        addr.verify_format()?;
        Ok(addr)
    }

    /// Decode any well-formed bech32 string without checking prefix or length.
    ///
    /// Used when reading messages back from JSON, where `verify_format`
    /// decides whether the payload is acceptable.
    pub fn decode(address: &str) -> Result<Self, AddressError> {
        let address = address.trim();
        if address.is_empty() {
            return Err(AddressError::Empty);
        }

        let (prefix, data, variant) = bech32::decode(address)?;
        if variant != Variant::Bech32 {
            return Err(AddressError::WrongVariant);
        }
        let bytes = Vec::<u8>::from_base32(&data)?;

        Ok(Self {
            prefix,
            bytes,
            encoded: address.to_lowercase(),
        })
    }

    /// Check the identifier has the fixed account length
    pub fn verify_format(&self) -> Result<(), AddressError> {
        if self.bytes.len() != ADDR_LEN {
            return Err(AddressError::InvalidLength(self.bytes.len()));
        }
        Ok(())
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn as_str(&self) -> &str {
        &self.encoded
    }
}

impl fmt::Display for AccAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encoded)
    }
}

impl fmt::Debug for AccAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccAddress({})", self.encoded)
    }
}

impl Serialize for AccAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.encoded)
    }
}

impl<'de> Deserialize<'de> for AccAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        AccAddress::decode(&s).map_err(serde::de::Error::custom)
    }
}
