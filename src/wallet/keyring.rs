//! File backed keyring
//!
//! Stores named secp256k1 keys as JSON files and resolves the `--from`
//! identity of a transaction.

use crate::crypto::{KeyError, KeyPair};
use crate::types::{AccAddress, AddressError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Keyring-related errors
#[derive(Error, Debug)]
pub enum KeyringError {
    #[error("Key not found: {0}")]
    NotFound(String),
    #[error("Key already exists: {0}")]
    AlreadyExists(String),
    #[error("Invalid key name: {0}")]
    InvalidName(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
    #[error("Crypto error: {0}")]
    CryptoError(#[from] KeyError),
    #[error("Address error: {0}")]
    AddressError(#[from] AddressError),
}

/// Serializable key data for persistence
#[derive(Debug, Serialize, Deserialize)]
struct KeyData {
    name: String,
    private_key_hex: String,
}

/// A named signing key
#[derive(Clone)]
pub struct Key {
    pub name: String,
    key_pair: KeyPair,
}

impl Key {
    pub fn key_pair(&self) -> &KeyPair {
        &self.key_pair
    }

    pub fn address(&self, prefix: &str) -> Result<AccAddress, KeyringError> {
        Ok(self.key_pair.address(prefix)?)
    }

    /// Public key information (safe to share)
    pub fn info(&self, prefix: &str) -> Result<KeyInfo, KeyringError> {
        Ok(KeyInfo {
            name: self.name.clone(),
            address: self.address(prefix)?.to_string(),
            public_key: self.key_pair.public_key_hex(),
        })
    }
}

/// Public key information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyInfo {
    pub name: String,
    pub address: String,
    pub public_key: String,
}

/// Sender identity resolved from `--from`
pub enum Signer {
    /// A key held in the keyring; can sign
    Key(Key),
    /// A bare address; only usable for unsigned output
    Address(AccAddress),
}

impl Signer {
    pub fn address(&self, prefix: &str) -> Result<AccAddress, KeyringError> {
        match self {
            Signer::Key(key) => key.address(prefix),
            Signer::Address(address) => Ok(address.clone()),
        }
    }

    pub fn key(&self) -> Option<&Key> {
        match self {
            Signer::Key(key) => Some(key),
            Signer::Address(_) => None,
        }
    }
}

/// Keyring manager storing one JSON file per key
pub struct Keyring {
    keys_dir: PathBuf,
}

impl Keyring {
    /// Open (and create if needed) the keyring directory
    pub fn new(keys_dir: &Path) -> Result<Self, KeyringError> {
        fs::create_dir_all(keys_dir)?;
        Ok(Self {
            keys_dir: keys_dir.to_path_buf(),
        })
    }

    fn key_path(&self, name: &str) -> PathBuf {
        self.keys_dir.join(format!("{}.json", name))
    }

    /// Generate and store a new key
    pub fn add(&self, name: &str) -> Result<Key, KeyringError> {
        self.store(name, KeyPair::generate())
    }

    /// Store an existing hex-encoded private key under `name`
    pub fn import(&self, name: &str, private_key_hex: &str) -> Result<Key, KeyringError> {
        self.store(name, KeyPair::from_private_key_hex(private_key_hex)?)
    }

    fn store(&self, name: &str, key_pair: KeyPair) -> Result<Key, KeyringError> {
        validate_name(name)?;
        let path = self.key_path(name);
        if path.exists() {
            return Err(KeyringError::AlreadyExists(name.to_string()));
        }

        let data = KeyData {
            name: name.to_string(),
            private_key_hex: key_pair.private_key_hex(),
        };
        fs::write(&path, serde_json::to_string_pretty(&data)?)?;
        log::info!("stored key {} in {:?}", name, path);

        Ok(Key {
            name: name.to_string(),
            key_pair,
        })
    }

    /// Load a key by name
    pub fn get(&self, name: &str) -> Result<Key, KeyringError> {
        validate_name(name)?;
        let path = self.key_path(name);
        if !path.exists() {
            return Err(KeyringError::NotFound(name.to_string()));
        }

        let json = fs::read_to_string(&path)?;
        let data: KeyData = serde_json::from_str(&json)?;
        Ok(Key {
            name: data.name,
            key_pair: KeyPair::from_private_key_hex(&data.private_key_hex)?,
        })
    }

    /// Names of all stored keys, sorted
    pub fn list(&self) -> Result<Vec<String>, KeyringError> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.keys_dir)? {
            let path = entry?.path();
            if path.extension().map(|e| e == "json").unwrap_or(false) {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    names.push(stem.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    /// Resolve `--from`: a stored key name, or a bech32 address of the chain
    pub fn resolve(&self, from: &str, prefix: &str) -> Result<Signer, KeyringError> {
        if validate_name(from).is_ok() && self.key_path(from).exists() {
            return Ok(Signer::Key(self.get(from)?));
        }
        match AccAddress::from_bech32(from, prefix) {
            Ok(address) => Ok(Signer::Address(address)),
            Err(_) => Err(KeyringError::NotFound(from.to_string())),
        }
    }
}

fn validate_name(name: &str) -> Result<(), KeyringError> {
    let ok = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if ok {
        Ok(())
    } else {
        Err(KeyringError::InvalidName(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_get() {
        let temp_dir = tempfile::tempdir().unwrap();
        let keyring = Keyring::new(temp_dir.path()).unwrap();

        let key = keyring.add("alice").unwrap();
        let loaded = keyring.get("alice").unwrap();
        assert_eq!(
            key.address("fetch").unwrap(),
            loaded.address("fetch").unwrap()
        );
        assert!(matches!(
            keyring.add("alice"),
            Err(KeyringError::AlreadyExists(_))
        ));
    }

    #[test]
    fn test_import_and_list() {
        let temp_dir = tempfile::tempdir().unwrap();
        let keyring = Keyring::new(temp_dir.path()).unwrap();

        let kp = KeyPair::generate();
        keyring.import("bob", &kp.private_key_hex()).unwrap();
        keyring.add("alice").unwrap();

        assert_eq!(keyring.list().unwrap(), vec!["alice", "bob"]);
        let info = keyring.get("bob").unwrap().info("fetch").unwrap();
        assert_eq!(info.public_key, kp.public_key_hex());
    }

    #[test]
    fn test_resolve() {
        let temp_dir = tempfile::tempdir().unwrap();
        let keyring = Keyring::new(temp_dir.path()).unwrap();
        let key = keyring.add("alice").unwrap();

        assert!(keyring.resolve("alice", "fetch").unwrap().key().is_some());

        let addr = key.address("fetch").unwrap();
        let signer = keyring.resolve(addr.as_str(), "fetch").unwrap();
        assert!(signer.key().is_none());
        assert_eq!(signer.address("fetch").unwrap(), addr);

        assert!(matches!(
            keyring.resolve("carol", "fetch"),
            Err(KeyringError::NotFound(_))
        ));
    }

    #[test]
    fn test_invalid_names() {
        let temp_dir = tempfile::tempdir().unwrap();
        let keyring = Keyring::new(temp_dir.path()).unwrap();
        assert!(matches!(
            keyring.add("../escape"),
            Err(KeyringError::InvalidName(_))
        ));
        assert!(keyring.get("").is_err());
    }
}
