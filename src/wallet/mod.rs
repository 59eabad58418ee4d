//! Wallet module for key storage and sender identity

pub mod keyring;

pub use keyring::{Key, KeyInfo, Keyring, KeyringError, Signer};
