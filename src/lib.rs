//! wasm-tx: transaction builder for a wasm smart-contract module
//!
//! This crate turns command line input into signed transactions featuring:
//! - Wasm / gzip payload detection and normalization
//! - Instantiate permission encoding
//! - Bech32 address, coin and code id parsing
//! - The six contract messages with their structural checks
//! - secp256k1 signing over a canonical JSON sign document
//! - A file backed keyring and transaction outbox
//!
//! # Example
//!
//! ```rust
//! use wasm_tx::crypto::KeyPair;
//! use wasm_tx::tx::TxBuilder;
//! use wasm_tx::types::{AccAddress, Msg, MsgClearAdmin, ADDR_LEN};
//!
//! let key_pair = KeyPair::generate();
//! let sender = key_pair.address("fetch").unwrap();
//! let contract = AccAddress::new("fetch", &[7u8; ADDR_LEN]).unwrap();
//!
//! let msg = MsgClearAdmin::new(sender, contract);
//! msg.validate_basic().unwrap();
//!
//! let tx = TxBuilder::new("fetchhub")
//!     .build_and_sign(vec![msg.into()], &key_pair)
//!     .unwrap();
//! println!("tx hash: {}", tx.hash().unwrap());
//! ```

pub mod cli;
pub mod config;
pub mod crypto;
pub mod tx;
pub mod types;
pub mod wallet;
pub mod wasm;

// Re-export commonly used types
pub use config::ClientConfig;
pub use crypto::KeyPair;
pub use tx::{Broadcaster, OutboxBroadcaster, StdTx, TxBuilder};
pub use types::{
    AccAddress, AccessConfig, Coin, Coins, Msg, MsgError, MsgStoreCode, WasmMsg,
};
pub use wallet::Keyring;
pub use wasm::{classify, normalize, PayloadKind};
