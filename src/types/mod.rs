//! Message types for the wasm module
//!
//! This module contains the typed building blocks of a transaction:
//! - Bech32 account addresses
//! - Coin amounts
//! - Instantiate permissions
//! - The six contract messages and their structural validators

pub mod access;
pub mod address;
pub mod coin;
pub mod error;
pub mod msg;
pub mod validation;

pub use access::AccessConfig;
pub use address::{AccAddress, AddressError, ADDR_LEN, DEFAULT_BECH32_PREFIX};
pub use coin::{parse_coins, Coin, CoinError, Coins};
pub use error::{ErrorKind, MsgError};
pub use msg::{
    Msg, MsgClearAdmin, MsgExecuteContract, MsgInstantiateContract, MsgMigrateContract,
    MsgStoreCode, MsgUpdateAdmin, WasmMsg, ROUTER_KEY,
};
pub use validation::{MAX_BUILD_TAG_SIZE, MAX_LABEL_SIZE, MAX_WASM_SIZE};
