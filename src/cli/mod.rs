//! CLI module
//!
//! Command handlers for the `wasmtx` binary and the parsers that turn
//! command line strings into messages.

pub mod commands;
pub mod parse;

pub use commands::*;
pub use parse::{ExecuteFlags, InstantiateFlags, StoreCodeFlags, TxFlags};

use crate::config::ConfigError;
use crate::tx::{BroadcastError, TxError};
use crate::types::MsgError;
use crate::wallet::KeyringError;
use std::io;
use thiserror::Error;

/// Any failure of a command
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Msg(#[from] MsgError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("Keyring error: {0}")]
    Keyring(#[from] KeyringError),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Tx(#[from] TxError),
    #[error("Broadcast error: {0}")]
    Broadcast(#[from] BroadcastError),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;
