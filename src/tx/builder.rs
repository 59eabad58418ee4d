//! Transaction envelope and signing
//!
//! Messages are wrapped in a `StdTx` together with the fee and memo. The
//! signature covers a canonical JSON sign document which also commits to
//! the chain id, account number and sequence (replay protection).

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::crypto::{public_key_from_bytes, sha256_hex, verify_signature, KeyError, KeyPair};
use crate::types::{Coins, Msg, MsgError, WasmMsg};

use super::broadcast::BroadcastError;

/// Amino type name of a secp256k1 public key
pub const PUBKEY_TYPE: &str = "tendermint/PubKeySecp256k1";

// =============================================================================
// Error Types
// =============================================================================

#[derive(Error, Debug)]
pub enum TxError {
    #[error("transaction has no messages")]
    NoMessages,
    #[error(transparent)]
    Validation(#[from] MsgError),
    #[error("signing requires a key from the keyring, got bare address {0}")]
    MissingKey(String),
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
    #[error("Crypto error: {0}")]
    CryptoError(#[from] KeyError),
    #[error("Invalid signature")]
    InvalidSignature,
    #[error(transparent)]
    Broadcast(#[from] BroadcastError),
}

// =============================================================================
// Envelope
// =============================================================================

/// Fee paid for a transaction
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StdFee {
    pub amount: Coins,
    pub gas: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PubKey {
    #[serde(rename = "type")]
    pub key_type: String,
    /// Base64 of the compressed public key
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StdSignature {
    pub pub_key: PubKey,
    /// Base64 of the 64-byte compact signature
    pub signature: String,
}

/// A transaction ready for broadcasting (or for offline signing when unsigned)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StdTx {
    pub msg: Vec<WasmMsg>,
    pub fee: StdFee,
    pub signatures: Vec<StdSignature>,
    pub memo: String,
}

impl StdTx {
    /// Uppercase hex SHA-256 of the JSON encoding
    pub fn hash(&self) -> Result<String, serde_json::Error> {
        let bytes = serde_json::to_vec(self)?;
        Ok(sha256_hex(&bytes).to_uppercase())
    }

    pub fn is_signed(&self) -> bool {
        !self.signatures.is_empty()
    }
}

/// Document covered by the signature. Fields are declared in
/// alphabetical order so the JSON encoding is canonical.
#[derive(Serialize)]
struct StdSignDoc<'a> {
    account_number: String,
    chain_id: &'a str,
    fee: &'a StdFee,
    memo: &'a str,
    msgs: &'a [WasmMsg],
    sequence: String,
}

// =============================================================================
// Transaction Builder
// =============================================================================

/// Builder for transaction envelopes
#[derive(Debug, Clone)]
pub struct TxBuilder {
    chain_id: String,
    account_number: u64,
    sequence: u64,
    gas: u64,
    fees: Coins,
    memo: String,
}

impl TxBuilder {
    pub fn new(chain_id: &str) -> Self {
        Self {
            chain_id: chain_id.to_string(),
            account_number: 0,
            sequence: 0,
            gas: crate::config::DEFAULT_GAS,
            fees: Coins::empty(),
            memo: String::new(),
        }
    }

    pub fn account_number(mut self, account_number: u64) -> Self {
        self.account_number = account_number;
        self
    }

    pub fn sequence(mut self, sequence: u64) -> Self {
        self.sequence = sequence;
        self
    }

    pub fn gas(mut self, gas: u64) -> Self {
        self.gas = gas;
        self
    }

    pub fn fees(mut self, fees: Coins) -> Self {
        self.fees = fees;
        self
    }

    pub fn memo(mut self, memo: &str) -> Self {
        self.memo = memo.to_string();
        self
    }

    pub fn chain_id(&self) -> &str {
        &self.chain_id
    }

    fn fee(&self) -> StdFee {
        StdFee {
            amount: self.fees.clone(),
            gas: self.gas,
        }
    }

    /// Canonical bytes that get signed for `msgs`
    pub fn sign_bytes(&self, msgs: &[WasmMsg]) -> Result<Vec<u8>, TxError> {
        let fee = self.fee();
        let doc = StdSignDoc {
            account_number: self.account_number.to_string(),
            chain_id: &self.chain_id,
            fee: &fee,
            memo: &self.memo,
            msgs,
            sequence: self.sequence.to_string(),
        };
        Ok(serde_json::to_vec(&doc)?)
    }

    /// Build without signing, re-running every message's structural checks
    pub fn build_unsigned(&self, msgs: Vec<WasmMsg>) -> Result<StdTx, TxError> {
        if msgs.is_empty() {
            return Err(TxError::NoMessages);
        }
        for msg in &msgs {
            msg.validate_basic()?;
        }

        Ok(StdTx {
            msg: msgs,
            fee: self.fee(),
            signatures: Vec::new(),
            memo: self.memo.clone(),
        })
    }

    /// Build and sign with a single key
    pub fn build_and_sign(&self, msgs: Vec<WasmMsg>, key_pair: &KeyPair) -> Result<StdTx, TxError> {
        let mut tx = self.build_unsigned(msgs)?;
        let sign_bytes = self.sign_bytes(&tx.msg)?;
        let signature = key_pair.sign(&sign_bytes)?;

        tx.signatures.push(StdSignature {
            pub_key: PubKey {
                key_type: PUBKEY_TYPE.to_string(),
                value: STANDARD.encode(key_pair.public_key.serialize()),
            },
            signature: STANDARD.encode(signature),
        });
        Ok(tx)
    }

    /// Check every signature of `tx` against the sign document of this builder
    pub fn verify(&self, tx: &StdTx) -> Result<bool, TxError> {
        if !tx.is_signed() {
            return Ok(false);
        }
        let sign_bytes = self.sign_bytes(&tx.msg)?;

        for sig in &tx.signatures {
            let key_bytes = STANDARD
                .decode(&sig.pub_key.value)
                .map_err(|_| TxError::InvalidSignature)?;
            let public_key =
                public_key_from_bytes(&key_bytes).map_err(|_| TxError::InvalidSignature)?;
            let signature = STANDARD
                .decode(&sig.signature)
                .map_err(|_| TxError::InvalidSignature)?;

            if !verify_signature(&public_key, &sign_bytes, &signature)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

// =============================================================================
// Tests
// =============================================================================
