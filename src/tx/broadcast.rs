//! Broadcasting collaborators
//!
//! Network delivery is outside this crate. A [`Broadcaster`] receives the
//! finished transaction; the bundled [`OutboxBroadcaster`] drops it into a
//! directory from which a relayer or `curl` can submit it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::builder::StdTx;

#[derive(Error, Debug)]
pub enum BroadcastError {
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
    #[error("transaction {0} is already queued")]
    Duplicate(String),
    #[error("refusing to broadcast an unsigned transaction")]
    Unsigned,
}

/// Receipt returned for an accepted transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxResponse {
    pub txhash: String,
    pub timestamp: DateTime<Utc>,
}

/// Destination of signed transactions
pub trait Broadcaster {
    fn broadcast(&self, tx: &StdTx) -> Result<TxResponse, BroadcastError>;
}

/// Stored outbox entry
#[derive(Debug, Serialize, Deserialize)]
pub struct OutboxRecord {
    pub txhash: String,
    pub created_at: DateTime<Utc>,
    pub tx: StdTx,
}

/// Writes each transaction to `<dir>/<txhash>.json`
pub struct OutboxBroadcaster {
    dir: PathBuf,
}

impl OutboxBroadcaster {
    pub fn new(dir: &Path) -> Result<Self, BroadcastError> {
        fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    pub fn record_path(&self, txhash: &str) -> PathBuf {
        self.dir.join(format!("{}.json", txhash))
    }

    pub fn load(&self, txhash: &str) -> Result<OutboxRecord, BroadcastError> {
        let json = fs::read_to_string(self.record_path(txhash))?;
        Ok(serde_json::from_str(&json)?)
    }
}

impl Broadcaster for OutboxBroadcaster {
    fn broadcast(&self, tx: &StdTx) -> Result<TxResponse, BroadcastError> {
        if !tx.is_signed() {
            return Err(BroadcastError::Unsigned);
        }

        let txhash = tx.hash()?;
        let path = self.record_path(&txhash);
        if path.exists() {
            return Err(BroadcastError::Duplicate(txhash));
        }

        let record = OutboxRecord {
            txhash: txhash.clone(),
            created_at: Utc::now(),
            tx: tx.clone(),
        };
        fs::write(&path, serde_json::to_string_pretty(&record)?)?;
        log::info!("queued transaction {} at {:?}", txhash, path);

        Ok(TxResponse {
            txhash,
            timestamp: record.created_at,
        })
    }
}
