//! Transaction assembly, signing and hand-off
//!
//! Once a message has passed its structural checks it is wrapped in an
//! envelope, signed with the sender's key and given to a [`Broadcaster`].
//! With `--generate-only` the unsigned envelope is returned instead.

pub mod broadcast;
pub mod builder;

pub use broadcast::{BroadcastError, Broadcaster, OutboxBroadcaster, OutboxRecord, TxResponse};
pub use builder::{PubKey, StdFee, StdSignature, StdTx, TxBuilder, TxError, PUBKEY_TYPE};

use crate::types::WasmMsg;
use crate::wallet::Signer;

/// Result of handing messages off
#[derive(Debug)]
pub enum Outcome {
    /// Unsigned transaction for offline signing
    Generated(StdTx),
    /// Signed transaction accepted by the broadcaster
    Broadcast(TxResponse),
}

/// Either print-ready unsigned output or sign and broadcast
pub fn generate_or_broadcast(
    signer: &Signer,
    builder: &TxBuilder,
    msgs: Vec<WasmMsg>,
    generate_only: bool,
    broadcaster: &dyn Broadcaster,
) -> Result<Outcome, TxError> {
    if generate_only {
        return Ok(Outcome::Generated(builder.build_unsigned(msgs)?));
    }

    let key = match signer {
        Signer::Key(key) => key,
        Signer::Address(address) => return Err(TxError::MissingKey(address.to_string())),
    };

    let tx = builder.build_and_sign(msgs, key.key_pair())?;
    log::debug!(
        "signed transaction with {} message(s) for chain {}",
        tx.msg.len(),
        builder.chain_id()
    );
    Ok(Outcome::Broadcast(broadcaster.broadcast(&tx)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AccAddress, MsgClearAdmin, ADDR_LEN};
    use crate::wallet::Keyring;
    use std::cell::RefCell;

    /// Records what it was given
    struct Recorder {
        seen: RefCell<Vec<StdTx>>,
    }

    impl Broadcaster for Recorder {
        fn broadcast(&self, tx: &StdTx) -> Result<TxResponse, BroadcastError> {
            self.seen.borrow_mut().push(tx.clone());
            Ok(TxResponse {
                txhash: tx.hash()?,
                timestamp: chrono::Utc::now(),
            })
        }
    }

    struct Failing;

    impl Broadcaster for Failing {
        fn broadcast(&self, _tx: &StdTx) -> Result<TxResponse, BroadcastError> {
            Err(BroadcastError::Duplicate("ABC".into()))
        }
    }

    fn clear_admin(sender: AccAddress) -> WasmMsg {
        let contract = AccAddress::new("fetch", &[5u8; ADDR_LEN]).unwrap();
        MsgClearAdmin::new(sender, contract).into()
    }

    #[test]
    fn test_generate_only_with_bare_address() {
        let sender = AccAddress::new("fetch", &[1u8; ADDR_LEN]).unwrap();
        let signer = Signer::Address(sender.clone());
        let recorder = Recorder {
            seen: RefCell::new(Vec::new()),
        };

        let outcome = generate_or_broadcast(
            &signer,
            &TxBuilder::new("testing"),
            vec![clear_admin(sender.clone())],
            true,
            &recorder,
        )
        .unwrap();
        assert!(matches!(outcome, Outcome::Generated(tx) if !tx.is_signed()));
        assert!(recorder.seen.borrow().is_empty());

        let err = generate_or_broadcast(
            &signer,
            &TxBuilder::new("testing"),
            vec![clear_admin(sender)],
            false,
            &recorder,
        )
        .unwrap_err();
        assert!(matches!(err, TxError::MissingKey(_)));
    }

    #[test]
    fn test_sign_and_broadcast() {
        let temp_dir = tempfile::tempdir().unwrap();
        let keyring = Keyring::new(temp_dir.path()).unwrap();
        let key = keyring.add("alice").unwrap();
        let sender = key.address("fetch").unwrap();
        let recorder = Recorder {
            seen: RefCell::new(Vec::new()),
        };
        let builder = TxBuilder::new("testing").sequence(2);

        let outcome = generate_or_broadcast(
            &Signer::Key(key),
            &builder,
            vec![clear_admin(sender)],
            false,
            &recorder,
        )
        .unwrap();

        assert!(matches!(outcome, Outcome::Broadcast(_)));
        let seen = recorder.seen.borrow();
        assert_eq!(seen.len(), 1);
        assert!(builder.verify(&seen[0]).unwrap());
    }

    #[test]
    fn test_broadcast_error_passes_through() {
        let temp_dir = tempfile::tempdir().unwrap();
        let keyring = Keyring::new(temp_dir.path()).unwrap();
        let key = keyring.add("alice").unwrap();
        let sender = key.address("fetch").unwrap();

        let err = generate_or_broadcast(
            &Signer::Key(key),
            &TxBuilder::new("testing"),
            vec![clear_admin(sender)],
            false,
            &Failing,
        )
        .unwrap_err();
        assert!(matches!(err, TxError::Broadcast(BroadcastError::Duplicate(h)) if h == "ABC"));
    }
}
