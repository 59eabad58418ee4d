//! CLI commands for wasm transactions
//!
//! Implements all command handlers for the CLI interface.

use super::parse::{self, ExecuteFlags, InstantiateFlags, StoreCodeFlags, TxFlags};
use super::CliResult;
use crate::config::ClientConfig;
use crate::crypto::sha256_hex;
use crate::tx::{generate_or_broadcast, OutboxBroadcaster, Outcome};
use crate::types::{AccAddress, Msg, WasmMsg, MAX_WASM_SIZE};
use crate::wallet::{Keyring, Signer};
use crate::wasm;
use std::fs;
use std::path::{Path, PathBuf};

/// Directory of the keyring inside the home directory
pub const KEYS_DIR: &str = "keys";

/// Directory of queued transactions inside the home directory
pub const OUTBOX_DIR: &str = "outbox";

/// Application state
pub struct AppState {
    pub config: ClientConfig,
    pub keyring: Keyring,
    pub home: PathBuf,
}

impl AppState {
    /// Load the configuration and open the keyring under `home`
    pub fn new(home: PathBuf) -> CliResult<Self> {
        let config = ClientConfig::load(&home)?;
        let keyring = Keyring::new(&home.join(KEYS_DIR))?;
        Ok(Self {
            config,
            keyring,
            home,
        })
    }

    fn prefix(&self) -> &str {
        &self.config.bech32_prefix
    }

    /// Resolve `--from` into a signer and its address
    fn sender(&self, tx: &TxFlags) -> CliResult<(Signer, AccAddress)> {
        let signer = self.keyring.resolve(&tx.from, self.prefix())?;
        let address = signer.address(self.prefix())?;
        Ok((signer, address))
    }

    /// Validate, wrap, then print or queue a single message
    fn submit(&self, signer: &Signer, msg: WasmMsg, tx: &TxFlags) -> CliResult<()> {
        msg.validate_basic()?;
        log::debug!("built {} message", msg.msg_type());

        let builder = tx.tx_builder(&self.config)?;
        let outbox = OutboxBroadcaster::new(&self.home.join(OUTBOX_DIR))?;

        match generate_or_broadcast(signer, &builder, vec![msg], tx.generate_only, &outbox)? {
            Outcome::Generated(std_tx) => {
                println!("{}", serde_json::to_string_pretty(&std_tx)?);
            }
            Outcome::Broadcast(response) => {
                println!("✅ Transaction signed and queued!");
                println!("   🔗 Chain: {}", builder.chain_id());
                println!("   🔑 Hash: {}", response.txhash);
                println!("   📁 File: {:?}", outbox.record_path(&response.txhash));
            }
        }
        Ok(())
    }
}

// =============================================================================
// Keys
// =============================================================================

/// Generate a new key
pub fn cmd_keys_add(state: &AppState, name: &str) -> CliResult<()> {
    let key = state.keyring.add(name)?;
    let info = key.info(state.prefix())?;

    println!("✅ Key created!");
    println!("   🏷️  Name: {}", info.name);
    println!("   📍 Address: {}", info.address);
    println!("   🔑 Public Key: {}", info.public_key);
    println!("   ⚠️  The private key is stored unencrypted in {:?}", state.home.join(KEYS_DIR));

    Ok(())
}

/// Import a hex encoded private key
pub fn cmd_keys_import(state: &AppState, name: &str, private_key_hex: &str) -> CliResult<()> {
    let key = state.keyring.import(name, private_key_hex)?;
    let info = key.info(state.prefix())?;

    println!("✅ Key imported!");
    println!("   🏷️  Name: {}", info.name);
    println!("   📍 Address: {}", info.address);

    Ok(())
}

/// List all keys
pub fn cmd_keys_list(state: &AppState) -> CliResult<()> {
    let names = state.keyring.list()?;

    if names.is_empty() {
        println!("📭 No keys found. Create one with: wasmtx keys add <name>");
        return Ok(());
    }

    println!("🔐 Keys ({}):", names.len());
    for name in names {
        let info = state.keyring.get(&name)?.info(state.prefix())?;
        println!("   {} {}", info.name, info.address);
    }

    Ok(())
}

/// Show one key
pub fn cmd_keys_show(state: &AppState, name: &str) -> CliResult<()> {
    let info = state.keyring.get(name)?.info(state.prefix())?;

    println!("🔐 Key: {}", info.name);
    println!("   ├─ Address: {}", info.address);
    println!("   └─ Public Key: {}", info.public_key);

    Ok(())
}

// =============================================================================
// Config
// =============================================================================

/// Print the effective configuration
pub fn cmd_config_show(state: &AppState) -> CliResult<()> {
    println!("⚙️  Configuration ({:?})", ClientConfig::path(&state.home));
    println!("   ├─ Chain ID: {}", state.config.chain_id);
    println!("   ├─ Bech32 prefix: {}", state.config.bech32_prefix);
    println!("   ├─ Gas: {}", state.config.gas);
    let fees = if state.config.fees.is_empty() {
        "none"
    } else {
        &state.config.fees
    };
    println!("   └─ Fees: {}", fees);

    Ok(())
}

/// Write a configuration file, keeping stored values not overridden
pub fn cmd_config_init(
    home: &Path,
    chain_id: Option<&str>,
    prefix: Option<&str>,
) -> CliResult<()> {
    let mut config = ClientConfig::load(home)?;
    if let Some(chain_id) = chain_id {
        config.chain_id = chain_id.to_string();
    }
    if let Some(prefix) = prefix {
        config.bech32_prefix = prefix.to_string();
    }
    config.save(home)?;

    println!("✅ Configuration written!");
    println!("   📁 File: {:?}", ClientConfig::path(home));
    println!("   🔗 Chain ID: {}", config.chain_id);
    println!("   🏷️  Prefix: {}", config.bech32_prefix);

    Ok(())
}

// =============================================================================
// Wasm Transactions
// =============================================================================

/// Upload contract code from a wasm or gzip file
pub fn cmd_tx_store(
    state: &AppState,
    file: &Path,
    flags: &StoreCodeFlags,
    tx: &TxFlags,
) -> CliResult<()> {
    let (signer, sender) = state.sender(tx)?;
    let wasm_bytes = fs::read(file)?;

    let msg = parse::store_code_msg(sender, wasm_bytes, flags, state.prefix())?;
    let checksum = match wasm::uncompress(&msg.wasm_byte_code, MAX_WASM_SIZE) {
        Ok(raw) => Some(sha256_hex(&raw)),
        Err(e) => {
            log::warn!("cannot compute code checksum: {}", e);
            None
        }
    };
    if let Some(checksum) = &checksum {
        log::info!("code checksum {}", checksum);
    }

    state.submit(&signer, msg.into(), tx)?;
    if let (Some(checksum), false) = (checksum, tx.generate_only) {
        println!("   🧮 Code checksum: {}", checksum);
    }

    Ok(())
}

/// Create a contract instance from stored code
pub fn cmd_tx_instantiate(
    state: &AppState,
    code_id: &str,
    init_msg: &str,
    flags: &InstantiateFlags,
    tx: &TxFlags,
) -> CliResult<()> {
    let (signer, sender) = state.sender(tx)?;
    let msg = parse::instantiate_msg(sender, code_id, init_msg, flags, state.prefix())?;
    state.submit(&signer, msg.into(), tx)
}

/// Call a contract
pub fn cmd_tx_execute(
    state: &AppState,
    contract: &str,
    exec_msg: &str,
    flags: &ExecuteFlags,
    tx: &TxFlags,
) -> CliResult<()> {
    let (signer, sender) = state.sender(tx)?;
    let msg = parse::execute_msg(sender, contract, exec_msg, flags, state.prefix())?;
    state.submit(&signer, msg.into(), tx)
}

/// Move a contract to new code
pub fn cmd_tx_migrate(
    state: &AppState,
    contract: &str,
    code_id: &str,
    migrate_msg: &str,
    tx: &TxFlags,
) -> CliResult<()> {
    let (signer, sender) = state.sender(tx)?;
    let msg = parse::migrate_msg(sender, contract, code_id, migrate_msg, state.prefix())?;
    state.submit(&signer, msg.into(), tx)
}

/// Hand the admin role to another account
pub fn cmd_tx_update_admin(
    state: &AppState,
    contract: &str,
    new_admin: &str,
    tx: &TxFlags,
) -> CliResult<()> {
    let (signer, sender) = state.sender(tx)?;
    let msg = parse::update_admin_msg(sender, contract, new_admin, state.prefix())?;
    state.submit(&signer, msg.into(), tx)
}

/// Remove the admin of a contract
pub fn cmd_tx_clear_admin(state: &AppState, contract: &str, tx: &TxFlags) -> CliResult<()> {
    let (signer, sender) = state.sender(tx)?;
    let msg = parse::clear_admin_msg(sender, contract, state.prefix())?;
    state.submit(&signer, msg.into(), tx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::CliError;
    use crate::tx::TxError;
    use crate::types::{ErrorKind, ADDR_LEN};
    use crate::wasm::WASM_IDENT;

    fn setup() -> (tempfile::TempDir, AppState) {
        let temp_dir = tempfile::tempdir().unwrap();
        let state = AppState::new(temp_dir.path().to_path_buf()).unwrap();
        (temp_dir, state)
    }

    fn contract() -> String {
        AccAddress::new("fetch", &[7u8; ADDR_LEN])
            .unwrap()
            .to_string()
    }

    fn outbox_len(state: &AppState) -> usize {
        fs::read_dir(state.home.join(OUTBOX_DIR))
            .map(|entries| entries.count())
            .unwrap_or(0)
    }

    #[test]
    fn test_keys_roundtrip() {
        let (_dir, state) = setup();
        cmd_keys_add(&state, "alice").unwrap();
        cmd_keys_show(&state, "alice").unwrap();
        cmd_keys_list(&state).unwrap();
        assert!(cmd_keys_add(&state, "alice").is_err());
        assert!(matches!(
            cmd_keys_show(&state, "bob"),
            Err(CliError::Keyring(_))
        ));
    }

    #[test]
    fn test_config_init_persists() {
        let temp_dir = tempfile::tempdir().unwrap();
        cmd_config_init(temp_dir.path(), Some("dorado-1"), None).unwrap();

        let state = AppState::new(temp_dir.path().to_path_buf()).unwrap();
        assert_eq!(state.config.chain_id, "dorado-1");
        assert_eq!(state.config.bech32_prefix, "fetch");
        cmd_config_show(&state).unwrap();
    }

    #[test]
    fn test_clear_admin_is_queued() {
        let (_dir, state) = setup();
        state.keyring.add("alice").unwrap();
        let tx = TxFlags {
            from: "alice".into(),
            ..Default::default()
        };

        cmd_tx_clear_admin(&state, &contract(), &tx).unwrap();
        assert_eq!(outbox_len(&state), 1);
    }

    #[test]
    fn test_generate_only_with_address() {
        let (_dir, state) = setup();
        let sender = AccAddress::new("fetch", &[1u8; ADDR_LEN]).unwrap();
        let mut tx = TxFlags {
            from: sender.to_string(),
            generate_only: true,
            ..Default::default()
        };

        cmd_tx_update_admin(&state, &contract(), &contract(), &tx).unwrap();
        assert_eq!(outbox_len(&state), 0);

        tx.generate_only = false;
        assert!(matches!(
            cmd_tx_update_admin(&state, &contract(), &contract(), &tx),
            Err(CliError::Tx(TxError::MissingKey(_)))
        ));
    }

    #[test]
    fn test_store_reads_file() {
        let (dir, state) = setup();
        state.keyring.add("alice").unwrap();
        let tx = TxFlags {
            from: "alice".into(),
            ..Default::default()
        };

        let missing = dir.path().join("missing.wasm");
        let err = cmd_tx_store(&state, &missing, &StoreCodeFlags::default(), &tx).unwrap_err();
        assert!(matches!(err, CliError::Io(_)));

        let file = dir.path().join("contract.wasm");
        let mut bytes = WASM_IDENT.to_vec();
        bytes.extend_from_slice(&[1, 0, 0, 0]);
        fs::write(&file, bytes).unwrap();
        cmd_tx_store(&state, &file, &StoreCodeFlags::default(), &tx).unwrap();
        assert_eq!(outbox_len(&state), 1);
    }

    #[test]
    fn test_validation_stops_submission() {
        let (_dir, state) = setup();
        let key = state.keyring.add("alice").unwrap();
        let tx = TxFlags {
            from: "alice".into(),
            ..Default::default()
        };
        let own = key.address("fetch").unwrap().to_string();

        let err = cmd_tx_update_admin(&state, &contract(), &own, &tx).unwrap_err();
        assert!(matches!(err, CliError::Msg(ref e) if e.kind() == ErrorKind::InvalidInput));

        let flags = InstantiateFlags::default();
        let err = cmd_tx_instantiate(&state, "1", "{}", &flags, &tx).unwrap_err();
        assert!(matches!(err, CliError::Msg(ref e) if e.field() == "label"));
        assert_eq!(outbox_len(&state), 0);
    }

    #[test]
    fn test_unknown_sender() {
        let (_dir, state) = setup();
        let tx = TxFlags {
            from: "nobody".into(),
            ..Default::default()
        };
        assert!(matches!(
            cmd_tx_clear_admin(&state, &contract(), &tx),
            Err(CliError::Keyring(_))
        ));
    }
}
