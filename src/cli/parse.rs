//! Argument parsing for the wasm transaction commands
//!
//! Turns the strings a user typed into typed messages. Every function takes
//! its inputs explicitly (positional strings, a flag struct, the sender and
//! the bech32 prefix) and fails fast with a [`MsgError`] naming the field.

use crate::config::ClientConfig;
use crate::tx::TxBuilder;
use crate::types::{
    parse_coins, AccAddress, AccessConfig, Coins, MsgClearAdmin, MsgError, MsgExecuteContract,
    MsgInstantiateContract, MsgMigrateContract, MsgStoreCode, MsgUpdateAdmin,
};
use crate::wasm;

// =============================================================================
// Flag Structs
// =============================================================================

/// Options of `tx wasm store`
#[derive(Debug, Clone, Default)]
pub struct StoreCodeFlags {
    pub source: String,
    pub builder: String,
    pub instantiate_everybody: bool,
    pub instantiate_only_address: Option<String>,
}

/// Options of `tx wasm instantiate`
#[derive(Debug, Clone, Default)]
pub struct InstantiateFlags {
    pub label: String,
    pub amount: String,
    pub admin: Option<String>,
}

/// Options of `tx wasm execute`
#[derive(Debug, Clone, Default)]
pub struct ExecuteFlags {
    pub amount: String,
}

/// Options shared by every transaction command. `None` falls back to the
/// stored client configuration.
#[derive(Debug, Clone, Default)]
pub struct TxFlags {
    pub from: String,
    pub chain_id: Option<String>,
    pub account_number: u64,
    pub sequence: u64,
    pub gas: Option<u64>,
    pub fees: Option<String>,
    pub memo: String,
    pub generate_only: bool,
}

impl TxFlags {
    /// Envelope builder from the flags layered over `config`
    pub fn tx_builder(&self, config: &ClientConfig) -> Result<TxBuilder, MsgError> {
        let chain_id = self.chain_id.as_deref().unwrap_or(&config.chain_id);
        if chain_id.trim().is_empty() {
            return Err(MsgError::required("chain-id"));
        }
        let fees = parse_amount("fees", self.fees.as_deref().unwrap_or(&config.fees))?;

        Ok(TxBuilder::new(chain_id)
            .account_number(self.account_number)
            .sequence(self.sequence)
            .gas(self.gas.unwrap_or(config.gas))
            .fees(fees)
            .memo(&self.memo))
    }
}

// =============================================================================
// Value Parsers
// =============================================================================

/// Bech32 address under `prefix`; empty input is a missing field
pub fn parse_address(field: &'static str, s: &str, prefix: &str) -> Result<AccAddress, MsgError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(MsgError::required(field));
    }
    AccAddress::from_bech32(s, prefix).map_err(|e| MsgError::invalid(field, e))
}

/// Unsigned decimal code id; signs and whitespace are rejected
pub fn parse_code_id(s: &str) -> Result<u64, MsgError> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(MsgError::invalid(
            "code_id",
            format!("{:?} is not an unsigned decimal number", s),
        ));
    }
    s.parse::<u64>().map_err(|e| MsgError::invalid("code_id", e))
}

/// Coin list such as `"100uatom,5ufet"`; `""` is the empty set
pub fn parse_amount(field: &'static str, s: &str) -> Result<Coins, MsgError> {
    parse_coins(s).map_err(|e| MsgError::invalid(field, e))
}

pub fn parse_label(s: &str) -> Result<String, MsgError> {
    if s.is_empty() {
        return Err(MsgError::required("label"));
    }
    Ok(s.to_string())
}

/// Instantiate permission from the store flags. An address wins over
/// `--instantiate-everybody`; no flag leaves the chain default.
pub fn instantiate_permission(
    flags: &StoreCodeFlags,
    prefix: &str,
) -> Result<Option<AccessConfig>, MsgError> {
    let only_address = flags
        .instantiate_only_address
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    match only_address {
        Some(address) => {
            if flags.instantiate_everybody {
                log::warn!(
                    "both --instantiate-only-address and --instantiate-everybody given, using {}",
                    address
                );
            }
            let address = parse_address("instantiate-only-address", address, prefix)?;
            Ok(Some(AccessConfig::only_address(address)))
        }
        None if flags.instantiate_everybody => Ok(Some(AccessConfig::Everybody)),
        None => Ok(None),
    }
}

// =============================================================================
// Message Builders
// =============================================================================

/// Upload message for the contents of a wasm or gzip file
pub fn store_code_msg(
    sender: AccAddress,
    wasm_bytes: Vec<u8>,
    flags: &StoreCodeFlags,
    prefix: &str,
) -> Result<MsgStoreCode, MsgError> {
    let wasm_byte_code =
        wasm::normalize(wasm_bytes).map_err(|e| MsgError::invalid("wasm_byte_code", e))?;
    let permission = instantiate_permission(flags, prefix)?;

    Ok(MsgStoreCode::new(
        sender,
        wasm_byte_code,
        flags.source.clone(),
        flags.builder.clone(),
        permission,
    ))
}

pub fn instantiate_msg(
    sender: AccAddress,
    code_id: &str,
    init_msg: &str,
    flags: &InstantiateFlags,
    prefix: &str,
) -> Result<MsgInstantiateContract, MsgError> {
    let label = parse_label(&flags.label)?;
    let code_id = parse_code_id(code_id)?;
    let amount = parse_amount("amount", &flags.amount)?;
    let admin = match flags.admin.as_deref().map(str::trim) {
        Some(admin) if !admin.is_empty() => Some(parse_address("admin", admin, prefix)?),
        _ => None,
    };

    Ok(MsgInstantiateContract::new(
        sender,
        code_id,
        label,
        init_msg.as_bytes().to_vec(),
        amount,
        admin,
    ))
}

pub fn execute_msg(
    sender: AccAddress,
    contract: &str,
    exec_msg: &str,
    flags: &ExecuteFlags,
    prefix: &str,
) -> Result<MsgExecuteContract, MsgError> {
    let contract = parse_address("contract", contract, prefix)?;
    let amount = parse_amount("amount", &flags.amount)?;

    Ok(MsgExecuteContract::new(
        sender,
        contract,
        exec_msg.as_bytes().to_vec(),
        amount,
    ))
}

pub fn migrate_msg(
    sender: AccAddress,
    contract: &str,
    code_id: &str,
    migrate_msg: &str,
    prefix: &str,
) -> Result<MsgMigrateContract, MsgError> {
    let contract = parse_address("contract", contract, prefix)?;
    let code_id = parse_code_id(code_id)?;

    Ok(MsgMigrateContract::new(
        sender,
        contract,
        code_id,
        migrate_msg.as_bytes().to_vec(),
    ))
}

pub fn update_admin_msg(
    sender: AccAddress,
    contract: &str,
    new_admin: &str,
    prefix: &str,
) -> Result<MsgUpdateAdmin, MsgError> {
    let contract = parse_address("contract", contract, prefix)?;
    let new_admin = parse_address("new_admin", new_admin, prefix)?;
    Ok(MsgUpdateAdmin::new(sender, contract, new_admin))
}

pub fn clear_admin_msg(
    sender: AccAddress,
    contract: &str,
    prefix: &str,
) -> Result<MsgClearAdmin, MsgError> {
    let contract = parse_address("contract", contract, prefix)?;
    Ok(MsgClearAdmin::new(sender, contract))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ErrorKind, Msg, ADDR_LEN};
    use crate::wasm::{uncompress, WASM_IDENT};

    const PREFIX: &str = "fetch";

    fn addr(byte: u8) -> AccAddress {
        AccAddress::new(PREFIX, &[byte; ADDR_LEN]).unwrap()
    }

    fn raw_wasm() -> Vec<u8> {
        let mut bytes = WASM_IDENT.to_vec();
        bytes.extend_from_slice(&[0x01, 0x00, 0x00, 0x00]);
        bytes.extend(std::iter::repeat(0x0b).take(256));
        bytes
    }

    #[test]
    fn test_permission_precedence() {
        let only = addr(3);
        let mut flags = StoreCodeFlags {
            instantiate_everybody: true,
            instantiate_only_address: Some(only.to_string()),
            ..Default::default()
        };
        assert_eq!(
            instantiate_permission(&flags, PREFIX).unwrap(),
            Some(AccessConfig::only_address(only))
        );

        flags.instantiate_only_address = Some(String::new());
        assert_eq!(
            instantiate_permission(&flags, PREFIX).unwrap(),
            Some(AccessConfig::Everybody)
        );

        flags.instantiate_everybody = false;
        assert_eq!(instantiate_permission(&flags, PREFIX).unwrap(), None);

        flags.instantiate_only_address = None;
        assert_eq!(instantiate_permission(&flags, PREFIX).unwrap(), None);
    }

    #[test]
    fn test_permission_bad_address() {
        let flags = StoreCodeFlags {
            instantiate_only_address: Some("fetch1notanaddress".into()),
            ..Default::default()
        };
        let err = instantiate_permission(&flags, PREFIX).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert_eq!(err.field(), "instantiate-only-address");
    }

    #[test]
    fn test_parse_amount() {
        let coins = parse_amount("amount", "100uatom").unwrap();
        assert_eq!(coins.len(), 1);
        assert_eq!(coins.amount_of("uatom"), 100);

        assert!(parse_amount("amount", "").unwrap().is_empty());

        let err = parse_amount("amount", "-5uatom").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert_eq!(err.field(), "amount");
    }

    #[test]
    fn test_parse_code_id() {
        assert_eq!(parse_code_id("7").unwrap(), 7);
        assert_eq!(parse_code_id("18446744073709551615").unwrap(), u64::MAX);

        for input in ["+7", " 42 ", "42 ", "", "abc", "-1", "18446744073709551616"] {
            let err = parse_code_id(input).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidInput, "input {:?}", input);
            assert_eq!(err.field(), "code_id");
        }
    }

    #[test]
    fn test_instantiate_rejects_signed_code_id() {
        let flags = InstantiateFlags {
            label: "my-contract".into(),
            ..Default::default()
        };
        let err = instantiate_msg(addr(1), "+7", "{}", &flags, PREFIX).unwrap_err();
        assert_eq!(err.field(), "code_id");

        let contract = addr(5);
        let err = migrate_msg(addr(1), contract.as_str(), " 42 ", "{}", PREFIX).unwrap_err();
        assert_eq!(err.field(), "code_id");
    }

    #[test]
    fn test_parse_address() {
        let a = addr(1);
        assert_eq!(parse_address("contract", a.as_str(), PREFIX).unwrap(), a);

        let err = parse_address("contract", "", PREFIX).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RequiredField);

        let cosmos = AccAddress::new("cosmos", &[1u8; ADDR_LEN]).unwrap();
        let err = parse_address("contract", cosmos.as_str(), PREFIX).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert_eq!(err.field(), "contract");
    }

    #[test]
    fn test_instantiate_label_required() {
        let flags = InstantiateFlags {
            label: String::new(),
            amount: "100uatom".into(),
            admin: None,
        };
        let err = instantiate_msg(addr(1), "7", "{}", &flags, PREFIX).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RequiredField);
        assert_eq!(err.field(), "label");
    }

    #[test]
    fn test_instantiate_with_empty_amount() {
        let flags = InstantiateFlags {
            label: "my-contract".into(),
            amount: String::new(),
            admin: None,
        };
        let msg = instantiate_msg(addr(1), "7", r#"{"count":0}"#, &flags, PREFIX).unwrap();

        assert_eq!(msg.code_id, 7);
        assert_eq!(msg.label, "my-contract");
        assert!(msg.init_funds.is_empty());
        assert!(msg.admin.is_none());
        assert_eq!(msg.init_msg, br#"{"count":0}"#.to_vec());
        assert!(msg.validate_basic().is_ok());
    }

    #[test]
    fn test_instantiate_with_admin() {
        let admin = addr(2);
        let flags = InstantiateFlags {
            label: "my-contract".into(),
            amount: "5ufet".into(),
            admin: Some(admin.to_string()),
        };
        let msg = instantiate_msg(addr(1), "7", "{}", &flags, PREFIX).unwrap();
        assert_eq!(msg.admin, Some(admin));
        assert_eq!(msg.init_funds.amount_of("ufet"), 5);
    }

    #[test]
    fn test_store_code_compresses_raw_wasm() {
        let flags = StoreCodeFlags {
            source: "https://example.com/src".into(),
            builder: "cosmwasm/rust-optimizer:0.10".into(),
            ..Default::default()
        };
        let raw = raw_wasm();
        let msg = store_code_msg(addr(1), raw.clone(), &flags, PREFIX).unwrap();

        assert!(wasm::is_gzip(&msg.wasm_byte_code));
        assert_eq!(uncompress(&msg.wasm_byte_code, 1 << 20).unwrap(), raw);
        assert_eq!(msg.source, "https://example.com/src");
        assert_eq!(msg.builder, "cosmwasm/rust-optimizer:0.10");
        assert!(msg.instantiate_permission.is_none());
        assert!(msg.validate_basic().is_ok());
    }

    #[test]
    fn test_store_code_from_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("contract.wasm");
        std::fs::write(&path, raw_wasm()).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        let flags = StoreCodeFlags {
            source: "https://example.com/src".into(),
            builder: "cosmwasm/rust-optimizer:0.10".into(),
            ..Default::default()
        };
        let msg = store_code_msg(addr(1), bytes, &flags, PREFIX).unwrap();
        assert_eq!(
            uncompress(&msg.wasm_byte_code, 1 << 20).unwrap(),
            raw_wasm()
        );
    }

    #[test]
    fn test_store_code_rejects_unknown_payload() {
        let err = store_code_msg(
            addr(1),
            b"#!/bin/sh".to_vec(),
            &StoreCodeFlags::default(),
            PREFIX,
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert_eq!(err.field(), "wasm_byte_code");
        assert!(err.to_string().contains("use wasm binary or gzip"));
    }

    #[test]
    fn test_admin_messages() {
        let contract = addr(5);
        let msg = update_admin_msg(addr(1), contract.as_str(), addr(2).as_str(), PREFIX).unwrap();
        assert_eq!(msg.new_admin, addr(2));
        assert!(msg.validate_basic().is_ok());

        let msg = update_admin_msg(addr(1), contract.as_str(), addr(1).as_str(), PREFIX).unwrap();
        assert!(msg.validate_basic().is_err());

        let msg = clear_admin_msg(addr(1), contract.as_str(), PREFIX).unwrap();
        assert_eq!(msg.contract, contract);
    }

    #[test]
    fn test_execute_and_migrate() {
        let contract = addr(5);
        let flags = ExecuteFlags {
            amount: "10ufet,3uatom".into(),
        };
        let msg =
            execute_msg(addr(1), contract.as_str(), r#"{"ping":{}}"#, &flags, PREFIX).unwrap();
        assert_eq!(msg.sent_funds.len(), 2);
        assert_eq!(msg.sent_funds.iter().next().unwrap().denom, "uatom");

        let msg = migrate_msg(addr(1), contract.as_str(), "9", "{}", PREFIX).unwrap();
        assert_eq!(msg.code_id, 9);

        let err = migrate_msg(addr(1), contract.as_str(), "nine", "{}", PREFIX).unwrap_err();
        assert_eq!(err.field(), "code_id");
    }

    #[test]
    fn test_tx_flags_override_config() {
        let config = ClientConfig {
            fees: "100afet".into(),
            ..Default::default()
        };
        let flags = TxFlags {
            chain_id: Some("dorado-1".into()),
            fees: Some("bogus fee".into()),
            ..Default::default()
        };
        let err = flags.tx_builder(&config).unwrap_err();
        assert_eq!(err.field(), "fees");

        let flags = TxFlags {
            chain_id: Some("dorado-1".into()),
            gas: Some(9),
            ..Default::default()
        };
        let builder = flags.tx_builder(&config).unwrap();
        assert_eq!(builder.chain_id(), "dorado-1");
    }
}
