//! Wasm module messages
//!
//! One record per contract operation. Builders take already parsed values,
//! never raw strings, and perform no I/O. `validate_basic` runs the
//! structural checks before a message is handed to the signer.

use super::access::AccessConfig;
use super::address::AccAddress;
use super::coin::Coins;
use super::error::MsgError;
use super::validation::{
    validate_address, validate_builder, validate_funds, validate_label, validate_source_url,
    validate_wasm_code,
};
use serde::{Deserialize, Serialize};

/// Route of every message produced here
pub const ROUTER_KEY: &str = "wasm";

/// Behaviour shared by all messages handed to the signer
pub trait Msg {
    fn route(&self) -> &'static str {
        ROUTER_KEY
    }

    fn msg_type(&self) -> &'static str;

    /// Self-consistency checks that need no chain state
    fn validate_basic(&self) -> Result<(), MsgError>;

    /// Accounts that must sign the enclosing transaction
    fn signers(&self) -> Vec<&AccAddress>;
}

// =============================================================================
// Store
// =============================================================================

/// Upload of gzip compressed contract code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgStoreCode {
    pub sender: AccAddress,
    #[serde(with = "base64_bytes")]
    pub wasm_byte_code: Vec<u8>,
    /// Absolute https URL of the contract source, may be empty
    #[serde(default)]
    pub source: String,
    /// Docker tag of the reproducible build image, may be empty
    #[serde(default)]
    pub builder: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instantiate_permission: Option<AccessConfig>,
}

impl MsgStoreCode {
    pub fn new(
        sender: AccAddress,
        wasm_byte_code: Vec<u8>,
        source: String,
        builder: String,
        instantiate_permission: Option<AccessConfig>,
    ) -> Self {
        Self {
            sender,
            wasm_byte_code,
            source,
            builder,
            instantiate_permission,
        }
    }
}

impl Msg for MsgStoreCode {
    fn msg_type(&self) -> &'static str {
        "store-code"
    }

    fn validate_basic(&self) -> Result<(), MsgError> {
        validate_address("sender", &self.sender)?;
        validate_wasm_code(&self.wasm_byte_code)?;
        validate_source_url(&self.source)?;
        validate_builder(&self.builder)?;
        if let Some(permission) = &self.instantiate_permission {
            permission.validate_basic()?;
        }
        Ok(())
    }

    fn signers(&self) -> Vec<&AccAddress> {
        vec![&self.sender]
    }
}

// =============================================================================
// Instantiate
// =============================================================================

/// Creation of a contract instance from stored code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgInstantiateContract {
    pub sender: AccAddress,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin: Option<AccAddress>,
    pub code_id: u64,
    pub label: String,
    #[serde(with = "base64_bytes")]
    pub init_msg: Vec<u8>,
    #[serde(default)]
    pub init_funds: Coins,
}

impl MsgInstantiateContract {
    pub fn new(
        sender: AccAddress,
        code_id: u64,
        label: String,
        init_msg: Vec<u8>,
        init_funds: Coins,
        admin: Option<AccAddress>,
    ) -> Self {
        Self {
            sender,
            admin,
            code_id,
            label,
            init_msg,
            init_funds,
        }
    }
}

impl Msg for MsgInstantiateContract {
    fn msg_type(&self) -> &'static str {
        "instantiate"
    }

    fn validate_basic(&self) -> Result<(), MsgError> {
        validate_address("sender", &self.sender)?;
        if self.code_id == 0 {
            return Err(MsgError::required("code_id"));
        }
        validate_label(&self.label)?;
        validate_funds("init_funds", &self.init_funds)?;
        if let Some(admin) = &self.admin {
            validate_address("admin", admin)?;
        }
        Ok(())
    }

    fn signers(&self) -> Vec<&AccAddress> {
        vec![&self.sender]
    }
}

// =============================================================================
// Execute
// =============================================================================

/// Call into an existing contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgExecuteContract {
    pub sender: AccAddress,
    pub contract: AccAddress,
    #[serde(with = "base64_bytes")]
    pub msg: Vec<u8>,
    #[serde(default)]
    pub sent_funds: Coins,
}

impl MsgExecuteContract {
    pub fn new(sender: AccAddress, contract: AccAddress, msg: Vec<u8>, sent_funds: Coins) -> Self {
        Self {
            sender,
            contract,
            msg,
            sent_funds,
        }
    }
}

impl Msg for MsgExecuteContract {
    fn msg_type(&self) -> &'static str {
        "execute"
    }

    fn validate_basic(&self) -> Result<(), MsgError> {
        validate_address("sender", &self.sender)?;
        validate_address("contract", &self.contract)?;
        validate_funds("sent_funds", &self.sent_funds)
    }

    fn signers(&self) -> Vec<&AccAddress> {
        vec![&self.sender]
    }
}

// =============================================================================
// Migrate
// =============================================================================

/// Move a contract onto new code; only the admin may do this on chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgMigrateContract {
    pub sender: AccAddress,
    pub contract: AccAddress,
    pub code_id: u64,
    #[serde(with = "base64_bytes")]
    pub msg: Vec<u8>,
}

impl MsgMigrateContract {
    pub fn new(sender: AccAddress, contract: AccAddress, code_id: u64, msg: Vec<u8>) -> Self {
        Self {
            sender,
            contract,
            code_id,
            msg,
        }
    }
}

impl Msg for MsgMigrateContract {
    fn msg_type(&self) -> &'static str {
        "migrate"
    }

    fn validate_basic(&self) -> Result<(), MsgError> {
        if self.code_id == 0 {
            return Err(MsgError::required("code_id"));
        }
        validate_address("sender", &self.sender)?;
        validate_address("contract", &self.contract)
    }

    fn signers(&self) -> Vec<&AccAddress> {
        vec![&self.sender]
    }
}

// =============================================================================
// Admin
// =============================================================================

/// Hand the admin role of a contract to another account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgUpdateAdmin {
    pub sender: AccAddress,
    pub new_admin: AccAddress,
    pub contract: AccAddress,
}

impl MsgUpdateAdmin {
    pub fn new(sender: AccAddress, contract: AccAddress, new_admin: AccAddress) -> Self {
        Self {
            sender,
            new_admin,
            contract,
        }
    }
}

impl Msg for MsgUpdateAdmin {
    fn msg_type(&self) -> &'static str {
        "update-contract-admin"
    }

    fn validate_basic(&self) -> Result<(), MsgError> {
        validate_address("sender", &self.sender)?;
        validate_address("contract", &self.contract)?;
        validate_address("new_admin", &self.new_admin)?;
        if self.sender.as_bytes() == self.new_admin.as_bytes() {
            return Err(MsgError::invalid(
                "new_admin",
                "new admin is the same as the old",
            ));
        }
        Ok(())
    }

    fn signers(&self) -> Vec<&AccAddress> {
        vec![&self.sender]
    }
}

/// Drop the admin of a contract, freezing its code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgClearAdmin {
    pub sender: AccAddress,
    pub contract: AccAddress,
}

impl MsgClearAdmin {
    pub fn new(sender: AccAddress, contract: AccAddress) -> Self {
        Self { sender, contract }
    }
}

impl Msg for MsgClearAdmin {
    fn msg_type(&self) -> &'static str {
        "clear-contract-admin"
    }

    fn validate_basic(&self) -> Result<(), MsgError> {
        validate_address("sender", &self.sender)?;
        validate_address("contract", &self.contract)
    }

    fn signers(&self) -> Vec<&AccAddress> {
        vec![&self.sender]
    }
}

// =============================================================================
// Envelope variant
// =============================================================================

/// Any wasm message, tagged the way it is encoded inside a transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum WasmMsg {
    #[serde(rename = "wasm/MsgStoreCode")]
    StoreCode(MsgStoreCode),
    #[serde(rename = "wasm/MsgInstantiateContract")]
    InstantiateContract(MsgInstantiateContract),
    #[serde(rename = "wasm/MsgExecuteContract")]
    ExecuteContract(MsgExecuteContract),
    #[serde(rename = "wasm/MsgMigrateContract")]
    MigrateContract(MsgMigrateContract),
    #[serde(rename = "wasm/MsgUpdateAdmin")]
    UpdateAdmin(MsgUpdateAdmin),
    #[serde(rename = "wasm/MsgClearAdmin")]
    ClearAdmin(MsgClearAdmin),
}

impl WasmMsg {
    fn inner(&self) -> &dyn Msg {
        match self {
            WasmMsg::StoreCode(m) => m,
            WasmMsg::InstantiateContract(m) => m,
            WasmMsg::ExecuteContract(m) => m,
            WasmMsg::MigrateContract(m) => m,
            WasmMsg::UpdateAdmin(m) => m,
            WasmMsg::ClearAdmin(m) => m,
        }
    }
}

impl Msg for WasmMsg {
    fn msg_type(&self) -> &'static str {
        self.inner().msg_type()
    }

    fn validate_basic(&self) -> Result<(), MsgError> {
        self.inner().validate_basic()
    }

    fn signers(&self) -> Vec<&AccAddress> {
        self.inner().signers()
    }
}

macro_rules! impl_from_msg {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for WasmMsg {
                fn from(msg: $ty) -> Self {
                    WasmMsg::$variant(msg)
                }
            }
        )*
    };
}

impl_from_msg!(
    StoreCode(MsgStoreCode),
    InstantiateContract(MsgInstantiateContract),
    ExecuteContract(MsgExecuteContract),
    MigrateContract(MsgMigrateContract),
    UpdateAdmin(MsgUpdateAdmin),
    ClearAdmin(MsgClearAdmin),
);

/// Byte fields travel as standard base64
mod base64_bytes {
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        STANDARD.decode(s).map_err(serde::de::Error::custom)
    }
}
