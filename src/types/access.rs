//! Instantiate permissions for stored code

use super::address::AccAddress;
use super::error::MsgError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Who may create contract instances from a stored code object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "permission")]
pub enum AccessConfig {
    Nobody,
    OnlyAddress { address: AccAddress },
    Everybody,
}

impl AccessConfig {
    pub fn only_address(address: AccAddress) -> Self {
        AccessConfig::OnlyAddress { address }
    }

    pub fn validate_basic(&self) -> Result<(), MsgError> {
        match self {
            AccessConfig::OnlyAddress { address } => address
                .verify_format()
                .map_err(|e| MsgError::invalid("instantiate_permission", e)),
            AccessConfig::Nobody | AccessConfig::Everybody => Ok(()),
        }
    }
}

impl fmt::Display for AccessConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessConfig::Nobody => f.write_str("Nobody"),
            AccessConfig::OnlyAddress { address } => write!(f, "OnlyAddress({})", address),
            AccessConfig::Everybody => f.write_str("Everybody"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::address::ADDR_LEN;

    #[test]
    fn test_json_shape() {
        let alice = AccAddress::new("fetch", &[1u8; ADDR_LEN]).unwrap();
        let only = AccessConfig::only_address(alice.clone());
        let json = serde_json::to_value(&only).unwrap();
        assert_eq!(json["permission"], "OnlyAddress");
        assert_eq!(json["address"], alice.as_str());

        let everybody = serde_json::to_string(&AccessConfig::Everybody).unwrap();
        assert_eq!(everybody, r#"{"permission":"Everybody"}"#);
    }

    #[test]
    fn test_validate_rejects_short_address() {
        let json = format!(
            r#"{{"permission":"OnlyAddress","address":"{}"}}"#,
            bech32::encode("fetch", bech32::ToBase32::to_base32(&[1u8; 8]), bech32::Variant::Bech32)
                .unwrap()
        );
        let config: AccessConfig = serde_json::from_str(&json).unwrap();
        let err = config.validate_basic().unwrap_err();
        assert_eq!(err.field(), "instantiate_permission");
    }
}
