//! Field level checks shared by the message validators

use super::address::AccAddress;
use super::coin::Coins;
use super::error::MsgError;
use once_cell::sync::Lazy;
use regex::Regex;

/// Largest accepted (compressed) code payload
pub const MAX_WASM_SIZE: usize = 500 * 1024;

/// Largest accepted contract label
pub const MAX_LABEL_SIZE: usize = 128;

/// Largest accepted builder docker tag
pub const MAX_BUILD_TAG_SIZE: usize = 128;

/// Docker image reference with a mandatory `org/name:tag` shape
pub const BUILD_TAG_PATTERN: &str =
    r"^[a-z0-9][a-z0-9._-]*[a-z0-9](/[a-z0-9][a-z0-9._-]*[a-z0-9])+:[a-zA-Z0-9_][a-zA-Z0-9_.-]*$";

static BUILD_TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(BUILD_TAG_PATTERN).expect("build tag pattern is valid"));

pub fn validate_address(field: &'static str, address: &AccAddress) -> Result<(), MsgError> {
    address
        .verify_format()
        .map_err(|e| MsgError::invalid(field, e))
}

pub fn validate_wasm_code(code: &[u8]) -> Result<(), MsgError> {
    if code.is_empty() {
        return Err(MsgError::required("wasm_byte_code"));
    }
    if code.len() > MAX_WASM_SIZE {
        return Err(MsgError::invalid(
            "wasm_byte_code",
            format!("cannot be longer than {} bytes", MAX_WASM_SIZE),
        ));
    }
    Ok(())
}

/// An optional source reference must be an absolute https URL
pub fn validate_source_url(source: &str) -> Result<(), MsgError> {
    if source.is_empty() {
        return Ok(());
    }
    if source.chars().any(char::is_whitespace) {
        return Err(MsgError::invalid("source", "not an url"));
    }

    let (scheme, rest) = source
        .split_once("://")
        .ok_or_else(|| MsgError::invalid("source", "not an absolute url"))?;

    let scheme_ok = scheme
        .chars()
        .next()
        .map(|c| c.is_ascii_alphabetic())
        .unwrap_or(false)
        && scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    if !scheme_ok {
        return Err(MsgError::invalid("source", "not an absolute url"));
    }
    if !scheme.eq_ignore_ascii_case("https") {
        return Err(MsgError::invalid("source", "must use https"));
    }

    let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
    if host.is_empty() {
        return Err(MsgError::invalid("source", "missing host"));
    }
    Ok(())
}

pub fn validate_builder(build_tag: &str) -> Result<(), MsgError> {
    if build_tag.len() > MAX_BUILD_TAG_SIZE {
        return Err(MsgError::invalid(
            "builder",
            format!("longer than {} characters", MAX_BUILD_TAG_SIZE),
        ));
    }
    if !build_tag.is_empty() && !BUILD_TAG_RE.is_match(build_tag) {
        return Err(MsgError::invalid("builder", "invalid tag supplied for builder"));
    }
    Ok(())
}

pub fn validate_label(label: &str) -> Result<(), MsgError> {
    if label.is_empty() {
        return Err(MsgError::required("label"));
    }
    if label.len() > MAX_LABEL_SIZE {
        return Err(MsgError::invalid(
            "label",
            format!("cannot be longer than {} characters", MAX_LABEL_SIZE),
        ));
    }
    Ok(())
}

pub fn validate_funds(field: &'static str, funds: &Coins) -> Result<(), MsgError> {
    funds.validate().map_err(|e| MsgError::invalid(field, e))
}
