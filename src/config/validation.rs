//! Configuration value validation.
//!
//! # Responsibilities
//! - Reject unknown keys before they reach the file
//! - Check endpoint URLs parse and use http(s)
//! - Check private keys are 32 bytes of hex
//! - Check network names against the built-in table
//!
//! Validation is a pure function of (key, value); serde handles the file's
//! syntax separately.

use std::fmt;

use crate::config::networks::{find_network, network_names};
use crate::config::schema::{
    CONFIG_KEYS, KEY_NETWORK, KEY_QUERY_ENGINE_ENDPOINT, KEY_REFINEMENT_SERVICE_ENDPOINT,
    KEY_RPC_ENDPOINT, KEY_WALLET_PRIVATE_KEY,
};

/// A rejected configuration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub key: String,
    pub reason: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.key, self.reason)
    }
}

impl std::error::Error for ValidationError {}

fn invalid(key: &str, reason: impl Into<String>) -> ValidationError {
    ValidationError {
        key: key.to_string(),
        reason: reason.into(),
    }
}

/// True if `key` is one of the recognised config keys.
pub fn is_known_key(key: &str) -> bool {
    CONFIG_KEYS.contains(&key)
}

/// Validate a value about to be stored under `key`.
pub fn validate_value(key: &str, value: &str) -> Result<(), ValidationError> {
    match key {
        KEY_RPC_ENDPOINT | KEY_QUERY_ENGINE_ENDPOINT | KEY_REFINEMENT_SERVICE_ENDPOINT => {
            validate_endpoint(key, value)
        }
        KEY_WALLET_PRIVATE_KEY => validate_private_key(key, value),
        KEY_NETWORK => match find_network(value) {
            Some(_) => Ok(()),
            None => Err(invalid(
                key,
                format!("unknown network '{}' (expected one of: {})", value, network_names()),
            )),
        },
        _ => Err(invalid(
            key,
            format!("unknown key (expected one of: {})", CONFIG_KEYS.join(", ")),
        )),
    }
}

fn validate_endpoint(key: &str, value: &str) -> Result<(), ValidationError> {
    let url = url::Url::parse(value).map_err(|e| invalid(key, format!("invalid URL: {}", e)))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(invalid(
            key,
            format!("unsupported scheme '{}' (expected http or https)", other),
        )),
    }
}

fn validate_private_key(key: &str, value: &str) -> Result<(), ValidationError> {
    let hex = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value);

    if hex.len() != 64 {
        return Err(invalid(
            key,
            format!("expected 64 hex characters, got {}", hex.len()),
        ));
    }
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid(key, "contains non-hex characters"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_PRIVATE_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[test]
    fn test_endpoints() {
        assert!(validate_value(KEY_QUERY_ENGINE_ENDPOINT, "https://qe.example.com").is_ok());
        assert!(validate_value(KEY_REFINEMENT_SERVICE_ENDPOINT, "http://localhost:8091").is_ok());

        let err = validate_value(KEY_RPC_ENDPOINT, "ftp://rpc.example.com").unwrap_err();
        assert!(err.reason.contains("unsupported scheme"));
        assert!(validate_value(KEY_RPC_ENDPOINT, "rpc.example.com").is_err());
    }

    #[test]
    fn test_private_key() {
        assert!(validate_value(KEY_WALLET_PRIVATE_KEY, TEST_PRIVATE_KEY).is_ok());
        assert!(validate_value(KEY_WALLET_PRIVATE_KEY, &format!("0x{}", TEST_PRIVATE_KEY)).is_ok());

        let err = validate_value(KEY_WALLET_PRIVATE_KEY, "0x1234").unwrap_err();
        assert_eq!(err.reason, "expected 64 hex characters, got 4");
        assert!(validate_value(KEY_WALLET_PRIVATE_KEY, &"g".repeat(64)).is_err());
    }

    #[test]
    fn test_network_and_unknown_key() {
        assert!(validate_value(KEY_NETWORK, "mainnet").is_ok());
        assert!(validate_value(KEY_NETWORK, "ropsten").is_err());

        let err = validate_value("api_key", "x").unwrap_err();
        assert!(err.to_string().starts_with("api_key: unknown key"));
        assert!(!is_known_key("api_key"));
        assert!(is_known_key(KEY_WALLET_PRIVATE_KEY));
    }
}
