//! Configuration schema definitions.
//!
//! The config file is a flat TOML table. Every field is optional so a
//! partially written file (or none at all) still loads.

use serde::{Deserialize, Serialize};

use crate::config::networks::DEFAULT_NETWORK;

/// Config key for the wallet private key used to sign stats requests.
pub const KEY_WALLET_PRIVATE_KEY: &str = "wallet_private_key";
/// Config key for the ingestion (query engine) stats service.
pub const KEY_QUERY_ENGINE_ENDPOINT: &str = "query_engine_endpoint";
/// Config key for the execution (refinement service) stats service.
pub const KEY_REFINEMENT_SERVICE_ENDPOINT: &str = "refinement_service_endpoint";
/// Config key for the JSON-RPC endpoint.
pub const KEY_RPC_ENDPOINT: &str = "rpc_endpoint";
/// Config key for the selected network.
pub const KEY_NETWORK: &str = "network";

/// All keys accepted by `config get/set/unset`, in display order.
pub const CONFIG_KEYS: [&str; 5] = [
    KEY_NETWORK,
    KEY_RPC_ENDPOINT,
    KEY_QUERY_ENGINE_ENDPOINT,
    KEY_REFINEMENT_SERVICE_ENDPOINT,
    KEY_WALLET_PRIVATE_KEY,
];

/// Root configuration for the CLI.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct CliConfig {
    /// Selected network name (e.g., "moksha").
    pub network: String,

    /// JSON-RPC endpoint. Falls back to the network default when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rpc_endpoint: Option<String>,

    /// Base URL of the ingestion stats service.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_engine_endpoint: Option<String>,

    /// Base URL of the execution stats service.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refinement_service_endpoint: Option<String>,

    /// Hex private key. Never printed unmasked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wallet_private_key: Option<String>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            network: DEFAULT_NETWORK.to_string(),
            rpc_endpoint: None,
            query_engine_endpoint: None,
            refinement_service_endpoint: None,
            wallet_private_key: None,
        }
    }
}

impl CliConfig {
    /// The optional value behind an endpoint/credential key, `None` for other keys.
    pub(crate) fn optional_value(&self, key: &str) -> Option<Option<&String>> {
        match key {
            KEY_RPC_ENDPOINT => Some(self.rpc_endpoint.as_ref()),
            KEY_QUERY_ENGINE_ENDPOINT => Some(self.query_engine_endpoint.as_ref()),
            KEY_REFINEMENT_SERVICE_ENDPOINT => Some(self.refinement_service_endpoint.as_ref()),
            KEY_WALLET_PRIVATE_KEY => Some(self.wallet_private_key.as_ref()),
            _ => None,
        }
    }

    /// Borrow the optional slot behind an endpoint/credential key.
    ///
    /// `network` is not optional and is handled by the store directly.
    pub(crate) fn optional_slot(&mut self, key: &str) -> Option<&mut Option<String>> {
        match key {
            KEY_RPC_ENDPOINT => Some(&mut self.rpc_endpoint),
            KEY_QUERY_ENGINE_ENDPOINT => Some(&mut self.query_engine_endpoint),
            KEY_REFINEMENT_SERVICE_ENDPOINT => Some(&mut self.refinement_service_endpoint),
            KEY_WALLET_PRIVATE_KEY => Some(&mut self.wallet_private_key),
            _ => None,
        }
    }
}
