//! `network info`: check the configured RPC endpoint.

use clap::Subcommand;
use serde_json::json;

use crate::blockchain::client::{ProbeReport, DEFAULT_RPC_TIMEOUT_SECS};
use crate::blockchain::{BlockchainError, RpcProbe};
use crate::commands::{Console, EXIT_FAILURE, EXIT_SUCCESS};
use crate::config::schema::KEY_RPC_ENDPOINT;
use crate::config::{ConfigSource, ConfigStore};

#[derive(Debug, Clone, Subcommand)]
pub enum NetworkCommand {
    /// Query chain id and latest block from the RPC endpoint
    Info {
        /// RPC URL to probe instead of the configured one
        #[arg(long)]
        rpc_url: Option<String>,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

pub async fn run_network(command: &NetworkCommand, store: &ConfigStore, console: &mut Console<'_>) -> u8 {
    match command {
        NetworkCommand::Info { rpc_url, json } => {
            network_info(store, rpc_url.as_deref(), *json, console).await
        }
    }
}

async fn network_info(
    store: &ConfigStore,
    rpc_url: Option<&str>,
    json: bool,
    console: &mut Console<'_>,
) -> u8 {
    let network = match store.selected_network() {
        Ok(network) => network,
        Err(e) => {
            console.error(&e.to_string());
            console.hint("Select a known network with: refiner-cli config network <name>");
            return EXIT_FAILURE;
        }
    };

    let rpc_url = match rpc_url {
        Some(url) => url.to_string(),
        None => store
            .get_config_value(KEY_RPC_ENDPOINT)
            .ok()
            .flatten()
            .unwrap_or_else(|| network.rpc_url.to_string()),
    };

    let report = match probe(&rpc_url, network.chain_id).await {
        Ok(report) => report,
        Err(e) => {
            console.error(&format!("Could not reach {}: {}", rpc_url, e));
            console.hint(&format!(
                "Check the endpoint or change it with: refiner-cli config set {} <url>",
                KEY_RPC_ENDPOINT
            ));
            return EXIT_FAILURE;
        }
    };

    if !report.chain_matches() {
        console.warning(&format!(
            "RPC endpoint reports chain id {} but network '{}' expects {}",
            report.chain_id, network.name, network.chain_id
        ));
    }

    let text = if json {
        let value = json!({
            "network": network.name,
            "rpc_endpoint": report.rpc_url,
            "chain_id": report.chain_id.0,
            "expected_chain_id": network.chain_id.0,
            "chain_matches": report.chain_matches(),
            "block_number": report.block_number,
        });
        match serde_json::to_string_pretty(&value) {
            Ok(text) => text,
            Err(e) => {
                console.error(&format!("Unexpected error: {}", e));
                return EXIT_FAILURE;
            }
        }
    } else {
        format!(
            "Network:      {}\nRPC endpoint: {}\nChain id:     {}\nLatest block: {}",
            network.name, report.rpc_url, report.chain_id, report.block_number
        )
    };

    match console.print(&text) {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            console.error(&format!("Unexpected error: failed to write output: {}", e));
            EXIT_FAILURE
        }
    }
}

async fn probe(
    rpc_url: &str,
    expected: crate::blockchain::ChainId,
) -> Result<ProbeReport, BlockchainError> {
    RpcProbe::new(rpc_url, DEFAULT_RPC_TIMEOUT_SECS)?
        .probe(Some(expected))
        .await
}
