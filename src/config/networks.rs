//! Built-in network table.

use crate::blockchain::ChainId;

/// Network selected when the config file does not name one.
pub const DEFAULT_NETWORK: &str = "moksha";

/// A network the CLI knows how to talk to out of the box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkInfo {
    pub name: &'static str,
    pub chain_id: ChainId,
    pub rpc_url: &'static str,
}

pub const NETWORKS: [NetworkInfo; 2] = [
    NetworkInfo {
        name: "moksha",
        chain_id: ChainId(14800),
        rpc_url: "https://rpc.moksha.vana.org",
    },
    NetworkInfo {
        name: "mainnet",
        chain_id: ChainId(1480),
        rpc_url: "https://rpc.vana.org",
    },
];

/// Look up a network by name (case-insensitive).
pub fn find_network(name: &str) -> Option<&'static NetworkInfo> {
    NETWORKS.iter().find(|n| n.name.eq_ignore_ascii_case(name.trim()))
}

/// Comma-separated list of known network names, for error hints.
pub fn network_names() -> String {
    NETWORKS.iter().map(|n| n.name).collect::<Vec<_>>().join(", ")
}
