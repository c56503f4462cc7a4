//! RPC connectivity probe.
//!
//! # Responsibilities
//! - Connect to the configured JSON-RPC endpoint
//! - Query chain id and latest block number under a timeout
//! - Compare the reported chain id with the selected network

use alloy::providers::{Provider, ProviderBuilder};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

use crate::blockchain::types::{BlockchainError, BlockchainResult, ChainId};

/// Default timeout for a single RPC call.
pub const DEFAULT_RPC_TIMEOUT_SECS: u64 = 10;

/// Result of probing an RPC endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeReport {
    pub rpc_url: String,
    pub chain_id: ChainId,
    pub block_number: u64,
    pub expected_chain_id: Option<ChainId>,
}

impl ProbeReport {
    /// True unless a chain id was expected and the endpoint reported another.
    pub fn chain_matches(&self) -> bool {
        self.expected_chain_id
            .map(|expected| expected == self.chain_id)
            .unwrap_or(true)
    }
}

/// Thin JSON-RPC client used by `network info`.
#[derive(Clone)]
pub struct RpcProbe {
    provider: Arc<dyn Provider + Send + Sync>,
    rpc_url: String,
    timeout_secs: u64,
}

impl RpcProbe {
    /// Create a probe for `rpc_url`. No request is made until a query runs.
    pub fn new(rpc_url: &str, timeout_secs: u64) -> BlockchainResult<Self> {
        let url: url::Url = rpc_url.parse().map_err(|e: url::ParseError| {
            BlockchainError::InvalidUrl {
                url: rpc_url.to_string(),
                reason: e.to_string(),
            }
        })?;

        let provider = Arc::new(ProviderBuilder::new().connect_http(url))
            as Arc<dyn Provider + Send + Sync>;

        Ok(Self {
            provider,
            rpc_url: rpc_url.to_string(),
            timeout_secs,
        })
    }

    /// Get the chain ID from the RPC.
    pub async fn get_chain_id(&self) -> BlockchainResult<ChainId> {
        match timeout(self.timeout(), self.provider.get_chain_id()).await {
            Ok(Ok(id)) => Ok(ChainId(id)),
            Ok(Err(e)) => Err(BlockchainError::Rpc(e.to_string())),
            Err(_) => Err(BlockchainError::Timeout(self.timeout_secs)),
        }
    }

    /// Get the latest block number.
    pub async fn get_block_number(&self) -> BlockchainResult<u64> {
        match timeout(self.timeout(), self.provider.get_block_number()).await {
            Ok(Ok(number)) => Ok(number),
            Ok(Err(e)) => Err(BlockchainError::Rpc(e.to_string())),
            Err(_) => Err(BlockchainError::Timeout(self.timeout_secs)),
        }
    }

    /// Query chain id and head block, tagging the expected chain for comparison.
    pub async fn probe(&self, expected_chain_id: Option<ChainId>) -> BlockchainResult<ProbeReport> {
        let chain_id = self.get_chain_id().await?;
        let block_number = self.get_block_number().await?;

        tracing::debug!(
            rpc_url = %self.rpc_url,
            chain_id = chain_id.0,
            block_number,
            "RPC probe succeeded"
        );

        Ok(ProbeReport {
            rpc_url: self.rpc_url.clone(),
            chain_id,
            block_number,
            expected_chain_id,
        })
    }

    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl std::fmt::Debug for RpcProbe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcProbe")
            .field("rpc_url", &self.rpc_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_url_rejected() {
        let result = RpcProbe::new("not a url", 5);
        assert!(matches!(result, Err(BlockchainError::InvalidUrl { .. })));
    }

    #[test]
    fn test_chain_matches() {
        let mut report = ProbeReport {
            rpc_url: "http://localhost:8545".to_string(),
            chain_id: ChainId(14800),
            block_number: 10,
            expected_chain_id: Some(ChainId(14800)),
        };
        assert!(report.chain_matches());

        report.expected_chain_id = Some(ChainId(1480));
        assert!(!report.chain_matches());

        report.expected_chain_id = None;
        assert!(report.chain_matches());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_errors() {
        // Nothing listens on port 1
        let probe = RpcProbe::new("http://127.0.0.1:1", 5).unwrap();
        let result = probe.get_chain_id().await;
        assert!(matches!(
            result,
            Err(BlockchainError::Rpc(_)) | Err(BlockchainError::Timeout(_))
        ));
    }
}
