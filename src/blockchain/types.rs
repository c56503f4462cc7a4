//! Chain-specific types and error definitions.

use thiserror::Error;

/// Chain ID type for strong typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainId(pub u64);

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<ChainId> for u64 {
    fn from(id: ChainId) -> Self {
        id.0
    }
}

impl std::fmt::Display for ChainId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Errors that can occur during key handling and RPC probing.
#[derive(Debug, Error)]
pub enum BlockchainError {
    /// RPC connection or request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// RPC request timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// RPC endpoint is not a usable URL.
    #[error("Invalid RPC URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Invalid private key format.
    #[error("Invalid private key format: {0}")]
    InvalidKey(String),

    /// Signer rejected the message.
    #[error("Message signing failed: {0}")]
    Signing(String),
}

/// Result type for blockchain operations.
pub type BlockchainResult<T> = Result<T, BlockchainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_id_conversion() {
        let chain_id = ChainId::from(14800u64);
        assert_eq!(chain_id.0, 14800);
        assert_eq!(u64::from(chain_id), 14800);
        assert_eq!(chain_id.to_string(), "14800");
    }

    #[test]
    fn test_error_display() {
        let err = BlockchainError::Timeout(10);
        assert_eq!(err.to_string(), "RPC timeout after 10 seconds");

        let err = BlockchainError::InvalidUrl {
            url: "nope".to_string(),
            reason: "relative URL without a base".to_string(),
        };
        assert!(err.to_string().contains("'nope'"));
    }
}
