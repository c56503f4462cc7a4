//! Request signing with the operator's wallet key.
//!
//! # Security
//! - Keys are accepted with or without the `0x` prefix
//! - Keys are never logged or serialized; `Debug` shows the address only

use alloy::primitives::hex;
use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::Signer;

use crate::blockchain::types::{BlockchainError, BlockchainResult};

/// Signs refiner ids so the stats services can recover the caller's address.
#[derive(Clone)]
pub struct RequestSigner {
    signer: PrivateKeySigner,
}

impl RequestSigner {
    /// Create a signer from a hex-encoded private key string.
    ///
    /// The key is normalized to carry a `0x` prefix before parsing, so both
    /// `ac09...` and `0xac09...` resolve to the same account.
    pub fn from_private_key(private_key_hex: &str) -> BlockchainResult<Self> {
        let normalized = normalize_private_key(private_key_hex);

        let signer: PrivateKeySigner = normalized
            .parse()
            .map_err(|e| BlockchainError::InvalidKey(format!("{}", e)))?;

        tracing::debug!(address = %signer.address(), "Request signer initialized");

        Ok(Self { signer })
    }

    /// Address the backends will recover from our signatures.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Sign the decimal rendering of `refiner_id` with EIP-191 `personal_sign`.
    ///
    /// Returns the 65-byte `r || s || v` signature, `0x`-prefixed hex.
    pub async fn sign_refiner_id(&self, refiner_id: u64) -> BlockchainResult<String> {
        let message = refiner_id.to_string();
        let signature = self
            .signer
            .sign_message(message.as_bytes())
            .await
            .map_err(|e| BlockchainError::Signing(e.to_string()))?;

        Ok(hex::encode_prefixed(signature.as_bytes()))
    }
}

impl std::fmt::Debug for RequestSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestSigner")
            .field("address", &self.signer.address())
            .finish()
    }
}

/// Prepend `0x` unless the key already carries it.
pub fn normalize_private_key(private_key_hex: &str) -> String {
    let trimmed = private_key_hex.trim();
    if trimmed.starts_with("0x") || trimmed.starts_with("0X") {
        format!("0x{}", &trimmed[2..])
    } else {
        format!("0x{}", trimmed)
    }
}
