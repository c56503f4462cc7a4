//! Account identity and chain connectivity.
//!
//! # Data Flow
//! ```text
//! wallet_private_key (flag or config file)
//!     → wallet.rs (key parsing, address derivation, EIP-191 signing)
//!     → X-Refiner-Signature header on stats requests
//!
//! rpc_endpoint (flag, config file or network default)
//!     → client.rs (chain id / block number probe with timeout)
//! ```
//!
//! # Security Constraints
//! - Private keys are never logged or serialized
//! - Only the derived public address may appear in output

pub mod client;
pub mod types;
pub mod wallet;

pub use client::RpcProbe;
pub use types::{BlockchainError, BlockchainResult, ChainId};
pub use wallet::RequestSigner;
