//! Refiner statistics subsystem.
//!
//! # Data Flow
//! ```text
//! CLI flags + ConfigSource
//!     → credentials.rs (private key, endpoints)
//!     → aggregator.rs
//!         ├─ client.rs (ingestion service, signed GET)
//!         └─ client.rs (execution service, signed GET)
//!     → CombinedStatsResult (stats or error per source)
//!     → report/ (JSON or human-readable)
//! ```
//!
//! # Design Decisions
//! - Signature computed fresh per request from the refiner id
//! - Per-source failures are data, not errors; only credential and
//!   endpoint problems abort
//! - No retries, no caching

pub mod aggregator;
pub mod client;
pub mod credentials;
pub mod error;
pub mod types;

pub use aggregator::StatsAggregator;
pub use client::{StatsClient, SIGNATURE_HEADER};
pub use credentials::{resolve_credentials, CredentialContext, CredentialOverrides};
pub use error::{StatsError, StatsResult};
pub use types::{
    parse_refiner_id, CombinedStatsResult, ErrorRecord, ExecutionStats, IngestionStats,
    SourceStatus, StatsSource, Tally,
};
