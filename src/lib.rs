//! Refiner stats CLI library.

pub mod blockchain;
pub mod commands;
pub mod config;
pub mod observability;
pub mod report;
pub mod stats;

pub use config::{ConfigSource, ConfigStore};
pub use stats::{CombinedStatsResult, StatsAggregator, StatsError};
