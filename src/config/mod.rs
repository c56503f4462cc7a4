//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! --config flag / REFINER_CLI_CONFIG / ~/.refiner-cli/config.toml
//!     → loader.rs (ConfigStore::open, parse & deserialize)
//!     → schema.rs (CliConfig, all fields optional)
//!     → passed by reference to command handlers
//!
//! config set <key> <value>:
//!     → validation.rs (key and value checks)
//!     → ConfigStore::save (pretty TOML, 0600 on unix)
//! ```
//!
//! # Design Decisions
//! - One store per process, built in main and passed explicitly
//! - Stats code sees configuration only through the `ConfigSource` trait
//! - Lookup failures are reported, callers decide whether they are fatal

pub mod loader;
pub mod networks;
pub mod schema;
pub mod validation;

pub use loader::{
    resolve_config_path, ConfigError, ConfigResult, ConfigSource, ConfigStore,
    UnavailableConfig,
};
pub use networks::{find_network, NetworkInfo};
pub use schema::CliConfig;
