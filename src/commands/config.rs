//! `config`: inspect and edit the config file.

use clap::Subcommand;
use serde_json::{Map, Value};

use crate::commands::{Console, EXIT_FAILURE, EXIT_SUCCESS};
use crate::config::schema::{KEY_NETWORK, KEY_RPC_ENDPOINT, KEY_WALLET_PRIVATE_KEY};
use crate::config::{ConfigError, ConfigSource, ConfigStore, NetworkInfo};
use crate::report::mask_secret;

#[derive(Debug, Clone, Subcommand)]
pub enum ConfigCommand {
    /// Show every config value (private key masked)
    Show {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print one config value
    Get { key: String },
    /// Validate and store a config value
    Set { key: String, value: String },
    /// Remove a config value
    Unset { key: String },
    /// Print the config file location
    Path,
    /// Show or select the network
    Network { name: Option<String> },
}

/// Run a `config` subcommand against `store` and return the exit status.
pub fn run_config(command: &ConfigCommand, store: &mut ConfigStore, console: &mut Console<'_>) -> u8 {
    match config(command, store, console) {
        Ok(()) => EXIT_SUCCESS,
        Err(err) => {
            report_failure(&err, console);
            EXIT_FAILURE
        }
    }
}

fn config(
    command: &ConfigCommand,
    store: &mut ConfigStore,
    console: &mut Console<'_>,
) -> Result<(), CommandError> {
    match command {
        ConfigCommand::Show { json } => {
            let text = if *json { show_json(store)? } else { show_text(store) };
            console.print(&text)?;
        }
        ConfigCommand::Get { key } => match store.get_config_value(key)? {
            Some(value) => console.print(&display_value(key, &value))?,
            None => return Err(CommandError::NotSet(key.clone())),
        },
        ConfigCommand::Set { key, value } => {
            store.set_config_value(key, value)?;
            store.save()?;
            let stored = store.get_config_value(key)?.unwrap_or_default();
            console.print(&format!("Set {} = {}", key, display_value(key, &stored)))?;
        }
        ConfigCommand::Unset { key } => {
            if store.unset_config_value(key)? {
                store.save()?;
                console.print(&format!("Unset {}", key))?;
            } else {
                console.warning(&format!("{} was not set", key));
            }
        }
        ConfigCommand::Path => {
            console.print(&store.path().display().to_string())?;
        }
        ConfigCommand::Network { name } => {
            if let Some(name) = name {
                store.set_config_value(KEY_NETWORK, name)?;
                store.save()?;
            }
            let network = store.selected_network()?;
            console.print(&describe_network(network, store))?;
        }
    }
    Ok(())
}

fn display_value(key: &str, value: &str) -> String {
    if key == KEY_WALLET_PRIVATE_KEY {
        mask_secret(value)
    } else {
        value.to_string()
    }
}

fn show_text(store: &ConfigStore) -> String {
    let mut lines = vec![format!("# {}", store.path().display())];
    for (key, value) in store.entries() {
        let rendered = match value {
            Some(value) => display_value(key, &value),
            None => "<not set>".to_string(),
        };
        let suffix = if key == KEY_RPC_ENDPOINT && store.config().rpc_endpoint.is_none() {
            " (network default)"
        } else {
            ""
        };
        lines.push(format!("{:<28} {}{}", key, rendered, suffix));
    }
    lines.join("\n")
}

fn show_json(store: &ConfigStore) -> Result<String, CommandError> {
    let mut object = Map::new();
    for (key, value) in store.entries() {
        let value = value
            .map(|v| Value::String(display_value(key, &v)))
            .unwrap_or(Value::Null);
        object.insert(key.to_string(), value);
    }
    Ok(serde_json::to_string_pretty(&Value::Object(object))?)
}

fn describe_network(network: &NetworkInfo, store: &ConfigStore) -> String {
    let rpc = store
        .get_config_value(KEY_RPC_ENDPOINT)
        .ok()
        .flatten()
        .unwrap_or_else(|| network.rpc_url.to_string());
    format!(
        "Network: {} (chain id {})\nRPC endpoint: {}",
        network.name, network.chain_id, rpc
    )
}

#[derive(Debug, thiserror::Error)]
enum CommandError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("{0} is not set")]
    NotSet(String),

    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),

    #[error("failed to serialize config: {0}")]
    Json(#[from] serde_json::Error),
}

fn report_failure(err: &CommandError, console: &mut Console<'_>) {
    console.error(&err.to_string());
    match err {
        CommandError::NotSet(key) => {
            console.hint(&format!("Set it with: refiner-cli config set {} <value>", key));
        }
        CommandError::Config(ConfigError::Parse { path, .. }) => {
            console.hint(&format!("Fix or remove {} and try again.", path.display()));
        }
        CommandError::Config(ConfigError::UnknownNetwork(_)) => {
            console.hint("Select a known network with: refiner-cli config network <name>");
        }
        _ => {}
    }
}
