//! Refiner stats CLI.
//!
//! # Architecture Overview
//!
//! ```text
//!   argv ──▶ clap ──▶ commands::stats ──▶ stats::credentials ──▶ stats::aggregator
//!                 │                                                 │        │
//!                 │                        signed GET (ingestion) ◀─┘        └─▶ signed GET (execution)
//!                 │                                                 │
//!                 │                               report (human / JSON) ──▶ stdout
//!                 │
//!                 ├──▶ commands::config  ──▶ config::ConfigStore (TOML file)
//!                 └──▶ commands::network ──▶ blockchain::RpcProbe (JSON-RPC)
//!
//!   diagnostics, warnings and tracing output ──▶ stderr
//! ```

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use refiner_cli::commands::config::{run_config, ConfigCommand};
use refiner_cli::commands::network::{run_network, NetworkCommand};
use refiner_cli::commands::stats::{run_refiner_stats, RefinerStatsArgs};
use refiner_cli::commands::{Console, EXIT_FAILURE};
use refiner_cli::config::{resolve_config_path, ConfigStore, UnavailableConfig};
use refiner_cli::observability::init_logging;

#[derive(Parser)]
#[command(name = "refiner-cli")]
#[command(version, about = "Query refiner statistics and manage CLI configuration", long_about = None)]
struct Cli {
    /// Config file (default: ~/.refiner-cli/config.toml, or $REFINER_CLI_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging on stderr
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Query statistics
    Stats {
        #[command(subcommand)]
        command: StatsCommand,
    },
    /// Manage configuration (network, endpoints, wallet key)
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
    /// Inspect the configured chain
    Network {
        #[command(subcommand)]
        command: NetworkCommand,
    },
}

#[derive(Subcommand)]
enum StatsCommand {
    /// Show ingestion and execution statistics for a refiner
    Refiner(RefinerStatsArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.debug);

    let mut stdout = io::stdout();
    let mut stderr = io::stderr();
    let mut console = Console::new(&mut stdout, &mut stderr);

    let path = match resolve_config_path(cli.config.as_deref()) {
        Ok(path) => Some(path),
        Err(e) => {
            tracing::debug!(error = %e, "Config path unavailable");
            None
        }
    };

    let code = match cli.command {
        Commands::Stats {
            command: StatsCommand::Refiner(args),
        } => {
            let store = path.as_ref().map(|p| ConfigStore::open(p));
            match store {
                Some(Ok(store)) => run_refiner_stats(&args, &store, &mut console).await,
                Some(Err(e)) => {
                    console.warning(&format!("Ignoring config file: {}", e));
                    let fallback = UnavailableConfig::new(e.to_string());
                    run_refiner_stats(&args, &fallback, &mut console).await
                }
                None => {
                    let fallback = UnavailableConfig::new("no config file location");
                    run_refiner_stats(&args, &fallback, &mut console).await
                }
            }
        }
        Commands::Config { command } => match open_store(path, &mut console) {
            Some(mut store) => run_config(&command, &mut store, &mut console),
            None => EXIT_FAILURE,
        },
        Commands::Network { command } => match open_store(path, &mut console) {
            Some(store) => run_network(&command, &store, &mut console).await,
            None => EXIT_FAILURE,
        },
    };

    ExitCode::from(code)
}

fn open_store(path: Option<PathBuf>, console: &mut Console<'_>) -> Option<ConfigStore> {
    let Some(path) = path else {
        console.error("Could not determine home directory");
        console.hint("Pass --config <path> or set REFINER_CLI_CONFIG.");
        return None;
    };
    match ConfigStore::open(&path) {
        Ok(store) => Some(store),
        Err(e) => {
            console.error(&e.to_string());
            None
        }
    }
}
