//! `stats refiner`: signed dual-source stats lookup.

use clap::Args;

use crate::blockchain::RequestSigner;
use crate::commands::{Console, EXIT_FAILURE, EXIT_SUCCESS};
use crate::config::schema::{
    KEY_QUERY_ENGINE_ENDPOINT, KEY_REFINEMENT_SERVICE_ENDPOINT, KEY_WALLET_PRIVATE_KEY,
};
use crate::config::ConfigSource;
use crate::report::{render, render_json, RenderOptions, TechnicalContext};
use crate::stats::client::build_http_client;
use crate::stats::{
    parse_refiner_id, resolve_credentials, CombinedStatsResult, CredentialContext,
    CredentialOverrides, StatsAggregator, StatsError, StatsResult, StatsSource,
};

/// Arguments of `stats refiner`.
#[derive(Debug, Clone, Default, Args)]
pub struct RefinerStatsArgs {
    /// Refiner ID (non-negative integer)
    #[arg(long)]
    pub id: String,

    /// Wallet private key used to sign the request (hex, 0x optional)
    #[arg(long)]
    pub private_key: Option<String>,

    /// Ingestion (query engine) service base URL
    #[arg(long)]
    pub query_endpoint: Option<String>,

    /// Execution (refinement service) base URL
    #[arg(long)]
    pub refine_endpoint: Option<String>,

    /// Print the combined result as JSON
    #[arg(long)]
    pub json: bool,

    /// Include technical details (block, connectivity, signer)
    #[arg(long)]
    pub verbose: bool,

    /// Append the raw JSON after the human-readable report
    #[arg(long)]
    pub include_raw: bool,
}

impl RefinerStatsArgs {
    fn render_options(&self) -> RenderOptions {
        RenderOptions {
            json: self.json,
            verbose: self.verbose,
            include_raw: self.include_raw,
        }
    }
}

/// Run `stats refiner` and return the exit status.
pub async fn run_refiner_stats(
    args: &RefinerStatsArgs,
    config: &dyn ConfigSource,
    console: &mut Console<'_>,
) -> u8 {
    match refiner_stats(args, config, console).await {
        Ok(()) => EXIT_SUCCESS,
        Err(err) => {
            report_failure(&err, console);
            EXIT_FAILURE
        }
    }
}

async fn refiner_stats(
    args: &RefinerStatsArgs,
    config: &dyn ConfigSource,
    console: &mut Console<'_>,
) -> StatsResult<()> {
    let refiner_id = parse_refiner_id(&args.id)?;

    let credentials = resolve_credentials(
        CredentialOverrides {
            private_key: args.private_key.as_deref(),
            ingestion_endpoint: args.query_endpoint.as_deref(),
            execution_endpoint: args.refine_endpoint.as_deref(),
        },
        config,
    )?;

    let aggregator = StatsAggregator::new(build_http_client()?);
    let result = aggregator
        .aggregate(
            refiner_id,
            &credentials.private_key,
            credentials.ingestion_endpoint.as_deref(),
            credentials.execution_endpoint.as_deref(),
        )
        .await?;

    for source in [StatsSource::Execution, StatsSource::Ingestion] {
        if let Some(err) = result.error_for(source) {
            console.warning(&format!("Failed to fetch {} stats: {}", source, err));
        }
    }

    if result.is_empty() {
        return report_no_data(&result, args, console);
    }

    let context = if args.verbose && !args.json {
        Some(technical_context(&credentials)?)
    } else {
        None
    };

    let text = render(&result, args.render_options(), context.as_ref())
        .map_err(|e| StatsError::Unexpected(e.to_string()))?;
    console.print(&text).map_err(output_error)
}

/// Both sources failed: a warning and a "no data" report, not a failure.
fn report_no_data(
    result: &CombinedStatsResult,
    args: &RefinerStatsArgs,
    console: &mut Console<'_>,
) -> StatsResult<()> {
    console.warning(&format!(
        "No stats found for refiner {}. It may not have processed any data yet, or the services are unreachable.",
        result.refiner_id
    ));

    if args.json {
        let text = render_json(result).map_err(|e| StatsError::Unexpected(e.to_string()))?;
        return console.print(&text).map_err(output_error);
    }
    console
        .print(&format!("No data found for refiner #{}.", result.refiner_id))
        .map_err(output_error)
}

fn technical_context(credentials: &CredentialContext) -> StatsResult<TechnicalContext> {
    let signer = RequestSigner::from_private_key(&credentials.private_key)
        .map_err(|e| StatsError::InvalidCredential(e.to_string()))?;
    Ok(TechnicalContext {
        signer_address: signer.address().to_string(),
        private_key: credentials.private_key.clone(),
        ingestion_endpoint: credentials.ingestion_endpoint.clone(),
        execution_endpoint: credentials.execution_endpoint.clone(),
    })
}

fn output_error(err: std::io::Error) -> StatsError {
    StatsError::Unexpected(format!("failed to write output: {}", err))
}

/// Print `err` with a remediation hint on stderr.
fn report_failure(err: &StatsError, console: &mut Console<'_>) {
    console.error(&err.to_string());
    match err {
        StatsError::Validation(_) => {
            console.hint("Example: refiner-cli stats refiner --id 45");
        }
        StatsError::MissingCredential(_) => {
            console.hint("Pass --private-key <hex>, or store it with:");
            console.hint(&format!(
                "  refiner-cli config set {} <hex>",
                KEY_WALLET_PRIVATE_KEY
            ));
        }
        StatsError::MissingEndpoint => {
            console.hint("Configure at least one stats endpoint:");
            console.hint(&format!(
                "  refiner-cli config set {} <url>",
                KEY_QUERY_ENGINE_ENDPOINT
            ));
            console.hint(&format!(
                "  refiner-cli config set {} <url>",
                KEY_REFINEMENT_SERVICE_ENDPOINT
            ));
            console.hint("or pass --query-endpoint / --refine-endpoint.");
        }
        StatsError::InvalidCredential(_) => {
            console.hint("The private key must be 64 hex characters, with or without a 0x prefix.");
        }
        StatsError::Remote { .. }
        | StatsError::Network(_)
        | StatsError::InvalidResponse(_)
        | StatsError::Unexpected(_) => {
            console.hint("Troubleshooting:");
            console.hint("  1. Check your network connection");
            console.hint("  2. Verify endpoints with: refiner-cli config show");
            console.hint("  3. Re-run with --debug for detailed logs");
        }
    }
}
