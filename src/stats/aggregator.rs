//! Dual-source aggregation.
//!
//! Both configured sources are fetched concurrently and always run to
//! completion; a failure in one never changes the other's outcome.

use crate::blockchain::wallet::RequestSigner;
use crate::stats::client::StatsClient;
use crate::stats::error::{StatsError, StatsResult};
use crate::stats::types::{CombinedStatsResult, StatsSource};

/// Fetches both sources for a refiner and merges the outcomes.
#[derive(Debug, Clone)]
pub struct StatsAggregator {
    http: reqwest::Client,
}

impl StatsAggregator {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// Query every configured endpoint and merge the outcomes.
    ///
    /// Per-source fetch failures are recorded in the result, not returned.
    /// Errors only for an unusable private key, a signing failure, or when no
    /// endpoint is given.
    pub async fn aggregate(
        &self,
        refiner_id: u64,
        private_key: &str,
        ingestion_endpoint: Option<&str>,
        execution_endpoint: Option<&str>,
    ) -> StatsResult<CombinedStatsResult> {
        if ingestion_endpoint.is_none() && execution_endpoint.is_none() {
            return Err(StatsError::MissingEndpoint);
        }

        let signer = RequestSigner::from_private_key(private_key)
            .map_err(|e| StatsError::InvalidCredential(e.to_string()))?;

        let ingestion = async {
            match ingestion_endpoint {
                Some(url) => {
                    let client = StatsClient::new(self.http.clone(), url, StatsSource::Ingestion);
                    Some(client.fetch_ingestion(refiner_id, &signer).await)
                }
                None => None,
            }
        };
        let execution = async {
            match execution_endpoint {
                Some(url) => {
                    let client = StatsClient::new(self.http.clone(), url, StatsSource::Execution);
                    Some(client.fetch_execution(refiner_id, &signer).await)
                }
                None => None,
            }
        };

        let (ingestion, execution) = tokio::join!(ingestion, execution);

        let mut result = CombinedStatsResult::new(refiner_id);
        if let Some(outcome) = ingestion {
            result.record_ingestion(settle(StatsSource::Ingestion, refiner_id, outcome)?);
        }
        if let Some(outcome) = execution {
            result.record_execution(settle(StatsSource::Execution, refiner_id, outcome)?);
        }

        Ok(result)
    }
}

/// Keep a source's outcome for the result, or abort the whole run.
///
/// Fetch failures stay with their source; anything else (a signing or
/// client-setup error) is not specific to one service and is returned.
fn settle<T>(
    source: StatsSource,
    refiner_id: u64,
    outcome: StatsResult<T>,
) -> StatsResult<StatsResult<T>> {
    match outcome {
        Ok(stats) => {
            tracing::debug!(%source, refiner_id, "Stats fetched");
            Ok(Ok(stats))
        }
        Err(e) if e.is_fetch_failure() => {
            tracing::debug!(%source, refiner_id, error = %e, "Stats fetch failed");
            Ok(Err(e))
        }
        Err(e) => Err(e),
    }
}
