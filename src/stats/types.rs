//! Statistics snapshots returned by the two stats services.
//!
//! Field names mirror the services' JSON. Every struct is `#[serde(default)]`
//! so a response missing fields still decodes, and `null` scalars decode to
//! their defaults; no further schema checks run. Fields beyond the known set
//! are kept in `extra` and serialized back unchanged.

use std::fmt;

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::stats::error::StatsError;

/// Name → count mapping that keeps the order the service sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tally(Vec<(String, u64)>);

impl Tally {
    pub fn insert(&mut self, name: impl Into<String>, count: u64) {
        self.0.push((name.into(), count));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entries in encounter order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(name, count)| (name.as_str(), *count))
    }

    /// Entries by descending count. Ties keep encounter order (stable sort).
    pub fn sorted_by_count(&self) -> Vec<(&str, u64)> {
        let mut entries: Vec<(&str, u64)> = self.iter().collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        entries
    }

    pub fn total(&self) -> u64 {
        self.0.iter().map(|(_, count)| count).sum()
    }
}

impl<S: Into<String>> FromIterator<(S, u64)> for Tally {
    fn from_iter<I: IntoIterator<Item = (S, u64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(name, count)| (name.into(), count)).collect())
    }
}

impl Serialize for Tally {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, count) in &self.0 {
            map.serialize_entry(name, count)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Tally {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TallyVisitor;

        impl<'de> Visitor<'de> for TallyVisitor {
            type Value = Tally;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of names to non-negative counts")
            }

            fn visit_unit<E: serde::de::Error>(self) -> Result<Tally, E> {
                Ok(Tally::default())
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Tally, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((name, count)) = access.next_entry::<String, Count>()? {
                    entries.push((name, count.0));
                }
                Ok(Tally(entries))
            }
        }

        deserializer.deserialize_any(TallyVisitor)
    }
}

/// A non-negative count as the services send it: an integer, an integral
/// float such as `3.0`, or `null` (read as zero).
#[derive(Debug, Clone, Copy)]
struct Count(u64);

impl<'de> Deserialize<'de> for Count {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CountVisitor;

        impl<'de> Visitor<'de> for CountVisitor {
            type Value = Count;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a non-negative integer count or null")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Count, E> {
                Ok(Count(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Count, E> {
                u64::try_from(v)
                    .map(Count)
                    .map_err(|_| E::invalid_value(de::Unexpected::Signed(v), &self))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Count, E> {
                if v.is_finite() && v >= 0.0 && v.fract() == 0.0 && v <= u64::MAX as f64 {
                    Ok(Count(v as u64))
                } else {
                    Err(E::invalid_value(de::Unexpected::Float(v), &self))
                }
            }

            fn visit_unit<E: de::Error>(self) -> Result<Count, E> {
                Ok(Count(0))
            }

            fn visit_none<E: de::Error>(self) -> Result<Count, E> {
                Ok(Count(0))
            }
        }

        deserializer.deserialize_any(CountVisitor)
    }
}

fn count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    Count::deserialize(deserializer).map(|c| c.0)
}

fn optional_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
    Option::<Count>::deserialize(deserializer).map(|c| c.map(|c| c.0))
}

/// `null` decodes to `T::default()`.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Snapshot from the ingestion (query engine) service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestionStats {
    #[serde(deserialize_with = "count")]
    pub refiner_id: u64,
    #[serde(deserialize_with = "count")]
    pub total_file_contributions: u64,
    #[serde(deserialize_with = "count")]
    pub total_data_rows: u64,
    pub first_ingestion_at: Option<String>,
    pub last_ingestion_at: Option<String>,
    #[serde(deserialize_with = "count")]
    pub total_queries_executed: u64,
    #[serde(deserialize_with = "count")]
    pub successful_queries: u64,
    #[serde(deserialize_with = "count")]
    pub failed_queries: u64,
    /// Query error type → occurrences.
    pub query_error_types: Tally,
    #[serde(deserialize_with = "null_as_default")]
    pub average_ingestion_rate_per_hour: f64,
    pub ingestion_period_days: Option<f64>,
    #[serde(deserialize_with = "count")]
    pub unique_contributors: u64,
    /// Table name → row count.
    pub table_row_counts: Tally,
    #[serde(deserialize_with = "optional_count")]
    pub last_processed_block: Option<u64>,
    /// Fields the service sent that are not listed above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One failed job, as listed in `recent_errors` (most recent first).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ErrorRecord {
    #[serde(deserialize_with = "null_as_default")]
    pub error: String,
    #[serde(deserialize_with = "null_as_default")]
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
}

/// Snapshot from the execution (refinement service) backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionStats {
    #[serde(deserialize_with = "count")]
    pub refiner_id: u64,
    #[serde(deserialize_with = "count")]
    pub total_jobs: u64,
    #[serde(deserialize_with = "count")]
    pub successful_jobs: u64,
    #[serde(deserialize_with = "count")]
    pub failed_jobs: u64,
    #[serde(deserialize_with = "count")]
    pub processing_jobs: u64,
    #[serde(deserialize_with = "count")]
    pub submitted_jobs: u64,
    pub first_job_at: Option<String>,
    pub last_job_at: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub average_processing_time_seconds: f64,
    /// Fraction in [0, 1].
    #[serde(deserialize_with = "null_as_default")]
    pub success_rate: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub jobs_per_hour: f64,
    pub processing_period_days: Option<f64>,
    /// Job error type → occurrences.
    pub error_types: Tally,
    #[serde(deserialize_with = "null_as_default")]
    pub recent_errors: Vec<ErrorRecord>,
    /// Fields the service sent that are not listed above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Which backend a result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatsSource {
    Ingestion,
    Execution,
}

impl StatsSource {
    /// Human label used in warnings and reports.
    pub fn label(&self) -> &'static str {
        match self {
            StatsSource::Ingestion => "ingestion",
            StatsSource::Execution => "execution",
        }
    }

    /// Config key holding this source's base URL.
    pub fn config_key(&self) -> &'static str {
        match self {
            StatsSource::Ingestion => crate::config::schema::KEY_QUERY_ENGINE_ENDPOINT,
            StatsSource::Execution => crate::config::schema::KEY_REFINEMENT_SERVICE_ENDPOINT,
        }
    }
}

impl fmt::Display for StatsSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Both sources' outcomes for one refiner.
///
/// Per source at most one of `*_stats` / `*_error` is set; neither means the
/// source was not configured.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CombinedStatsResult {
    pub refiner_id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingestion_stats: Option<IngestionStats>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_stats: Option<ExecutionStats>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingestion_error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_error: Option<String>,
}

impl CombinedStatsResult {
    pub fn new(refiner_id: u64) -> Self {
        Self {
            refiner_id,
            ..Self::default()
        }
    }

    pub fn record_ingestion(&mut self, outcome: Result<IngestionStats, StatsError>) {
        match outcome {
            Ok(stats) => {
                self.ingestion_stats = Some(stats);
                self.ingestion_error = None;
            }
            Err(err) => {
                self.ingestion_stats = None;
                self.ingestion_error = Some(err.to_string());
            }
        }
    }

    pub fn record_execution(&mut self, outcome: Result<ExecutionStats, StatsError>) {
        match outcome {
            Ok(stats) => {
                self.execution_stats = Some(stats);
                self.execution_error = None;
            }
            Err(err) => {
                self.execution_stats = None;
                self.execution_error = Some(err.to_string());
            }
        }
    }

    /// True when neither source produced statistics.
    pub fn is_empty(&self) -> bool {
        self.ingestion_stats.is_none() && self.execution_stats.is_none()
    }

    /// Recorded failure for `source`, if any.
    pub fn error_for(&self, source: StatsSource) -> Option<&str> {
        match source {
            StatsSource::Ingestion => self.ingestion_error.as_deref(),
            StatsSource::Execution => self.execution_error.as_deref(),
        }
    }

    /// Connectivity of `source` as seen by this run.
    pub fn status_of(&self, source: StatsSource) -> SourceStatus<'_> {
        let has_stats = match source {
            StatsSource::Ingestion => self.ingestion_stats.is_some(),
            StatsSource::Execution => self.execution_stats.is_some(),
        };
        match (has_stats, self.error_for(source)) {
            (true, _) => SourceStatus::Connected,
            (false, Some(err)) => SourceStatus::Failed(err),
            (false, None) => SourceStatus::NotConfigured,
        }
    }
}

/// Outcome of one source in a [`CombinedStatsResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceStatus<'a> {
    Connected,
    Failed(&'a str),
    NotConfigured,
}

/// Parse a refiner id given on the command line.
///
/// Only plain decimal digits are accepted: no sign, no separators, no blanks.
pub fn parse_refiner_id(raw: &str) -> Result<u64, StatsError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(StatsError::Validation(raw.to_string()));
    }
    trimmed
        .parse::<u64>()
        .map_err(|_| StatsError::Validation(raw.to_string()))
}
