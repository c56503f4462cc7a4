//! JSON rendering of a combined result.

use crate::stats::CombinedStatsResult;

/// Pretty-printed JSON of the whole result, error strings included.
pub fn render_json(result: &CombinedStatsResult) -> serde_json::Result<String> {
    serde_json::to_string_pretty(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::{ExecutionStats, IngestionStats, StatsError};

    #[test]
    fn test_round_trip_preserves_fields() {
        let mut result = CombinedStatsResult::new(45);
        result.record_ingestion(Ok(IngestionStats {
            refiner_id: 45,
            total_file_contributions: 234,
            total_data_rows: 15420,
            average_ingestion_rate_per_hour: 12.125,
            query_error_types: [("SyntaxError", 4), ("Timeout", 9)].into_iter().collect(),
            ..Default::default()
        }));
        result.record_execution(Ok(ExecutionStats {
            refiner_id: 45,
            total_jobs: 150,
            successful_jobs: 142,
            success_rate: 0.9466666666666667,
            ..Default::default()
        }));

        let text = render_json(&result).unwrap();
        let parsed: CombinedStatsResult = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, result);
        assert!(text.contains("\"refiner_id\": 45"));
        assert!(text.contains("0.9466666666666667"));
    }

    #[test]
    fn test_errors_serialized_verbatim() {
        let mut result = CombinedStatsResult::new(3);
        result.record_ingestion(Err(StatsError::Remote {
            status: 404,
            message: "Refiner 3 not found".to_string(),
        }));

        let value: serde_json::Value = serde_json::from_str(&render_json(&result).unwrap()).unwrap();
        assert_eq!(value["ingestion_error"], "Refiner 3 not found");
        assert!(value.get("execution_error").is_none());
        assert!(value.get("ingestion_stats").is_none());
    }
}
