//! End-to-end runs of `stats refiner` against mock services.

use std::collections::HashMap;

use refiner_cli::commands::stats::{run_refiner_stats, RefinerStatsArgs};
use refiner_cli::commands::{Console, EXIT_FAILURE, EXIT_SUCCESS};
use refiner_cli::config::{ConfigResult, ConfigSource, ConfigStore};

mod common;

#[derive(Default)]
struct MapConfig(HashMap<String, String>);

impl MapConfig {
    fn with(mut self, key: &str, value: &str) -> Self {
        self.0.insert(key.to_string(), value.to_string());
        self
    }
}

impl ConfigSource for MapConfig {
    fn get_config_value(&self, key: &str) -> ConfigResult<Option<String>> {
        Ok(self.0.get(key).cloned())
    }
}

struct Outcome {
    code: u8,
    stdout: String,
    stderr: String,
}

async fn run(args: RefinerStatsArgs, config: &dyn ConfigSource) -> Outcome {
    let mut out = Vec::new();
    let mut err = Vec::new();
    let code = {
        let mut console = Console::new(&mut out, &mut err);
        run_refiner_stats(&args, config, &mut console).await
    };
    Outcome {
        code,
        stdout: String::from_utf8(out).unwrap(),
        stderr: String::from_utf8(err).unwrap(),
    }
}

fn args(id: &str) -> RefinerStatsArgs {
    RefinerStatsArgs {
        id: id.to_string(),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_json_output_with_both_sources() {
    let ingestion = common::start_stats_service(200, common::ingestion_body(45)).await;
    let execution = common::start_stats_service(200, common::execution_body(45)).await;
    let config = MapConfig::default()
        .with("wallet_private_key", common::TEST_PRIVATE_KEY)
        .with("query_engine_endpoint", &ingestion.base_url)
        .with("refinement_service_endpoint", &execution.base_url);

    let outcome = run(
        RefinerStatsArgs {
            json: true,
            include_raw: true,
            ..args("45")
        },
        &config,
    )
    .await;

    assert_eq!(outcome.code, EXIT_SUCCESS);
    assert!(outcome.stderr.is_empty(), "stderr: {}", outcome.stderr);

    let value: serde_json::Value = serde_json::from_str(&outcome.stdout).unwrap();
    let mut keys: Vec<&str> = value.as_object().unwrap().keys().map(|k| k.as_str()).collect();
    keys.sort();
    assert_eq!(keys, vec!["execution_stats", "ingestion_stats", "refiner_id"]);
    assert_eq!(value["refiner_id"], 45);
    assert_eq!(value["ingestion_stats"]["total_file_contributions"], 234);
    assert_eq!(value["ingestion_stats"]["total_data_rows"], 15420);
    assert_eq!(value["execution_stats"]["total_jobs"], 150);
    assert_eq!(value["execution_stats"]["successful_jobs"], 142);
    assert_eq!(value["execution_stats"]["success_rate"], 0.9466666666666667);
}

#[tokio::test]
async fn test_human_report_with_partial_failure() {
    let ingestion = common::start_stats_service(200, common::ingestion_body(45)).await;
    let execution = common::start_stats_service(502, "").await;
    let config = MapConfig::default().with("wallet_private_key", common::TEST_PRIVATE_KEY);

    let outcome = run(
        RefinerStatsArgs {
            query_endpoint: Some(ingestion.base_url.clone()),
            refine_endpoint: Some(execution.base_url.clone()),
            verbose: true,
            ..args("45")
        },
        &config,
    )
    .await;

    assert_eq!(outcome.code, EXIT_SUCCESS);
    assert!(outcome
        .stderr
        .contains("Warning: Failed to fetch execution stats: HTTP 502: Bad Gateway"));
    assert!(outcome.stdout.contains("Refiner #45 Statistics"));
    assert!(outcome.stdout.contains("Unavailable: HTTP 502: Bad Gateway"));
    assert!(outcome.stdout.contains("15,420"));
    assert!(outcome.stdout.contains("Technical Details"));
    assert!(outcome.stdout.contains("ac0974...ff80") || outcome.stdout.contains("0xac09...ff80"));
    assert!(!outcome.stdout.contains(common::TEST_PRIVATE_KEY));
}

#[tokio::test]
async fn test_json_partial_failure_records_error() {
    let ingestion = common::start_stats_service(200, common::ingestion_body(45)).await;
    let execution = common::start_stats_service(500, r#"{"detail": "job store offline"}"#).await;

    let outcome = run(
        RefinerStatsArgs {
            private_key: Some(common::TEST_PRIVATE_KEY.to_string()),
            query_endpoint: Some(ingestion.base_url.clone()),
            refine_endpoint: Some(execution.base_url.clone()),
            json: true,
            ..args("45")
        },
        &MapConfig::default(),
    )
    .await;

    assert_eq!(outcome.code, EXIT_SUCCESS);
    let value: serde_json::Value = serde_json::from_str(&outcome.stdout).unwrap();
    assert!(value.get("ingestion_stats").is_some());
    assert!(value.get("execution_stats").is_none());
    assert_eq!(value["execution_error"], "job store offline");
    // Diagnostics stay out of the JSON payload
    assert!(outcome.stderr.contains("job store offline"));
}

#[tokio::test]
async fn test_both_fail_reports_no_data() {
    let ingestion = common::start_stats_service(404, r#"{"detail": "Refiner 7 not found"}"#).await;
    let execution_url = common::closed_endpoint().await;

    let outcome = run(
        RefinerStatsArgs {
            private_key: Some(common::TEST_PRIVATE_KEY.to_string()),
            query_endpoint: Some(ingestion.base_url.clone()),
            refine_endpoint: Some(execution_url),
            ..args("7")
        },
        &MapConfig::default(),
    )
    .await;

    assert_eq!(outcome.code, EXIT_SUCCESS);
    assert!(outcome.stderr.contains("Warning: No stats found for refiner 7"));
    assert!(outcome.stderr.contains("Refiner 7 not found"));
    assert!(!outcome.stderr.lines().any(|l| l.starts_with("Error:")));
    assert_eq!(outcome.stdout, "No data found for refiner #7.\n");
}

#[tokio::test]
async fn test_no_endpoints_fails_fast() {
    let config = MapConfig::default().with("wallet_private_key", common::TEST_PRIVATE_KEY);

    let outcome = run(args("7"), &config).await;

    assert_eq!(outcome.code, EXIT_FAILURE);
    assert!(outcome.stdout.is_empty());
    assert!(outcome.stderr.contains("No stats endpoint configured"));
    assert!(outcome
        .stderr
        .contains("refiner-cli config set query_engine_endpoint <url>"));
    assert!(outcome
        .stderr
        .contains("refiner-cli config set refinement_service_endpoint <url>"));
}

#[tokio::test]
async fn test_missing_private_key() {
    let ingestion = common::start_stats_service(200, common::ingestion_body(1)).await;

    let outcome = run(
        RefinerStatsArgs {
            query_endpoint: Some(ingestion.base_url.clone()),
            ..args("1")
        },
        &MapConfig::default(),
    )
    .await;

    assert_eq!(outcome.code, EXIT_FAILURE);
    assert!(outcome.stderr.contains("Missing credential: wallet_private_key"));
    assert!(outcome.stderr.contains("config set wallet_private_key"));
    assert_eq!(ingestion.calls(), 0);
}

#[tokio::test]
async fn test_invalid_ids_rejected_before_fetch() {
    let ingestion = common::start_stats_service(200, common::ingestion_body(1)).await;
    let config = MapConfig::default()
        .with("wallet_private_key", common::TEST_PRIVATE_KEY)
        .with("query_engine_endpoint", &ingestion.base_url);

    for bad in ["abc", "-1", ""] {
        let outcome = run(args(bad), &config).await;
        assert_eq!(outcome.code, EXIT_FAILURE, "id {:?}", bad);
        assert!(outcome.stderr.contains("Invalid refiner ID"));
    }
    assert_eq!(ingestion.calls(), 0);
}

#[tokio::test]
async fn test_malformed_key_is_invalid_credential() {
    let ingestion = common::start_stats_service(200, common::ingestion_body(1)).await;

    let outcome = run(
        RefinerStatsArgs {
            private_key: Some("0xnothex".to_string()),
            query_endpoint: Some(ingestion.base_url.clone()),
            ..args("1")
        },
        &MapConfig::default(),
    )
    .await;

    assert_eq!(outcome.code, EXIT_FAILURE);
    assert!(outcome.stderr.contains("Invalid private key"));
    assert_eq!(ingestion.calls(), 0);
}

#[tokio::test]
async fn test_reads_real_config_file() {
    let ingestion = common::start_stats_service(200, common::ingestion_body(12)).await;
    let dir = tempfile::tempdir().unwrap();
    let mut store = ConfigStore::open(dir.path().join("config.toml")).unwrap();
    store
        .set_config_value("wallet_private_key", common::TEST_PRIVATE_KEY)
        .unwrap();
    store
        .set_config_value("query_engine_endpoint", &ingestion.base_url)
        .unwrap();
    store.save().unwrap();

    let store = ConfigStore::open(dir.path().join("config.toml")).unwrap();
    let outcome = run(args("12"), &store).await;

    assert_eq!(outcome.code, EXIT_SUCCESS);
    assert_eq!(ingestion.calls(), 1);
    assert!(outcome.stdout.contains("No execution data (refinement_service_endpoint not configured)"));
}
