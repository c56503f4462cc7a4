//! Shared utilities for integration tests.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;

/// Well-known test private key (Anvil's first account).
#[allow(dead_code)]
pub const TEST_PRIVATE_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

/// Address of [`TEST_PRIVATE_KEY`].
#[allow(dead_code)]
pub const TEST_ADDRESS: &str = "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266";

/// A request seen by a mock stats service.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub refiner_id: String,
    pub signature: Option<String>,
    pub content_type: Option<String>,
}

#[derive(Clone)]
struct MockState {
    status: u16,
    body: String,
    calls: Arc<AtomicU32>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

/// Handle to a running mock stats service.
pub struct MockStatsService {
    pub base_url: String,
    calls: Arc<AtomicU32>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

#[allow(dead_code)]
impl MockStatsService {
    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

async fn stats_handler(
    State(state): State<MockState>,
    Path(refiner_id): Path<String>,
    headers: HeaderMap,
) -> (StatusCode, String) {
    state.calls.fetch_add(1, Ordering::SeqCst);
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    state.requests.lock().unwrap().push(RecordedRequest {
        refiner_id,
        signature: header("x-refiner-signature"),
        content_type: header("content-type"),
    });

    let status = StatusCode::from_u16(state.status).unwrap_or(StatusCode::OK);
    (status, state.body.clone())
}

/// Start a mock stats service on an ephemeral port that answers every
/// `GET /stats/refiner/{id}` with `status` and `body`.
pub async fn start_stats_service(status: u16, body: impl Into<String>) -> MockStatsService {
    let calls = Arc::new(AtomicU32::new(0));
    let requests = Arc::new(Mutex::new(Vec::new()));
    let state = MockState {
        status,
        body: body.into(),
        calls: calls.clone(),
        requests: requests.clone(),
    };

    let app = Router::new()
        .route("/stats/refiner/{id}", get(stats_handler))
        .with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockStatsService {
        base_url: format!("http://{}", addr),
        calls,
        requests,
    }
}

/// A base URL nothing listens on.
#[allow(dead_code)]
pub async fn closed_endpoint() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

#[allow(dead_code)]
pub fn ingestion_body(refiner_id: u64) -> String {
    serde_json::json!({
        "refiner_id": refiner_id,
        "total_file_contributions": 234,
        "total_data_rows": 15420,
        "first_ingestion_at": "2024-04-01T08:00:00Z",
        "last_ingestion_at": "2024-05-01T08:00:00Z",
        "total_queries_executed": 40,
        "successful_queries": 36,
        "failed_queries": 4,
        "query_error_types": {"SyntaxError": 1, "Timeout": 3},
        "average_ingestion_rate_per_hour": 0.325,
        "ingestion_period_days": 30.0,
        "unique_contributors": 57,
        "table_row_counts": {"users": 15000, "posts": 420},
        "last_processed_block": 1234567
    })
    .to_string()
}

#[allow(dead_code)]
pub fn execution_body(refiner_id: u64) -> String {
    serde_json::json!({
        "refiner_id": refiner_id,
        "total_jobs": 150,
        "successful_jobs": 142,
        "failed_jobs": 5,
        "processing_jobs": 2,
        "submitted_jobs": 1,
        "first_job_at": "2024-04-01T08:00:00Z",
        "last_job_at": "2024-05-01T08:00:00Z",
        "average_processing_time_seconds": 12.5,
        "success_rate": 0.9466666666666667,
        "jobs_per_hour": 0.2,
        "processing_period_days": 30.0,
        "error_types": {"ValidationError": 2, "Timeout": 3},
        "recent_errors": [
            {"error": "Timeout", "timestamp": "2024-05-01T07:00:00Z", "job_id": "job-9"},
            {"error": "ValidationError", "timestamp": "2024-04-30T07:00:00Z"}
        ]
    })
    .to_string()
}
