//! Signed HTTP fetch against a stats service.
//!
//! Both services expose `GET {base}/stats/refiner/{id}` and authenticate the
//! caller through `X-Refiner-Signature`; they differ only in the JSON body, so
//! one client type is instantiated per source and decodes into the caller's
//! chosen statistics type.

use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::blockchain::wallet::RequestSigner;
use crate::stats::error::{error_chain, StatsError, StatsResult};
use crate::stats::types::{ExecutionStats, IngestionStats, StatsSource};

/// Header carrying the EIP-191 signature over the refiner id.
pub const SIGNATURE_HEADER: &str = "X-Refiner-Signature";

/// Build the shared HTTP client used for one command run.
pub fn build_http_client() -> StatsResult<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(concat!("refiner-cli/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| StatsError::Unexpected(format!("failed to build HTTP client: {}", e)))
}

/// Client for one stats service.
#[derive(Debug, Clone)]
pub struct StatsClient {
    http: reqwest::Client,
    base_url: String,
    source: StatsSource,
}

impl StatsClient {
    pub fn new(http: reqwest::Client, base_url: &str, source: StatsSource) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            source,
        }
    }

    /// Full URL of the stats resource for `refiner_id`.
    pub fn stats_url(&self, refiner_id: u64) -> String {
        format!("{}/stats/refiner/{}", self.base_url, refiner_id)
    }

    /// Sign `refiner_id`, GET the stats resource and decode the body as `T`.
    ///
    /// One request, no retries. The body is decoded as-is: fields missing from
    /// the response take their defaults.
    pub async fn fetch<T: DeserializeOwned>(
        &self,
        refiner_id: u64,
        signer: &RequestSigner,
    ) -> StatsResult<T> {
        let signature = signer
            .sign_refiner_id(refiner_id)
            .await
            .map_err(|e| StatsError::InvalidCredential(e.to_string()))?;
        let signature = HeaderValue::from_str(&signature)
            .map_err(|e| StatsError::Unexpected(format!("unusable signature header: {}", e)))?;

        let url = self.stats_url(refiner_id);
        tracing::debug!(source = %self.source, %url, refiner_id, "Fetching refiner stats");

        let response = self
            .http
            .get(&url)
            .header(SIGNATURE_HEADER, signature)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .send()
            .await
            .map_err(|e| StatsError::Network(error_chain(&e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| StatsError::Network(error_chain(&e)))?;

        if !status.is_success() {
            let message = remote_error_message(status, &body);
            tracing::debug!(source = %self.source, status = status.as_u16(), %message, "Stats request rejected");
            return Err(StatsError::Remote {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|e| StatsError::InvalidResponse(e.to_string()))
    }

    /// Typed fetch for the ingestion service.
    pub async fn fetch_ingestion(
        &self,
        refiner_id: u64,
        signer: &RequestSigner,
    ) -> StatsResult<IngestionStats> {
        self.fetch(refiner_id, signer).await
    }

    /// Typed fetch for the execution service.
    pub async fn fetch_execution(
        &self,
        refiner_id: u64,
        signer: &RequestSigner,
    ) -> StatsResult<ExecutionStats> {
        self.fetch(refiner_id, signer).await
    }
}

/// Error text for a non-2xx response.
///
/// Prefers a JSON `detail` or `message` field, then the raw body, then
/// `HTTP {code}: {reason}` when the body is empty.
pub fn remote_error_message(status: StatusCode, body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return format!(
            "HTTP {}: {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown Status")
        );
    }

    if let Ok(Value::Object(fields)) = serde_json::from_str::<Value>(trimmed) {
        for key in ["detail", "message"] {
            match fields.get(key) {
                Some(Value::String(text)) if !text.is_empty() => return text.clone(),
                Some(Value::String(_)) | Some(Value::Null) | None => continue,
                Some(other) => return other.to_string(),
            }
        }
    }

    trimmed.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_url_trims_trailing_slash() {
        let client = StatsClient::new(
            reqwest::Client::new(),
            "https://qe.example.com/api/",
            StatsSource::Ingestion,
        );
        assert_eq!(
            client.stats_url(45),
            "https://qe.example.com/api/stats/refiner/45"
        );
    }

    #[test]
    fn test_remote_error_prefers_detail() {
        let msg = remote_error_message(
            StatusCode::NOT_FOUND,
            r#"{"detail": "Refiner 45 not found", "message": "ignored"}"#,
        );
        assert_eq!(msg, "Refiner 45 not found");
    }

    #[test]
    fn test_remote_error_uses_message() {
        let msg = remote_error_message(StatusCode::FORBIDDEN, r#"{"message": "Bad signature"}"#);
        assert_eq!(msg, "Bad signature");
    }

    #[test]
    fn test_remote_error_structured_detail() {
        // FastAPI validation errors carry a list under "detail"
        let msg = remote_error_message(
            StatusCode::UNPROCESSABLE_ENTITY,
            r#"{"detail": [{"msg": "field required"}]}"#,
        );
        assert_eq!(msg, r#"[{"msg":"field required"}]"#);
    }

    #[test]
    fn test_remote_error_raw_body() {
        let msg = remote_error_message(StatusCode::BAD_GATEWAY, "upstream exploded\n");
        assert_eq!(msg, "upstream exploded");

        let msg = remote_error_message(StatusCode::BAD_REQUEST, r#"{"error": "nope"}"#);
        assert_eq!(msg, r#"{"error": "nope"}"#);
    }

    #[test]
    fn test_remote_error_empty_body() {
        let msg = remote_error_message(StatusCode::SERVICE_UNAVAILABLE, "");
        assert_eq!(msg, "HTTP 503: Service Unavailable");
    }
}
