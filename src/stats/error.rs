//! Error taxonomy for the stats command.

use thiserror::Error;

/// Errors raised while resolving credentials or fetching refiner stats.
#[derive(Debug, Error)]
pub enum StatsError {
    /// Refiner id is not a non-negative integer.
    #[error("Invalid refiner ID '{0}': must be a non-negative integer")]
    Validation(String),

    /// No value found for a required credential key.
    #[error("Missing credential: {0}")]
    MissingCredential(String),

    /// Neither stats service endpoint is configured.
    #[error("No stats endpoint configured: need a query engine or refinement service endpoint")]
    MissingEndpoint,

    /// Private key is not a valid secp256k1 key.
    #[error("Invalid private key: {0}")]
    InvalidCredential(String),

    /// Service answered with a non-2xx status.
    #[error("{message}")]
    Remote { status: u16, message: String },

    /// Transport failure (DNS, refused connection, timeout, broken body).
    #[error("Network error: {0}")]
    Network(String),

    /// 2xx response whose body is not the expected JSON.
    #[error("Invalid response body: {0}")]
    InvalidResponse(String),

    /// Anything else.
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Result type for stats operations.
pub type StatsResult<T> = Result<T, StatsError>;

impl StatsError {
    /// Per-source fetch failures are downgraded to warnings by the aggregator.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            StatsError::Remote { .. } | StatsError::Network(_) | StatsError::InvalidResponse(_)
        )
    }
}

/// Render an error with its full `source()` chain, `outer: inner: root`.
pub fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut current = err.source();
    while let Some(cause) = current {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        current = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Error)]
    #[error("outer")]
    struct Outer(#[source] std::io::Error);

    #[test]
    fn test_error_chain_includes_sources() {
        let err = Outer(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "connection refused",
        ));
        assert_eq!(error_chain(&err), "outer: connection refused");
    }

    #[test]
    fn test_remote_displays_server_message() {
        let err = StatsError::Remote {
            status: 404,
            message: "Refiner not found".to_string(),
        };
        assert_eq!(err.to_string(), "Refiner not found");
        assert!(err.is_fetch_failure());
        assert!(!StatsError::MissingEndpoint.is_fetch_failure());
    }
}
