//! Credential resolution: explicit flags first, then the config file.

use crate::blockchain::wallet::normalize_private_key;
use crate::config::schema::{
    KEY_QUERY_ENGINE_ENDPOINT, KEY_REFINEMENT_SERVICE_ENDPOINT, KEY_WALLET_PRIVATE_KEY,
};
use crate::config::ConfigSource;
use crate::report::mask::mask_secret;
use crate::stats::error::{StatsError, StatsResult};

/// Values given explicitly on the command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct CredentialOverrides<'a> {
    pub private_key: Option<&'a str>,
    pub ingestion_endpoint: Option<&'a str>,
    pub execution_endpoint: Option<&'a str>,
}

/// Resolved key and endpoints for a single command run.
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialContext {
    /// Always `0x`-prefixed.
    pub private_key: String,
    pub ingestion_endpoint: Option<String>,
    pub execution_endpoint: Option<String>,
}

impl std::fmt::Debug for CredentialContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialContext")
            .field("private_key", &mask_secret(&self.private_key))
            .field("ingestion_endpoint", &self.ingestion_endpoint)
            .field("execution_endpoint", &self.execution_endpoint)
            .finish()
    }
}

/// Resolve every field: explicit value wins, else config lookup.
///
/// A failing lookup counts as "not set". Fails with `MissingCredential` when no
/// key is found and `MissingEndpoint` when neither endpoint is.
pub fn resolve_credentials(
    overrides: CredentialOverrides<'_>,
    config: &dyn ConfigSource,
) -> StatsResult<CredentialContext> {
    let private_key = resolve_field(overrides.private_key, KEY_WALLET_PRIVATE_KEY, config)
        .ok_or_else(|| StatsError::MissingCredential(KEY_WALLET_PRIVATE_KEY.to_string()))?;

    let ingestion_endpoint =
        resolve_field(overrides.ingestion_endpoint, KEY_QUERY_ENGINE_ENDPOINT, config);
    let execution_endpoint = resolve_field(
        overrides.execution_endpoint,
        KEY_REFINEMENT_SERVICE_ENDPOINT,
        config,
    );

    if ingestion_endpoint.is_none() && execution_endpoint.is_none() {
        return Err(StatsError::MissingEndpoint);
    }

    Ok(CredentialContext {
        private_key: normalize_private_key(&private_key),
        ingestion_endpoint,
        execution_endpoint,
    })
}

fn resolve_field(explicit: Option<&str>, key: &str, config: &dyn ConfigSource) -> Option<String> {
    if let Some(value) = non_blank(explicit) {
        return Some(value.to_string());
    }

    match config.get_config_value(key) {
        Ok(value) => value.filter(|v| !v.trim().is_empty()),
        Err(e) => {
            tracing::debug!(key, error = %e, "Config lookup failed, treating as unset");
            None
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
