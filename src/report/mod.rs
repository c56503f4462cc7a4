//! Report rendering.
//!
//! # Data Flow
//! ```text
//! CombinedStatsResult + RenderOptions
//!     → json.rs  (--json: whole result, pretty-printed)
//!     → human.rs (sections; technical details with --verbose)
//!         + json.rs appended with --include-raw
//! ```

pub mod human;
pub mod json;
pub mod mask;

use thiserror::Error;

use crate::stats::CombinedStatsResult;

pub use human::render_human;
pub use json::render_json;
pub use mask::mask_secret;

/// Output switches for the stats report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    pub json: bool,
    pub verbose: bool,
    pub include_raw: bool,
}

/// Run details shown in the verbose technical block.
#[derive(Clone)]
pub struct TechnicalContext {
    pub signer_address: String,
    /// Masked on display.
    pub private_key: String,
    pub ingestion_endpoint: Option<String>,
    pub execution_endpoint: Option<String>,
}

impl std::fmt::Debug for TechnicalContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TechnicalContext")
            .field("signer_address", &self.signer_address)
            .field("private_key", &mask_secret(&self.private_key))
            .field("ingestion_endpoint", &self.ingestion_endpoint)
            .field("execution_endpoint", &self.execution_endpoint)
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to format report")]
    Format(#[from] std::fmt::Error),
}

/// Render `result` per `options`.
///
/// `include_raw` appends the JSON dump to the human report; it has no effect
/// in JSON mode.
pub fn render(
    result: &CombinedStatsResult,
    options: RenderOptions,
    context: Option<&TechnicalContext>,
) -> Result<String, ReportError> {
    if options.json {
        return Ok(render_json(result)?);
    }

    let mut text = render_human(result, options.verbose, context)?;
    if options.include_raw {
        text.push_str("\nRaw Data\n--------\n");
        text.push_str(&render_json(result)?);
        text.push('\n');
    }
    Ok(text)
}
