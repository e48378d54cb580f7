//! Resume ↔ job matching: provider selection, backend adapters, and response normalization.
//!
//! Every backend, live or mock, implements `MatchProvider` and returns a `MatchResult`.
//! Untrusted model output only ever reaches callers through `normalize::coerce_match_result`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod cloudflare;
pub mod dispatcher;
pub mod google;
pub mod handlers;
pub mod mock;
pub mod normalize;
pub mod prompts;
pub mod selection;

/// User-facing message for model output that could not be parsed as JSON.
pub const FORMAT_ERROR_MESSAGE: &str = "Failed to parse AI response. Please try again.";

/// The match report every provider produces.
///
/// Invariants: `score` is within 0–100 and `summary` is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub score: u8,
    pub summary: String,
    pub strengths: Vec<String>,
    pub gaps: Vec<String>,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Upstream API error (status {status}): {body}")]
    Upstream { status: u16, body: String },

    #[error("Invalid response shape from {0}")]
    InvalidResponse(String),

    #[error("Upstream transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to parse AI response. Please try again.")]
    Format,
}

impl AnalysisError {
    /// True for every failure that originates at the backend rather than in local config.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            AnalysisError::Upstream { .. }
                | AnalysisError::InvalidResponse(_)
                | AnalysisError::Transport(_)
        )
    }
}

/// A backend capable of scoring a resume against a job description.
///
/// The dispatcher holds providers as `Arc<dyn MatchProvider>`.
#[async_trait]
pub trait MatchProvider: Send + Sync {
    /// Short stable name used in logs.
    fn name(&self) -> &'static str;

    async fn analyze(&self, resume_text: &str, job_text: &str)
        -> Result<MatchResult, AnalysisError>;
}
