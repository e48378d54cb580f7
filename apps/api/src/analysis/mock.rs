//! Deterministic demo provider. No network access, never fails.

use std::time::Duration;

use async_trait::async_trait;

use crate::analysis::{AnalysisError, MatchProvider, MatchResult};

/// Simulated latency so UI loading states behave as they do against a live backend.
pub const MOCK_LATENCY: Duration = Duration::from_millis(1500);

pub const MOCK_SCORE: u8 = 85;

/// The fixed demo report returned for every request.
pub fn mock_result() -> MatchResult {
    MatchResult {
        score: MOCK_SCORE,
        summary: "This is a mock analysis for UI testing purposes. \
                  No real AI was harmed in the making of this result."
            .to_string(),
        strengths: vec![
            "Demonstrates excellent mock experience".to_string(),
            "Great at showing up in the UI".to_string(),
            "Consistent performance across all tests".to_string(),
        ],
        gaps: vec![
            "Lacks real AI connectivity in this mode".to_string(),
            "Missing actual resume data to analyze".to_string(),
        ],
        suggestions: vec![
            "Configure GOOGLE_API_KEY for real analysis".to_string(),
            "Try uploading a real PDF to see text extraction".to_string(),
        ],
    }
}

pub struct MockProvider;

#[async_trait]
impl MatchProvider for MockProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn analyze(
        &self,
        _resume_text: &str,
        _job_text: &str,
    ) -> Result<MatchResult, AnalysisError> {
        tokio::time::sleep(MOCK_LATENCY).await;
        Ok(mock_result())
    }
}
