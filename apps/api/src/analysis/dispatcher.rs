//! Dispatcher: the single entry point for match analysis.
//!
//! Selects a provider once per request and returns its result or error unchanged.
//! A live-provider failure is never downgraded to the mock result.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::analysis::cloudflare::CloudflareProvider;
use crate::analysis::google::GoogleProvider;
use crate::analysis::mock::MockProvider;
use crate::analysis::selection::{
    select_provider, ProviderChoice, ProviderSelection, ProviderSettings, SelectionReason,
};
use crate::analysis::{AnalysisError, MatchProvider, MatchResult};
use crate::config::Config;

/// One provider instance per `ProviderChoice`.
pub struct ProviderRegistry {
    pub mock: Arc<dyn MatchProvider>,
    pub google: Arc<dyn MatchProvider>,
    pub cloudflare: Arc<dyn MatchProvider>,
}

impl ProviderRegistry {
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        let timeout = Duration::from_secs(config.upstream_timeout_secs);
        let settings = &config.providers;

        Ok(Self {
            mock: Arc::new(MockProvider),
            google: Arc::new(GoogleProvider::new(
                settings.google_api_key.clone(),
                config.google_api_url.clone(),
                timeout,
            )?),
            cloudflare: Arc::new(CloudflareProvider::new(
                settings.cloudflare_account_id.clone(),
                settings.cloudflare_api_token.clone(),
                config.cloudflare_api_url.clone(),
                config.cloudflare_model.clone(),
                timeout,
            )?),
        })
    }

    pub fn get(&self, choice: ProviderChoice) -> &Arc<dyn MatchProvider> {
        match choice {
            ProviderChoice::Mock => &self.mock,
            ProviderChoice::Google => &self.google,
            ProviderChoice::Cloudflare => &self.cloudflare,
        }
    }
}

pub struct Dispatcher {
    settings: ProviderSettings,
    registry: ProviderRegistry,
}

impl Dispatcher {
    pub fn new(settings: ProviderSettings, registry: ProviderRegistry) -> Self {
        Self { settings, registry }
    }

    /// The selection the next request would get. Configuration is immutable, so this is stable.
    pub fn selection(&self) -> ProviderSelection {
        select_provider(&self.settings)
    }

    pub async fn analyze_match(
        &self,
        resume_text: &str,
        job_text: &str,
    ) -> Result<MatchResult, AnalysisError> {
        let selection = self.selection();
        let provider = self.registry.get(selection.choice);

        let span = info_span!(
            "analyze_match",
            request_id = %Uuid::new_v4(),
            provider = provider.name()
        );

        async move {
            match selection.reason {
                SelectionReason::Fallback => {
                    info!("No AI credentials found. Falling back to mock provider")
                }
                SelectionReason::Override | SelectionReason::Detected => info!(
                    reason = ?selection.reason,
                    "Using {} provider for analysis",
                    provider.name()
                ),
            }

            let result = provider.analyze(resume_text, job_text).await;
            match &result {
                Ok(report) => info!(score = report.score, "Match analysis completed"),
                Err(e) => warn!(error = %e, upstream = e.is_upstream(), "Match analysis failed"),
            }
            result
        }
        .instrument(span)
        .await
    }
}
