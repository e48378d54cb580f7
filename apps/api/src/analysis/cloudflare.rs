//! Cloudflare Workers AI adapter.
//!
//! Authenticates with an account id (part of the URL) and a bearer API token. Both must be
//! present; either one alone is treated as unconfigured.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::analysis::normalize::{coerce_match_result, parse_model_output};
use crate::analysis::prompts::{build_match_prompt, MATCH_SYSTEM};
use crate::analysis::{AnalysisError, MatchProvider, MatchResult};

pub const DEFAULT_CLOUDFLARE_API_URL: &str = "https://api.cloudflare.com/client/v4";
pub const DEFAULT_CLOUDFLARE_MODEL: &str = "@cf/meta/llama-3.1-8b-instruct";

const PROVIDER_NAME: &str = "cloudflare";

#[derive(Debug, Serialize)]
struct RunRequest<'a> {
    messages: Vec<RunMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct RunMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Clone)]
pub struct CloudflareProvider {
    client: Client,
    account_id: Option<String>,
    api_token: Option<String>,
    base_url: String,
    model: String,
}

impl CloudflareProvider {
    pub fn new(
        account_id: Option<String>,
        api_token: Option<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            account_id,
            api_token,
            base_url: base_url.into(),
            model: model.into(),
        })
    }

    fn run_url(&self, account_id: &str) -> String {
        format!(
            "{}/accounts/{}/ai/run/{}",
            self.base_url.trim_end_matches('/'),
            account_id,
            self.model
        )
    }
}

#[async_trait]
impl MatchProvider for CloudflareProvider {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    async fn analyze(
        &self,
        resume_text: &str,
        job_text: &str,
    ) -> Result<MatchResult, AnalysisError> {
        let (account_id, api_token) = match (self.account_id.as_deref(), self.api_token.as_deref())
        {
            (Some(account_id), Some(api_token)) => (account_id, api_token),
            _ => {
                return Err(AnalysisError::Configuration(
                    "Missing Cloudflare credentials. Please set CLOUDFLARE_ACCOUNT_ID and \
                     CLOUDFLARE_API_TOKEN environment variables."
                        .to_string(),
                ))
            }
        };

        let prompt = build_match_prompt(resume_text, job_text);
        let request_body = RunRequest {
            messages: vec![
                RunMessage {
                    role: "system",
                    content: MATCH_SYSTEM,
                },
                RunMessage {
                    role: "user",
                    content: &prompt,
                },
            ],
        };

        let response = self
            .client
            .post(self.run_url(account_id))
            .bearer_auth(api_token)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!("Cloudflare Workers AI returned {}: {}", status, body);
            return Err(AnalysisError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: Value = serde_json::from_str(&body)
            .map_err(|_| AnalysisError::InvalidResponse("Cloudflare Workers AI".to_string()))?;

        // Some models honour JSON mode and return the object already decoded.
        let raw = match envelope.pointer("/result/response") {
            Some(Value::String(text)) if !text.is_empty() => {
                debug!(chars = text.len(), "Workers AI returned generated text");
                parse_model_output(text, PROVIDER_NAME)?
            }
            Some(object @ Value::Object(_)) => object.clone(),
            _ => {
                return Err(AnalysisError::InvalidResponse(
                    "Cloudflare Workers AI".to_string(),
                ))
            }
        };

        Ok(coerce_match_result(&raw))
    }
}
