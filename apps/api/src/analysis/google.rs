//! Google Gemini adapter (`generateContent`).
//!
//! The API key travels as the `key` query parameter. JSON output is requested through
//! `generationConfig.responseMimeType`, which is only a hint: the reply still goes through
//! `normalize` before it reaches the caller.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::analysis::normalize::{coerce_match_result, parse_model_output};
use crate::analysis::prompts::build_match_prompt;
use crate::analysis::{AnalysisError, MatchProvider, MatchResult};

pub const DEFAULT_GOOGLE_API_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent";

const PROVIDER_NAME: &str = "google";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    generation_config: GenerationConfig<'a>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<ResponseContent>,
}

#[derive(Debug, Default, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Default, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateContentResponse {
    /// `candidates[0].content.parts[0].text`, if present and non-empty.
    fn first_text(&self) -> Option<&str> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .first()?
            .text
            .as_deref()
            .filter(|t| !t.is_empty())
    }
}

#[derive(Clone)]
pub struct GoogleProvider {
    client: Client,
    api_key: Option<String>,
    endpoint: String,
}

impl GoogleProvider {
    pub fn new(
        api_key: Option<String>,
        endpoint: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            api_key,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl MatchProvider for GoogleProvider {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    async fn analyze(
        &self,
        resume_text: &str,
        job_text: &str,
    ) -> Result<MatchResult, AnalysisError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            AnalysisError::Configuration(
                "Missing Google API Key. Please set GOOGLE_API_KEY environment variable."
                    .to_string(),
            )
        })?;

        let prompt = build_match_prompt(resume_text, job_text);
        let request_body = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: &prompt }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
            },
        };

        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("key", api_key)])
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!("Google AI API returned {}: {}", status, body);
            return Err(AnalysisError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: GenerateContentResponse = serde_json::from_str(&body)
            .map_err(|_| AnalysisError::InvalidResponse("Google AI".to_string()))?;
        let text = envelope
            .first_text()
            .ok_or_else(|| AnalysisError::InvalidResponse("Google AI".to_string()))?;

        debug!(chars = text.len(), "Google AI returned generated text");

        let raw = parse_model_output(text, PROVIDER_NAME)?;
        Ok(coerce_match_result(&raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const GENERATE_PATH: &str = "/v1beta/models/gemini-test:generateContent";

    fn provider_for(server: &MockServer, api_key: Option<&str>) -> GoogleProvider {
        GoogleProvider::new(
            api_key.map(String::from),
            format!("{}{GENERATE_PATH}", server.uri()),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    fn gemini_reply(text: &str) -> serde_json::Value {
        json!({
            "candidates": [
                { "content": { "parts": [ { "text": text } ], "role": "model" } }
            ]
        })
    }

    #[tokio::test]
    async fn test_analyze_coerces_out_of_range_reply() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .and(query_param("key", "test-key"))
            .and(body_partial_json(json!({
                "generationConfig": { "responseMimeType": "application/json" }
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(gemini_reply(r#"{"score": 150, "summary": "x"}"#)),
            )
            .expect(1)
            .mount(&server)
            .await;

        let result = provider_for(&server, Some("test-key"))
            .analyze("Rust developer", "Rust role")
            .await
            .unwrap();

        assert_eq!(result.score, 100);
        assert_eq!(result.summary, "x");
        assert!(result.strengths.is_empty());
        assert!(result.gaps.is_empty());
        assert!(result.suggestions.is_empty());
    }

    #[tokio::test]
    async fn test_prompt_carries_resume_and_job_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(gemini_reply(r#"{"score": 61}"#)),
            )
            .mount(&server)
            .await;

        provider_for(&server, Some("k"))
            .analyze("RESUME-MARKER-123", "JOB-MARKER-456")
            .await
            .unwrap();

        let requests = server.received_requests().await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
        let prompt = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
        assert!(prompt.contains("RESUME-MARKER-123"));
        assert!(prompt.contains("JOB-MARKER-456"));
    }

    #[tokio::test]
    async fn test_rate_limit_surfaces_as_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("RESOURCE_EXHAUSTED"))
            .mount(&server)
            .await;

        let err = provider_for(&server, Some("k"))
            .analyze("r", "j")
            .await
            .unwrap_err();

        match err {
            AnalysisError::Upstream { status, body } => {
                assert_eq!(status, 429);
                assert_eq!(body, "RESOURCE_EXHAUSTED");
            }
            other => panic!("expected Upstream, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_slow_upstream_times_out_as_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(gemini_reply(r#"{"score": 90}"#))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let provider = GoogleProvider::new(
            Some("k".to_string()),
            format!("{}{GENERATE_PATH}", server.uri()),
            Duration::from_millis(200),
        )
        .unwrap();

        let err = provider.analyze("r", "j").await.unwrap_err();

        match &err {
            AnalysisError::Transport(e) => assert!(e.is_timeout()),
            other => panic!("expected Transport, got {other:?}"),
        }
        assert!(err.is_upstream());
    }

    #[tokio::test]
    async fn test_missing_key_fails_without_network_call() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = provider_for(&server, None)
            .analyze("r", "j")
            .await
            .unwrap_err();

        assert!(matches!(err, AnalysisError::Configuration(_)));
    }

    #[tokio::test]
    async fn test_missing_candidate_path_is_invalid_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })),
            )
            .mount(&server)
            .await;

        let err = provider_for(&server, Some("k"))
            .analyze("r", "j")
            .await
            .unwrap_err();

        assert!(matches!(err, AnalysisError::InvalidResponse(_)));
        assert!(err.is_upstream());
    }

    #[tokio::test]
    async fn test_non_json_envelope_is_invalid_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = provider_for(&server, Some("k"))
            .analyze("r", "j")
            .await
            .unwrap_err();

        assert!(matches!(err, AnalysisError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_unparseable_model_text_is_format_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(gemini_reply("I think this is a great match!")),
            )
            .mount(&server)
            .await;

        let err = provider_for(&server, Some("k"))
            .analyze("r", "j")
            .await
            .unwrap_err();

        assert!(matches!(err, AnalysisError::Format));
    }

    #[test]
    fn test_first_text_requires_every_path_segment() {
        let no_parts: GenerateContentResponse =
            serde_json::from_value(json!({"candidates": [{"content": {"parts": []}}]})).unwrap();
        assert!(no_parts.first_text().is_none());

        let no_content: GenerateContentResponse =
            serde_json::from_value(json!({"candidates": [{"finishReason": "SAFETY"}]})).unwrap();
        assert!(no_content.first_text().is_none());

        let ok: GenerateContentResponse = serde_json::from_value(gemini_reply("{}")).unwrap();
        assert_eq!(ok.first_text(), Some("{}"));
    }
}
