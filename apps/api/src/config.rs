use anyhow::{Context, Result};

use crate::analysis::cloudflare::{DEFAULT_CLOUDFLARE_API_URL, DEFAULT_CLOUDFLARE_MODEL};
use crate::analysis::google::DEFAULT_GOOGLE_API_URL;
use crate::analysis::selection::ProviderSettings;

/// Application configuration loaded from environment variables.
/// Nothing is required: a process with no AI credentials runs in mock mode.
#[derive(Debug, Clone)]
pub struct Config {
    pub providers: ProviderSettings,
    pub google_api_url: String,
    pub cloudflare_api_url: String,
    pub cloudflare_model: String,
    pub upstream_timeout_secs: u64,
    pub max_upload_bytes: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            providers: ProviderSettings {
                provider_override: optional_env("AI_PROVIDER"),
                google_api_key: optional_env("GOOGLE_API_KEY"),
                cloudflare_account_id: optional_env("CLOUDFLARE_ACCOUNT_ID"),
                cloudflare_api_token: optional_env("CLOUDFLARE_API_TOKEN"),
            },
            google_api_url: optional_env("GOOGLE_API_URL")
                .unwrap_or_else(|| DEFAULT_GOOGLE_API_URL.to_string()),
            cloudflare_api_url: optional_env("CLOUDFLARE_API_URL")
                .unwrap_or_else(|| DEFAULT_CLOUDFLARE_API_URL.to_string()),
            cloudflare_model: optional_env("CLOUDFLARE_MODEL")
                .unwrap_or_else(|| DEFAULT_CLOUDFLARE_MODEL.to_string()),
            upstream_timeout_secs: parse_env("UPSTREAM_TIMEOUT_SECS", 60)
                .context("UPSTREAM_TIMEOUT_SECS must be a whole number of seconds")?,
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", 10 * 1024 * 1024)
                .context("MAX_UPLOAD_BYTES must be a byte count")?,
            port: parse_env("PORT", 8080).context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// Reads a variable, treating unset, empty, and whitespace-only values alike as absent.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Invalid value '{raw}' for '{key}'")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Each test uses its own variable names; the process environment is shared across tests.

    #[test]
    fn test_blank_values_are_absent() {
        std::env::set_var("RESUME_MATCH_TEST_BLANK", "   ");
        std::env::set_var("RESUME_MATCH_TEST_PADDED", "  g-key \n");
        assert_eq!(optional_env("RESUME_MATCH_TEST_BLANK"), None);
        assert_eq!(optional_env("RESUME_MATCH_TEST_UNSET"), None);
        assert_eq!(
            optional_env("RESUME_MATCH_TEST_PADDED"),
            Some("g-key".to_string())
        );
    }

    #[test]
    fn test_parse_env_defaults_and_rejects_garbage() {
        std::env::set_var("RESUME_MATCH_TEST_TIMEOUT", "15");
        std::env::set_var("RESUME_MATCH_TEST_PORT", "not-a-port");
        assert_eq!(parse_env::<u64>("RESUME_MATCH_TEST_TIMEOUT", 60).unwrap(), 15);
        assert_eq!(parse_env::<u64>("RESUME_MATCH_TEST_MISSING", 60).unwrap(), 60);
        assert!(parse_env::<u16>("RESUME_MATCH_TEST_PORT", 8080).is_err());
    }
}
