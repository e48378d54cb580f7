//! Provider selection: a pure function of `ProviderSettings`.
//!
//! Precedence (first match wins):
//! 1. override `mock`
//! 2. override `google`, or no override and a Google key
//! 3. override `cloudflare`, or no override and both Cloudflare credentials
//! 4. mock fallback (also taken for unrecognized override values)

use serde::Serialize;

/// Provider-related slice of the process configuration. Read-only after startup.
#[derive(Debug, Clone, Default)]
pub struct ProviderSettings {
    pub provider_override: Option<String>,
    pub google_api_key: Option<String>,
    pub cloudflare_account_id: Option<String>,
    pub cloudflare_api_token: Option<String>,
}

impl ProviderSettings {
    fn has_google_key(&self) -> bool {
        is_present(&self.google_api_key)
    }

    fn has_cloudflare_credentials(&self) -> bool {
        is_present(&self.cloudflare_account_id) && is_present(&self.cloudflare_api_token)
    }

    /// Lowercased override, `None` when unset or blank.
    fn normalized_override(&self) -> Option<String> {
        self.provider_override
            .as_deref()
            .map(|v| v.trim().to_lowercase())
            .filter(|v| !v.is_empty())
    }
}

fn is_present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderChoice {
    Mock,
    Google,
    Cloudflare,
}

/// Why a provider was chosen. Only used for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionReason {
    Override,
    Detected,
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderSelection {
    pub choice: ProviderChoice,
    pub reason: SelectionReason,
}

impl ProviderSelection {
    fn new(choice: ProviderChoice, reason: SelectionReason) -> Self {
        Self { choice, reason }
    }
}

pub fn select_provider(settings: &ProviderSettings) -> ProviderSelection {
    let override_value = settings.normalized_override();
    let requested = override_value.as_deref();

    if requested == Some("mock") {
        return ProviderSelection::new(ProviderChoice::Mock, SelectionReason::Override);
    }

    if requested == Some("google") {
        return ProviderSelection::new(ProviderChoice::Google, SelectionReason::Override);
    }
    if requested.is_none() && settings.has_google_key() {
        return ProviderSelection::new(ProviderChoice::Google, SelectionReason::Detected);
    }

    if requested == Some("cloudflare") {
        return ProviderSelection::new(ProviderChoice::Cloudflare, SelectionReason::Override);
    }
    if requested.is_none() && settings.has_cloudflare_credentials() {
        return ProviderSelection::new(ProviderChoice::Cloudflare, SelectionReason::Detected);
    }

    ProviderSelection::new(ProviderChoice::Mock, SelectionReason::Fallback)
}
