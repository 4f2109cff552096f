//! API credential precondition.
//!
//! The key must be present before any extraction or summarisation starts.
//! Loading a `.env` file is the binary's job; this module only knows which
//! variable each provider reads and whether it is set.

use crate::error::SummarizeError;
use tracing::debug;

/// Name of the environment variable holding the API key for `provider`.
///
/// Returns `None` for local providers that need no key.
pub fn credential_var(provider: &str) -> Option<&'static str> {
    match provider.trim().to_lowercase().as_str() {
        "ollama" | "lmstudio" | "lm_studio" => None,
        "anthropic" => Some("ANTHROPIC_API_KEY"),
        "gemini" | "google" => Some("GEMINI_API_KEY"),
        "mistral" => Some("MISTRAL_API_KEY"),
        "azure" => Some("AZURE_OPENAI_API_KEY"),
        _ => Some("OPENAI_API_KEY"),
    }
}

/// Fail with [`SummarizeError::MissingCredential`] unless the provider's key
/// is set to a non-empty value.
pub fn check_credential(provider: &str) -> Result<(), SummarizeError> {
    check_credential_with(provider, |var| std::env::var(var).ok())
}

fn check_credential_with(
    provider: &str,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<(), SummarizeError> {
    let Some(var) = credential_var(provider) else {
        debug!("Provider '{}' needs no API key", provider);
        return Ok(());
    };

    match lookup(var) {
        Some(value) if !value.trim().is_empty() => Ok(()),
        _ => Err(SummarizeError::MissingCredential {
            var: var.to_string(),
        }),
    }
}
