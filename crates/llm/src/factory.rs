//! LLM provider factory.
//!
//! This module creates LLM clients from the application configuration. It
//! handles provider resolution, secret injection and request timeouts.

use crate::client::LlmClient;
use crate::providers::{GroqClient, OllamaClient};
use crate::types::ProviderType;
use fiscal_core::config::LlmSettings;
use std::sync::Arc;
use std::time::Duration;

/// Create an LLM client from the LLM settings.
///
/// This function performs the following:
/// 1. Matches the provider string to a known provider type
/// 2. Checks that required secrets were resolved
/// 3. Creates the client with the configured endpoint and timeout
///
/// # Errors
/// Returns error if:
/// - Provider is unknown
/// - Groq is selected without an API key
/// - The HTTP client cannot be built
pub fn create_client(settings: &LlmSettings) -> Result<Arc<dyn LlmClient>, String> {
    let provider = ProviderType::parse(&settings.provider)
        .ok_or_else(|| format!("Unknown provider: {}", settings.provider))?;

    let endpoint = settings
        .endpoint
        .as_deref()
        .unwrap_or_else(|| provider.default_endpoint());
    let timeout = Duration::from_secs(settings.timeout_secs);

    match provider {
        ProviderType::Groq => {
            let api_key = settings.api_key.as_deref().ok_or_else(|| {
                format!(
                    "Groq provider requires an API key in ${}",
                    settings.api_key_env
                )
            })?;
            let client = GroqClient::with_base_url(endpoint, api_key)
                .with_timeout(timeout)
                .map_err(|e| e.to_string())?;
            Ok(Arc::new(client))
        }
        ProviderType::Ollama => {
            let client = OllamaClient::with_base_url(endpoint)
                .with_timeout(timeout)
                .map_err(|e| e.to_string())?;
            Ok(Arc::new(client))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(provider: &str, api_key: Option<&str>) -> LlmSettings {
        LlmSettings {
            provider: provider.to_string(),
            api_key: api_key.map(str::to_string),
            ..LlmSettings::default()
        }
    }

    #[test]
    fn test_create_ollama_client() {
        let client = create_client(&settings("ollama", None)).unwrap();
        assert_eq!(client.provider_name(), "ollama");
    }

    #[test]
    fn test_create_groq_client_with_key() {
        let client = create_client(&settings("groq", Some("gsk_test"))).unwrap();
        assert_eq!(client.provider_name(), "groq");
    }

    #[test]
    fn test_groq_requires_api_key() {
        match create_client(&settings("groq", None)) {
            Err(err) => assert!(err.contains("GROQ_API_KEY")),
            Ok(_) => panic!("Expected error for Groq without API key"),
        }
    }

    #[test]
    fn test_unknown_provider() {
        match create_client(&settings("unknown", None)) {
            Err(err) => assert!(err.contains("Unknown provider")),
            Ok(_) => panic!("Expected error for unknown provider"),
        }
    }
}
