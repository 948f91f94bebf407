//! Generative AI backend implementations for Reelsmith.
//!
//! All providers implement the `reelsmith_core::Provider` trait.

pub mod gemini;

pub use gemini::GeminiProvider;

use std::sync::Arc;
use reelsmith_config::AppConfig;
use reelsmith_core::error::ProviderError;
use reelsmith_core::provider::Provider;

/// Build the configured provider.
///
/// Returns `Ok(None)` when no API key is configured; that is a setup state,
/// not a failure.
pub fn build_from_config(config: &AppConfig) -> Result<Option<Arc<dyn Provider>>, ProviderError> {
    let Some(api_key) = config.api_key.as_deref() else {
        return Ok(None);
    };
    let timeout = config.request_timeout_secs.map(std::time::Duration::from_secs);
    let provider = GeminiProvider::new(&config.api_url, api_key, timeout)?;
    Ok(Some(Arc::new(provider)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_key_builds_nothing() {
        let config = AppConfig::default();
        assert!(build_from_config(&config).unwrap().is_none());
    }

    #[test]
    fn key_builds_gemini() {
        let config = AppConfig {
            api_key: Some("test-key".into()),
            ..AppConfig::default()
        };
        let provider = build_from_config(&config).unwrap().unwrap();
        assert_eq!(provider.name(), "gemini");
    }
}
