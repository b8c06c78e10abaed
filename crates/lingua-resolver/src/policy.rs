use lingua_core::ProviderError;
use lingua_types::LookupResult;

use crate::error::ResolveError;

/// What a resolution path does once its providers have failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackPolicy {
    /// Surface the last provider error to the caller
    Propagate,
    /// Answer with an offline placeholder carrying the input text
    Degrade,
}

impl FallbackPolicy {
    pub fn settle(self, text: &str, error: ProviderError) -> Result<LookupResult, ResolveError> {
        match self {
            Self::Propagate => Err(ResolveError::Provider(error)),
            Self::Degrade => {
                tracing::error!("{}", error);
                tracing::info!("Falling back to offline placeholder for '{}'", text);
                Ok(offline_result(text))
            }
        }
    }
}

/// Translation-only placeholder used when nothing could resolve `text`
pub fn offline_result(text: &str) -> LookupResult {
    LookupResult::translation_only(format!("[Offline] {}", text), Some("auto".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degrade_keeps_the_text() {
        let result = FallbackPolicy::Degrade
            .settle("hello", ProviderError::transient("google", "HTTP 503"))
            .unwrap();

        assert_eq!(result.translation, "[Offline] hello");
        assert_eq!(result.detected_source_lang.as_deref(), Some("auto"));
        assert!(result.meanings.is_empty());
    }

    #[test]
    fn propagate_returns_the_error() {
        let err = FallbackPolicy::Propagate
            .settle("hello", ProviderError::malformed("gemini", "bad json"))
            .unwrap_err();

        assert!(matches!(err, ResolveError::Provider(e) if e.is_malformed()));
    }
}
