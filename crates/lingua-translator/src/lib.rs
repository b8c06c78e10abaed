use std::collections::{HashMap, HashSet};

mod deepl;
mod google;

pub use deepl::DeepLTranslator;
pub use google::GoogleTranslator;

pub type LanguageCode = String;

/// Source code meaning "let the provider detect it"
pub const AUTO: &str = "auto";

/// Translation provider interface
#[async_trait::async_trait]
pub trait Translator: Send + Sync {
    /// Translate text from source to target language
    async fn translate(
        &self,
        text: &str,
        from: LanguageCode,
        to: LanguageCode,
    ) -> Result<Translation, TranslateError>;

    /// Translate several strings in one request, preserving order
    async fn translate_many(
        &self,
        texts: &[String],
        from: LanguageCode,
        to: LanguageCode,
    ) -> Result<Vec<String>, TranslateError>;

    /// Provider metadata
    fn metadata(&self) -> ProviderMetadata;

    /// Translate one string, falling back to the input on any failure
    async fn translate_one(&self, text: &str, to: &str) -> String {
        match self.translate(text, AUTO.to_string(), to.to_string()).await {
            Ok(translation) if !translation.text.trim().is_empty() => translation.text,
            Ok(_) => text.to_string(),
            Err(e) => {
                tracing::error!("{} translate failed: {}", self.metadata().name, e);
                text.to_string()
            }
        }
    }

    /// Translate many strings with one request.
    ///
    /// Duplicates are sent once. The returned map covers every input; on
    /// failure each input maps to itself.
    async fn translate_batch(&self, texts: &[String], to: &str) -> HashMap<String, String> {
        let mut mapping: HashMap<String, String> =
            texts.iter().map(|t| (t.clone(), t.clone())).collect();

        let mut seen = HashSet::new();
        let unique: Vec<String> = texts
            .iter()
            .filter(|t| !t.trim().is_empty() && seen.insert(t.as_str()))
            .cloned()
            .collect();

        if unique.is_empty() {
            return mapping;
        }

        tracing::debug!(
            "Batch translating {} strings ({} unique)",
            texts.len(),
            unique.len()
        );

        match self
            .translate_many(&unique, AUTO.to_string(), to.to_string())
            .await
        {
            Ok(translated) if translated.len() == unique.len() => {
                for (original, translated) in unique.into_iter().zip(translated) {
                    let translated = translated.trim();
                    if !translated.is_empty() {
                        mapping.insert(original, translated.to_string());
                    }
                }
            }
            Ok(translated) => {
                tracing::error!(
                    "{} batch size mismatch: sent {}, got {}",
                    self.metadata().name,
                    unique.len(),
                    translated.len()
                );
            }
            Err(e) => {
                tracing::error!("{} batch translate failed: {}", self.metadata().name, e);
            }
        }

        mapping
    }
}

#[derive(Debug, Clone)]
pub struct Translation {
    pub text: String,
    pub from: LanguageCode,
    pub to: LanguageCode,
    pub provider: String,
}

#[derive(Debug, Clone)]
pub struct ProviderMetadata {
    pub name: String,
    pub requires_api_key: bool,
    pub free_tier_available: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    #[error("API error: {0}")]
    ApiError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Authentication error")]
    AuthenticationError,
}
