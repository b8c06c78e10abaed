use std::time::Duration;

use async_trait::async_trait;

use crate::{AUTO, LanguageCode, ProviderMetadata, TranslateError, Translation, Translator};

const DEFAULT_API_URL: &str = "https://api-free.deepl.com/v2/translate";

#[derive(Clone)]
pub struct DeepLTranslator {
    client: reqwest::Client,
    api_key: String,
    api_url: String,
}

impl DeepLTranslator {
    pub fn new(api_key: String, api_url: Option<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();

        Self {
            client,
            api_key,
            api_url: api_url
                .filter(|url| !url.is_empty())
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
        }
    }

    /// Every text goes in one form request as a repeated `text` field
    async fn request(
        &self,
        texts: &[&str],
        from: &str,
        to: &str,
    ) -> Result<Vec<DeepLTranslation>, TranslateError> {
        if self.api_key.is_empty() {
            return Err(TranslateError::AuthenticationError);
        }

        let target = to.to_uppercase();
        let source = from.to_uppercase();
        let mut params: Vec<(&str, &str)> = texts.iter().map(|t| ("text", *t)).collect();
        params.push(("target_lang", target.as_str()));
        if from != AUTO {
            params.push(("source_lang", source.as_str()));
        }

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("DeepL-Auth-Key {}", self.api_key))
            .form(&params)
            .send()
            .await?;

        if response.status() == 429 {
            return Err(TranslateError::RateLimitExceeded);
        }

        if response.status() == 403 {
            return Err(TranslateError::AuthenticationError);
        }

        if !response.status().is_success() {
            return Err(TranslateError::ApiError(format!(
                "HTTP {}",
                response.status()
            )));
        }

        let body: DeepLResponse = response.json().await.map_err(|e| {
            TranslateError::ApiError(format!("Failed to parse response: {}", e))
        })?;

        Ok(body.translations)
    }
}

#[derive(serde::Deserialize)]
struct DeepLResponse {
    translations: Vec<DeepLTranslation>,
}

#[derive(serde::Deserialize)]
struct DeepLTranslation {
    text: String,
    #[serde(default)]
    detected_source_language: Option<String>,
}

#[async_trait]
impl Translator for DeepLTranslator {
    async fn translate(
        &self,
        text: &str,
        from: LanguageCode,
        to: LanguageCode,
    ) -> Result<Translation, TranslateError> {
        let translation = self
            .request(&[text], &from, &to)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| TranslateError::ApiError("No translation in response".to_string()))?;

        Ok(Translation {
            text: translation.text,
            from: translation
                .detected_source_language
                .map(|l| l.to_lowercase())
                .unwrap_or(from),
            to,
            provider: "deepl".to_string(),
        })
    }

    async fn translate_many(
        &self,
        texts: &[String],
        from: LanguageCode,
        to: LanguageCode,
    ) -> Result<Vec<String>, TranslateError> {
        let texts: Vec<&str> = texts.iter().map(String::as_str).collect();
        let translations = self.request(&texts, &from, &to).await?;
        Ok(translations.into_iter().map(|t| t.text).collect())
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: "DeepL".to_string(),
            requires_api_key: true,
            free_tier_available: true,
        }
    }
}
