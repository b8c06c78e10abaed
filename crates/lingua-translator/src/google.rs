use std::time::Duration;

use async_trait::async_trait;

use crate::{LanguageCode, ProviderMetadata, TranslateError, Translation, Translator};

const DEFAULT_API_URL: &str = "https://translate.googleapis.com/translate_a/single";

/// Google Translate public web endpoint (no API key)
#[derive(Clone)]
pub struct GoogleTranslator {
    client: reqwest::Client,
    api_url: String,
}

impl GoogleTranslator {
    pub fn new(api_url: Option<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();

        Self {
            client,
            api_url: api_url
                .filter(|url| !url.is_empty())
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
        }
    }

    async fn request(
        &self,
        text: &str,
        from: &str,
        to: &str,
    ) -> Result<serde_json::Value, TranslateError> {
        let target = google_language_code(to);
        let params = [
            ("client", "gtx"),
            ("sl", from),
            ("tl", target.as_str()),
            ("dt", "t"),
            ("q", text),
        ];

        let response = self.client.get(&self.api_url).query(&params).send().await?;

        if response.status() == 429 {
            return Err(TranslateError::RateLimitExceeded);
        }

        if !response.status().is_success() {
            return Err(TranslateError::ApiError(format!(
                "HTTP {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| TranslateError::ApiError(format!("Failed to parse response: {}", e)))
    }
}

#[async_trait]
impl Translator for GoogleTranslator {
    async fn translate(
        &self,
        text: &str,
        from: LanguageCode,
        to: LanguageCode,
    ) -> Result<Translation, TranslateError> {
        let json = self.request(text, &from, &to).await?;
        let (translated, detected) = parse_response(&json)?;

        Ok(Translation {
            text: translated,
            from: detected.unwrap_or(from),
            to,
            provider: "google".to_string(),
        })
    }

    async fn translate_many(
        &self,
        texts: &[String],
        from: LanguageCode,
        to: LanguageCode,
    ) -> Result<Vec<String>, TranslateError> {
        // One line per input; the endpoint keeps line breaks
        let joined = texts
            .iter()
            .map(|t| t.replace(['\n', '\r'], " "))
            .collect::<Vec<_>>()
            .join("\n");

        let json = self.request(&joined, &from, &to).await?;
        let (translated, _) = parse_response(&json)?;

        Ok(translated.split('\n').map(|line| line.trim().to_string()).collect())
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: "Google".to_string(),
            requires_api_key: false,
            free_tier_available: true,
        }
    }
}

/// `[[["你好","hello",...], ...], null, "en", ...]`
fn parse_response(json: &serde_json::Value) -> Result<(String, Option<String>), TranslateError> {
    let segments = json
        .get(0)
        .and_then(|s| s.as_array())
        .ok_or_else(|| TranslateError::ApiError("No translation in response".to_string()))?;

    let text: String = segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(|t| t.as_str()))
        .collect();

    let detected = json.get(2).and_then(|d| d.as_str()).map(str::to_lowercase);

    Ok((text, detected))
}

fn google_language_code(code: &str) -> String {
    match code.to_lowercase().replace('_', "-").as_str() {
        "zh" | "zh-cn" | "zh-hans" | "zh-sg" | "chinese" => "zh-CN".to_string(),
        "zh-tw" | "zh-hant" | "zh-hk" => "zh-TW".to_string(),
        other => other.to_string(),
    }
}
