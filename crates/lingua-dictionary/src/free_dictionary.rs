use std::time::Duration;

use lingua_core::dictionary::{Dictionary, DictionaryMetadata};
use lingua_core::error::ProviderError;
use lingua_core::gloss::{first_gloss, retain_non_empty};
use lingua_types::{DefinitionEntry, LookupResult, MeaningGroup, Phonetic};
use serde::Deserialize;

const NAME: &str = "Free Dictionary API";

/// English-only networked dictionary (dictionaryapi.dev).
///
/// Used purely for enrichment: every failure is logged and reported as no data.
#[derive(Clone)]
pub struct FreeDictionary {
    client: reqwest::Client,
    base_url: String,
}

impl FreeDictionary {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    async fn fetch(&self, word: &str) -> Result<Option<LookupResult>, ProviderError> {
        let mut url =
            reqwest::Url::parse(&self.base_url).map_err(|e| ProviderError::transient(NAME, e))?;
        url.path_segments_mut()
            .map_err(|_| ProviderError::transient(NAME, "base url cannot hold a path"))?
            .push(word);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ProviderError::transient(NAME, e))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            tracing::debug!("{} has no entry for '{}'", NAME, word);
            return Ok(None);
        }

        if !response.status().is_success() {
            return Err(ProviderError::transient(
                NAME,
                format!("HTTP {} for '{}'", response.status(), word),
            ));
        }

        let entries: Vec<ApiEntry> = response
            .json()
            .await
            .map_err(|e| ProviderError::malformed(NAME, e))?;

        Ok(normalize_entries(entries))
    }
}

#[async_trait::async_trait]
impl Dictionary for FreeDictionary {
    async fn lookup(&self, word: &str) -> Result<Option<LookupResult>, ProviderError> {
        match self.fetch(word).await {
            Ok(result) => Ok(result),
            Err(e) => {
                tracing::error!("Error fetching dictionary data: {}", e);
                Ok(None)
            }
        }
    }

    fn metadata(&self) -> DictionaryMetadata {
        DictionaryMetadata {
            name: NAME.to_string(),
            language: "en".to_string(),
            offline: false,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiEntry {
    #[serde(default)]
    phonetic: Option<String>,
    #[serde(default)]
    phonetics: Vec<ApiPhonetic>,
    #[serde(default)]
    meanings: Vec<ApiMeaning>,
}

#[derive(Debug, Deserialize)]
struct ApiPhonetic {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    audio: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiMeaning {
    #[serde(default)]
    part_of_speech: Option<String>,
    #[serde(default)]
    definitions: Vec<ApiDefinition>,
}

#[derive(Debug, Deserialize)]
struct ApiDefinition {
    #[serde(default)]
    definition: String,
    #[serde(default)]
    example: Option<String>,
}

/// First entry only, phonetic and audio from the first non-empty values
fn normalize_entries(entries: Vec<ApiEntry>) -> Option<LookupResult> {
    let entry = entries.into_iter().next()?;

    let mut phonetic = entry.phonetic.filter(|p| !p.is_empty());
    let mut audio_url = None;
    let mut phonetics = Vec::with_capacity(entry.phonetics.len());

    for p in entry.phonetics {
        let text = p.text.unwrap_or_default();
        let audio = p.audio.unwrap_or_default();

        if phonetic.is_none() && !text.is_empty() {
            phonetic = Some(text.clone());
        }
        if audio_url.is_none() && !audio.is_empty() {
            audio_url = Some(audio.clone());
        }

        phonetics.push(Phonetic { text, audio });
    }

    let meanings = retain_non_empty(
        entry
            .meanings
            .into_iter()
            .map(|m| MeaningGroup {
                part_of_speech: m.part_of_speech.unwrap_or_else(|| "general".to_string()),
                definitions: m
                    .definitions
                    .into_iter()
                    .map(|d| DefinitionEntry {
                        definition: d.definition,
                        example: d.example.unwrap_or_default(),
                    })
                    .collect(),
            })
            .collect(),
    );

    if meanings.is_empty() {
        return None;
    }

    Some(LookupResult {
        translation: first_gloss(&meanings).unwrap_or_default(),
        phonetic,
        audio_url,
        meanings,
        phonetics,
        detected_source_lang: Some("en".to_string()),
    })
}
