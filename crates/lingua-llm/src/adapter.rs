use std::sync::Arc;

use lingua_core::error::ProviderError;
use lingua_core::gloss::{first_gloss, retain_non_empty};
use lingua_types::{DefinitionEntry, LookupResult, MeaningGroup};
use serde::Deserialize;

use crate::backend::{LlmBackend, LlmError};
use crate::prompts::{dictionary_prompt, translate_prompt};
use crate::sanitize::clean_output;

/// Dictionary entry as the model is asked to produce it
#[derive(Debug, Clone, Default)]
pub struct GeneratedEntry {
    pub word: String,
    pub phonetic: Option<String>,
    pub meanings: Vec<MeaningGroup>,
}

impl GeneratedEntry {
    /// Parse cleaned model output
    pub fn parse(provider: &str, raw: &str) -> Result<Self, ProviderError> {
        let cleaned = clean_output(raw);
        let entry: WireEntry = serde_json::from_str(&cleaned).map_err(|e| {
            tracing::debug!("Unparseable model output: {}", cleaned);
            ProviderError::malformed(provider, format!("invalid dictionary JSON: {}", e))
        })?;
        Ok(entry.into())
    }

    /// `None` when the model produced no usable definition
    pub fn into_lookup_result(self) -> Option<LookupResult> {
        let meanings = retain_non_empty(self.meanings);
        let translation = first_gloss(&meanings)?;
        let phonetic = self
            .phonetic
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty());

        Some(LookupResult {
            translation,
            phonetic,
            audio_url: None,
            meanings,
            phonetics: vec![],
            detected_source_lang: Some("en".to_string()),
        })
    }
}

// Models emit `null` for fields they have nothing for, so every field is optional
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireEntry {
    word: Option<String>,
    phonetic: Option<String>,
    meanings: Option<Vec<WireMeaning>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct WireMeaning {
    part_of_speech: Option<String>,
    definitions: Option<Vec<WireDefinition>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireDefinition {
    definition: Option<String>,
    example: Option<String>,
}

impl From<WireEntry> for GeneratedEntry {
    fn from(entry: WireEntry) -> Self {
        let meanings = entry
            .meanings
            .unwrap_or_default()
            .into_iter()
            .map(|m| MeaningGroup {
                part_of_speech: m.part_of_speech.unwrap_or_else(|| "general".to_string()),
                definitions: m
                    .definitions
                    .unwrap_or_default()
                    .into_iter()
                    .map(|d| DefinitionEntry {
                        definition: d.definition.unwrap_or_default(),
                        example: d.example.unwrap_or_default(),
                    })
                    .collect(),
            })
            .collect();

        Self {
            word: entry.word.unwrap_or_default(),
            phonetic: entry.phonetic,
            meanings,
        }
    }
}

/// Async face of a blocking [`LlmBackend`]
#[derive(Clone)]
pub struct GenerativeAdapter {
    backend: Arc<dyn LlmBackend>,
}

impl GenerativeAdapter {
    pub fn new(backend: Arc<dyn LlmBackend>) -> Self {
        Self { backend }
    }

    pub fn name(&self) -> &str {
        self.backend.name()
    }

    /// Structured dictionary entry for `word`, definitions in `target_lang`
    pub async fn lookup_word(
        &self,
        word: &str,
        target_lang: &str,
    ) -> Result<Option<LookupResult>, ProviderError> {
        let raw = self.generate(dictionary_prompt(word, target_lang)).await?;
        let entry = GeneratedEntry::parse(self.backend.name(), &raw)?;
        Ok(entry.into_lookup_result())
    }

    /// Plain translation of `sentence`
    pub async fn translate_sentence(
        &self,
        sentence: &str,
        target_lang: &str,
    ) -> Result<String, ProviderError> {
        let raw = self.generate(translate_prompt(sentence, target_lang)).await?;
        let translation = clean_output(&raw);

        if translation.is_empty() {
            return Err(ProviderError::malformed(
                self.backend.name(),
                "empty translation",
            ));
        }

        Ok(translation)
    }

    async fn generate(&self, prompt: String) -> Result<String, ProviderError> {
        let backend = self.backend.clone();
        let name = backend.name().to_string();

        let result = tokio::task::spawn_blocking(move || backend.generate(&prompt))
            .await
            .map_err(|e| ProviderError::transient(&name, format!("generation task failed: {}", e)))?;

        result.map_err(|e| match e {
            LlmError::EmptyResponse => ProviderError::malformed(&name, e),
            other => ProviderError::transient(&name, other),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    struct Scripted {
        reply: Result<&'static str, &'static str>,
        calls: AtomicUsize,
    }

    impl Scripted {
        fn ok(reply: &'static str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(reply),
                calls: AtomicUsize::new(0),
            })
        }

        fn failing(message: &'static str) -> Arc<Self> {
            Arc::new(Self {
                reply: Err(message),
                calls: AtomicUsize::new(0),
            })
        }
    }

    impl LlmBackend for Scripted {
        fn name(&self) -> &str {
            "scripted"
        }

        fn generate(&self, _prompt: &str) -> Result<String, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reply
                .map(str::to_string)
                .map_err(|m| LlmError::Api(m.to_string()))
        }
    }

    const ENTRY: &str = r#"{
        "word": "run",
        "phonetic": "/rʌn/",
        "meanings": [
            { "partOfSpeech": "verb", "definitions": [{ "definition": "跑，奔跑", "example": "I run every day." }] },
            { "partOfSpeech": "noun", "definitions": [{ "definition": "跑步" }] }
        ]
    }"#;

    #[tokio::test]
    async fn parses_plain_json() {
        let backend = Scripted::ok(ENTRY);
        let adapter = GenerativeAdapter::new(backend.clone());

        let result = adapter.lookup_word("run", "Chinese").await.unwrap().unwrap();
        assert_eq!(result.translation, "跑");
        assert_eq!(result.phonetic.as_deref(), Some("/rʌn/"));
        assert_eq!(result.meanings.len(), 2);
        assert_eq!(result.meanings[1].definitions[0].example, "");
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn null_fields_are_tolerated() {
        let raw = r#"{
            "word": "run",
            "phonetic": null,
            "meanings": [
                { "partOfSpeech": null, "definitions": [{ "definition": "跑", "example": null }] },
                { "partOfSpeech": "noun", "definitions": null },
                { "partOfSpeech": "verb", "definitions": [{ "definition": null }] }
            ]
        }"#;
        let adapter = GenerativeAdapter::new(Scripted::ok(raw));

        let result = adapter.lookup_word("run", "Chinese").await.unwrap().unwrap();
        assert_eq!(result.translation, "跑");
        assert!(result.phonetic.is_none());
        assert_eq!(result.meanings.len(), 1);
        assert_eq!(result.meanings[0].part_of_speech, "general");
        assert_eq!(result.meanings[0].definitions[0].example, "");
    }

    #[tokio::test]
    async fn strips_reasoning_and_fences() {
        let raw = format!("<think>\nthe user wants run\n</think>\n```json\n{}\n```", ENTRY);
        let entry = GeneratedEntry::parse("scripted", &raw).unwrap();
        assert_eq!(entry.word, "run");
        assert_eq!(entry.meanings.len(), 2);
    }

    #[tokio::test]
    async fn invalid_json_is_malformed() {
        let adapter = GenerativeAdapter::new(Scripted::ok("Sorry, I can't help with that."));
        let err = adapter.lookup_word("run", "Chinese").await.unwrap_err();
        assert!(err.is_malformed());
    }

    #[tokio::test]
    async fn empty_meanings_are_no_data() {
        let adapter = GenerativeAdapter::new(Scripted::ok(r#"{"word": "zzz", "meanings": []}"#));
        assert!(adapter.lookup_word("zzz", "Chinese").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn backend_failure_is_transient() {
        let adapter = GenerativeAdapter::new(Scripted::failing("HTTP 503"));
        let err = adapter.translate_sentence("I love reading", "Chinese").await.unwrap_err();
        assert!(matches!(err, ProviderError::Transient { .. }));
        assert_eq!(err.provider(), "scripted");
    }

    #[tokio::test]
    async fn sentence_output_is_cleaned() {
        let adapter = GenerativeAdapter::new(Scripted::ok("<think>hmm</think>\n我爱读书。\n"));
        let translation = adapter
            .translate_sentence("I love reading.", "Chinese")
            .await
            .unwrap();
        assert_eq!(translation, "我爱读书。");
    }
}
