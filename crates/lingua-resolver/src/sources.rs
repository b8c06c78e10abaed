//! Word-resolution steps, tried in order by the [`crate::Resolver`].

use std::sync::Arc;

use lingua_core::gloss::first_gloss;
use lingua_core::{Dictionary, ProviderError, TargetLanguage};
use lingua_llm::GenerativeAdapter;
use lingua_translator::Translator;
use lingua_types::LookupResult;

/// One step of the single-word chain.
///
/// `Ok(None)` means the step had nothing and the next one should run.
#[async_trait::async_trait]
pub trait WordSource: Send + Sync {
    fn name(&self) -> &str;

    /// Whether the step runs at all for this target
    fn applies_to(&self, _target: &TargetLanguage) -> bool {
        true
    }

    async fn lookup(
        &self,
        word: &str,
        target: &TargetLanguage,
    ) -> Result<Option<LookupResult>, ProviderError>;
}

/// Dictionary whose definitions are already Chinese, used for Chinese targets only
pub struct ChineseDictionarySource {
    dictionary: Arc<dyn Dictionary>,
    name: String,
}

impl ChineseDictionarySource {
    pub fn new(dictionary: Arc<dyn Dictionary>) -> Self {
        let name = dictionary.metadata().name;
        Self { dictionary, name }
    }
}

#[async_trait::async_trait]
impl WordSource for ChineseDictionarySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn applies_to(&self, target: &TargetLanguage) -> bool {
        target.is_chinese()
    }

    async fn lookup(
        &self,
        word: &str,
        _target: &TargetLanguage,
    ) -> Result<Option<LookupResult>, ProviderError> {
        self.dictionary.lookup(word).await
    }
}

/// English dictionary for phonetics, audio and examples, with definitions
/// machine-translated into the target language
pub struct RemoteDictionarySource {
    dictionary: Arc<dyn Dictionary>,
    translator: Arc<dyn Translator>,
    name: String,
}

impl RemoteDictionarySource {
    pub fn new(dictionary: Arc<dyn Dictionary>, translator: Arc<dyn Translator>) -> Self {
        let name = dictionary.metadata().name;
        Self {
            dictionary,
            translator,
            name,
        }
    }

    async fn bare_translation(&self, word: &str, target: &TargetLanguage) -> Option<String> {
        if target.is_english() {
            return None;
        }

        let translated = self.translator.translate_one(word, &target.code).await;
        (translated.trim() != word).then_some(translated)
    }

    async fn localize(&self, result: &mut LookupResult, target: &TargetLanguage) {
        let definitions: Vec<String> = result
            .meanings
            .iter()
            .flat_map(|group| group.definitions.iter())
            .map(|entry| entry.definition.clone())
            .collect();

        let mapping = self.translator.translate_batch(&definitions, &target.code).await;

        for entry in result
            .meanings
            .iter_mut()
            .flat_map(|group| group.definitions.iter_mut())
        {
            if let Some(translated) = mapping.get(&entry.definition) {
                entry.definition = translated.clone();
            }
        }
    }
}

#[async_trait::async_trait]
impl WordSource for RemoteDictionarySource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn lookup(
        &self,
        word: &str,
        target: &TargetLanguage,
    ) -> Result<Option<LookupResult>, ProviderError> {
        let (entry, bare) = tokio::join!(
            self.dictionary.lookup(word),
            self.bare_translation(word, target)
        );

        let Some(mut result) = entry? else {
            return Ok(None);
        };

        if !target.is_english() {
            self.localize(&mut result, target).await;
        }

        result.translation = bare
            .or_else(|| first_gloss(&result.meanings))
            .unwrap_or_else(|| word.to_string());

        Ok(Some(result))
    }
}

/// Dictionary-style prompt against the configured generative backend
pub struct GenerativeSource {
    adapter: GenerativeAdapter,
}

impl GenerativeSource {
    pub fn new(adapter: GenerativeAdapter) -> Self {
        Self { adapter }
    }
}

#[async_trait::async_trait]
impl WordSource for GenerativeSource {
    fn name(&self) -> &str {
        self.adapter.name()
    }

    async fn lookup(
        &self,
        word: &str,
        target: &TargetLanguage,
    ) -> Result<Option<LookupResult>, ProviderError> {
        self.adapter.lookup_word(word, &target.name).await
    }
}
