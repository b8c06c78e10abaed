use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use lingua_core::preprocess::{DefaultPreprocessor, Preprocessor};
use lingua_core::{InputKind, ProviderError, TargetLanguage, classify};
use lingua_llm::GenerativeAdapter;
use lingua_store::WordStore;
use lingua_translator::{AUTO, Translator};
use lingua_types::{LookupResult, NewWord};

use crate::error::ResolveError;
use crate::policy::{FallbackPolicy, offline_result};
use crate::sources::WordSource;

const DEFAULT_ADAPTER_TIMEOUT: Duration = Duration::from_secs(45);

/// Backend translating multi-word input
#[derive(Clone)]
pub enum SentenceBackend {
    Generative(GenerativeAdapter),
    MachineTranslation(Arc<dyn Translator>),
}

impl SentenceBackend {
    pub fn policy(&self) -> FallbackPolicy {
        match self {
            Self::Generative(_) => FallbackPolicy::Propagate,
            Self::MachineTranslation(_) => FallbackPolicy::Degrade,
        }
    }

    pub fn name(&self) -> String {
        match self {
            Self::Generative(adapter) => adapter.name().to_string(),
            Self::MachineTranslation(translator) => translator.metadata().name,
        }
    }
}

/// Turns input text into a [`LookupResult`].
///
/// Single words go through the cache, then every [`WordSource`] in order until
/// one yields meanings. Sentences skip both and go to the [`SentenceBackend`].
pub struct Resolver {
    store: Arc<dyn WordStore>,
    sources: Vec<Arc<dyn WordSource>>,
    translator: Option<Arc<dyn Translator>>,
    sentences: SentenceBackend,
    adapter_timeout: Duration,
}

impl Resolver {
    pub fn new(store: Arc<dyn WordStore>, sentences: SentenceBackend) -> Self {
        Self {
            store,
            sources: Vec::new(),
            translator: None,
            sentences,
            adapter_timeout: DEFAULT_ADAPTER_TIMEOUT,
        }
    }

    /// Append a step to the single-word chain
    pub fn with_source(mut self, source: Arc<dyn WordSource>) -> Self {
        self.sources.push(source);
        self
    }

    /// Bare-word translation used when every source comes back empty
    pub fn with_translator(mut self, translator: Arc<dyn Translator>) -> Self {
        self.translator = Some(translator);
        self
    }

    pub fn with_adapter_timeout(mut self, timeout: Duration) -> Self {
        self.adapter_timeout = timeout;
        self
    }

    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    pub async fn resolve(&self, text: &str, target_lang: &str) -> Result<LookupResult, ResolveError> {
        // Cache key: trimmed, case and form kept
        let text = DefaultPreprocessor.process(text);
        if text.is_empty() {
            return Err(ResolveError::EmptyInput);
        }

        let target = TargetLanguage::parse(target_lang);

        match classify(&text) {
            InputKind::SingleWord => self.resolve_word(&text, &target).await,
            InputKind::MultiWord => self.resolve_sentence(&text, &target).await,
        }
    }

    async fn resolve_word(
        &self,
        word: &str,
        target: &TargetLanguage,
    ) -> Result<LookupResult, ResolveError> {
        match self.store.find_by_original(word).await {
            Ok(Some(cached)) => {
                tracing::debug!("Cache hit for '{}'", word);
                return Ok(cached.to_lookup_result());
            }
            Ok(None) => {}
            Err(e) => tracing::error!("Cache lookup for '{}' failed: {}", word, e),
        }

        let mut last_error = None;

        for source in &self.sources {
            if !source.applies_to(target) {
                continue;
            }

            match self.step(source.name(), source.lookup(word, target)).await {
                Ok(Some(result)) if result.has_meanings() => {
                    tracing::info!("Resolved '{}' via {}", word, source.name());
                    self.remember(word, &result).await;
                    return Ok(result);
                }
                Ok(_) => tracing::debug!("{} has no data for '{}'", source.name(), word),
                Err(e) if e.is_malformed() => return Err(e.into()),
                Err(e) => {
                    tracing::error!("{}", e);
                    last_error = Some(e);
                }
            }
        }

        if let Some(e) = last_error {
            return FallbackPolicy::Propagate.settle(word, e);
        }

        self.translate_only(word, target).await
    }

    /// Nothing structured was found anywhere. Not cached.
    async fn translate_only(
        &self,
        word: &str,
        target: &TargetLanguage,
    ) -> Result<LookupResult, ResolveError> {
        let Some(translator) = &self.translator else {
            tracing::info!("No source resolved '{}'", word);
            return Ok(offline_result(word));
        };

        match self.machine_translate(translator.as_ref(), word, target).await {
            Ok(result) => Ok(result),
            Err(e) => FallbackPolicy::Degrade.settle(word, e),
        }
    }

    async fn resolve_sentence(
        &self,
        sentence: &str,
        target: &TargetLanguage,
    ) -> Result<LookupResult, ResolveError> {
        let outcome = match &self.sentences {
            SentenceBackend::Generative(adapter) => self
                .step(adapter.name(), adapter.translate_sentence(sentence, &target.name))
                .await
                .map(|translation| {
                    LookupResult::translation_only(translation, Some("en".to_string()))
                }),
            SentenceBackend::MachineTranslation(translator) => {
                self.machine_translate(translator.as_ref(), sentence, target)
                    .await
            }
        };

        match outcome {
            Ok(result) => Ok(result),
            Err(e) => self.sentences.policy().settle(sentence, e),
        }
    }

    async fn machine_translate(
        &self,
        translator: &dyn Translator,
        text: &str,
        target: &TargetLanguage,
    ) -> Result<LookupResult, ProviderError> {
        let name = translator.metadata().name;
        let translation = self
            .step(&name, async {
                translator
                    .translate(text, AUTO.to_string(), target.code.clone())
                    .await
                    .map_err(|e| ProviderError::transient(&name, e))
            })
            .await?;

        if translation.text.trim().is_empty() {
            return Err(ProviderError::malformed(&name, "empty translation"));
        }

        Ok(LookupResult::translation_only(
            translation.text,
            Some(translation.from),
        ))
    }

    /// Bound one provider call by the adapter timeout
    async fn step<T, F>(&self, provider: &str, call: F) -> Result<T, ProviderError>
    where
        F: Future<Output = Result<T, ProviderError>>,
    {
        tokio::time::timeout(self.adapter_timeout, call)
            .await
            .unwrap_or_else(|_| {
                Err(ProviderError::Timeout {
                    provider: provider.to_string(),
                    elapsed: self.adapter_timeout,
                })
            })
    }

    /// Best effort: a failed write never fails the lookup
    async fn remember(&self, word: &str, result: &LookupResult) {
        if let Err(e) = self.store.insert(NewWord::from_lookup(word, result)).await {
            tracing::error!("Failed to cache '{}': {}", word, e);
        }
    }
}
