use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use lingua_core::{Dictionary, DictionaryMetadata, ProviderError, TargetLanguage};
use lingua_dictionary::EcDict;
use lingua_llm::{GenerativeAdapter, LlmBackend, LlmError};
use lingua_store::{SqliteStore, StoreError, WordStore};
use lingua_translator::{LanguageCode, ProviderMetadata, TranslateError, Translation, Translator};
use lingua_types::{CachedWord, LookupResult, MeaningGroup, NewWord, WordFlagsPatch};
use sqlx::sqlite::SqlitePoolOptions;
use uuid::Uuid;

use crate::{
    ChineseDictionarySource, GenerativeSource, RemoteDictionarySource, ResolveError, Resolver,
    SentenceBackend, WordSource,
};

enum Reply {
    Found(LookupResult),
    Empty,
    Transient,
    Slow,
}

struct CountingSource {
    name: &'static str,
    reply: Reply,
    chinese_only: bool,
    calls: AtomicUsize,
}

impl CountingSource {
    fn new(name: &'static str, reply: Reply) -> Arc<Self> {
        Arc::new(Self {
            name,
            reply,
            chinese_only: false,
            calls: AtomicUsize::new(0),
        })
    }

    fn chinese_only(name: &'static str, reply: Reply) -> Arc<Self> {
        Arc::new(Self {
            name,
            reply,
            chinese_only: true,
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl WordSource for CountingSource {
    fn name(&self) -> &str {
        self.name
    }

    fn applies_to(&self, target: &TargetLanguage) -> bool {
        !self.chinese_only || target.is_chinese()
    }

    async fn lookup(
        &self,
        _word: &str,
        _target: &TargetLanguage,
    ) -> Result<Option<LookupResult>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.reply {
            Reply::Found(result) => Ok(Some(result.clone())),
            Reply::Empty => Ok(None),
            Reply::Transient => Err(ProviderError::transient(self.name, "HTTP 503")),
            Reply::Slow => {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok(None)
            }
        }
    }
}

#[derive(Default)]
struct FakeTranslator {
    fail: bool,
    calls: AtomicUsize,
}

#[async_trait::async_trait]
impl Translator for FakeTranslator {
    async fn translate(
        &self,
        text: &str,
        _from: LanguageCode,
        to: LanguageCode,
    ) -> Result<Translation, TranslateError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(TranslateError::ApiError("HTTP 503".to_string()));
        }
        Ok(Translation {
            text: format!("<{text}>"),
            from: "en".to_string(),
            to,
            provider: "fake".to_string(),
        })
    }

    async fn translate_many(
        &self,
        texts: &[String],
        _from: LanguageCode,
        _to: LanguageCode,
    ) -> Result<Vec<String>, TranslateError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(TranslateError::RateLimitExceeded);
        }
        Ok(texts.iter().map(|t| format!("<{t}>")).collect())
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: "fake".to_string(),
            requires_api_key: false,
            free_tier_available: true,
        }
    }
}

struct ScriptedBackend {
    reply: &'static str,
    calls: AtomicUsize,
}

impl ScriptedBackend {
    fn new(reply: &'static str) -> Arc<Self> {
        Arc::new(Self {
            reply,
            calls: AtomicUsize::new(0),
        })
    }
}

impl LlmBackend for ScriptedBackend {
    fn name(&self) -> &str {
        "scripted"
    }

    fn generate(&self, _prompt: &str) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.reply.to_string())
    }
}

/// English-only dictionary returning a fixed entry
struct FixedDictionary(LookupResult);

#[async_trait::async_trait]
impl Dictionary for FixedDictionary {
    async fn lookup(&self, _word: &str) -> Result<Option<LookupResult>, ProviderError> {
        Ok(Some(self.0.clone()))
    }

    fn metadata(&self) -> DictionaryMetadata {
        DictionaryMetadata {
            name: "fixed".to_string(),
            language: "en".to_string(),
            offline: false,
        }
    }
}

/// Every call fails as if the database were gone
struct BrokenStore;

#[async_trait::async_trait]
impl WordStore for BrokenStore {
    async fn find_by_original(&self, _original: &str) -> Result<Option<CachedWord>, StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolClosed))
    }

    async fn insert(&self, _word: NewWord) -> Result<CachedWord, StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolClosed))
    }

    async fn list(&self, _limit: i64, _offset: i64) -> Result<Vec<CachedWord>, StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolClosed))
    }

    async fn get(&self, _id: Uuid) -> Result<Option<CachedWord>, StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolClosed))
    }

    async fn update_flags(
        &self,
        _id: Uuid,
        _patch: WordFlagsPatch,
    ) -> Result<Option<CachedWord>, StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolClosed))
    }

    async fn delete(&self, _id: Uuid) -> Result<bool, StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolClosed))
    }
}

async fn ecdict_with_hello() -> Arc<EcDict> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();

    sqlx::query("CREATE TABLE stardict (word TEXT, phonetic TEXT, translation TEXT, pos TEXT)")
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query("INSERT INTO stardict VALUES ('hello', 'hə''ləʊ', 'int. 你好; 喂\nn. 表示问候', 'n:30/int:70')")
        .execute(&pool)
        .await
        .unwrap();

    Arc::new(EcDict::from_pool(pool))
}

fn apple() -> LookupResult {
    LookupResult {
        translation: "apple".to_string(),
        phonetic: Some("/ˈæp.əl/".to_string()),
        audio_url: Some("https://example.com/apple.mp3".to_string()),
        meanings: vec![MeaningGroup::single("noun", "A round fruit")],
        phonetics: vec![],
        detected_source_lang: Some("en".to_string()),
    }
}

fn sentence_backend(reply: &'static str) -> SentenceBackend {
    SentenceBackend::Generative(GenerativeAdapter::new(ScriptedBackend::new(reply)))
}

async fn memory_store() -> Arc<SqliteStore> {
    Arc::new(SqliteStore::in_memory().await.unwrap())
}

#[tokio::test]
async fn local_dictionary_resolves_and_persists() {
    let store = memory_store().await;
    let resolver = Resolver::new(store.clone(), sentence_backend("unused"))
        .with_source(Arc::new(ChineseDictionarySource::new(ecdict_with_hello().await)));

    let result = resolver.resolve("hello", "zh").await.unwrap();

    assert_eq!(result.phonetic.as_deref(), Some("/hə'ləʊ/"));
    assert_eq!(result.translation, "你好");
    assert_eq!(result.meanings.len(), 2);
    assert_eq!(result.meanings[0].part_of_speech, "int.");

    let cached = store.find_by_original("hello").await.unwrap().unwrap();
    assert!(!cached.starred);
    assert!(!cached.learned);
    assert_eq!(cached.to_lookup_result(), result);
}

#[tokio::test]
async fn second_lookup_is_served_from_cache() {
    let source = CountingSource::new("counting", Reply::Found(apple()));
    let translator = Arc::new(FakeTranslator::default());
    let resolver = Resolver::new(memory_store().await, sentence_backend("unused"))
        .with_source(source.clone())
        .with_translator(translator.clone());

    let first = resolver.resolve("apple", "zh").await.unwrap();
    let second = resolver.resolve("apple", "zh").await.unwrap();

    assert_eq!(first, second);
    assert_eq!(source.calls(), 1);
    assert_eq!(translator.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn sentences_skip_cache_and_dictionaries() {
    let store = memory_store().await;
    let source = CountingSource::new("counting", Reply::Found(apple()));
    let backend = ScriptedBackend::new("我爱读书");
    let resolver = Resolver::new(
        store.clone(),
        SentenceBackend::Generative(GenerativeAdapter::new(backend.clone())),
    )
    .with_source(source.clone());

    let result = resolver.resolve("I love reading books", "zh").await.unwrap();

    assert_eq!(result.translation, "我爱读书");
    assert!(result.meanings.is_empty());
    assert!(result.phonetics.is_empty());
    assert!(result.phonetic.is_none());
    assert_eq!(source.calls(), 0);
    assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
    assert!(store.list(100, 0).await.unwrap().is_empty());
}

#[tokio::test]
async fn malformed_generative_output_is_an_error() {
    let store = memory_store().await;
    let adapter = GenerativeAdapter::new(ScriptedBackend::new("Sure! Here is the word: run"));
    let resolver = Resolver::new(store.clone(), sentence_backend("unused"))
        .with_source(Arc::new(GenerativeSource::new(adapter)));

    let err = resolver.resolve("run", "zh").await.unwrap_err();

    assert!(matches!(err, ResolveError::Provider(e) if e.is_malformed()));
    assert!(store.find_by_original("run").await.unwrap().is_none());
}

#[tokio::test]
async fn generative_entry_with_null_fields_resolves() {
    let store = memory_store().await;
    let adapter = GenerativeAdapter::new(ScriptedBackend::new(
        r#"{"word": "run", "phonetic": null, "meanings": [{"partOfSpeech": "verb", "definitions": [{"definition": "跑", "example": null}]}]}"#,
    ));
    let resolver = Resolver::new(store.clone(), sentence_backend("unused"))
        .with_source(Arc::new(GenerativeSource::new(adapter)));

    let result = resolver.resolve("run", "zh").await.unwrap();

    assert_eq!(result.translation, "跑");
    assert_eq!(result.meanings[0].definitions[0].example, "");
    assert!(store.find_by_original("run").await.unwrap().is_some());
}

#[tokio::test]
async fn unqueryable_dictionary_falls_back_to_bare_translation() {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    let resolver = Resolver::new(memory_store().await, sentence_backend("unused"))
        .with_source(Arc::new(ChineseDictionarySource::new(Arc::new(
            EcDict::from_pool(pool),
        ))))
        .with_translator(Arc::new(FakeTranslator::default()));

    let result = resolver.resolve("hello", "zh").await.unwrap();

    assert_eq!(result.translation, "<hello>");
}

#[tokio::test]
async fn case_folds_for_dictionary_but_not_for_cache() {
    let store = memory_store().await;
    let resolver = Resolver::new(store.clone(), sentence_backend("unused"))
        .with_source(Arc::new(ChineseDictionarySource::new(ecdict_with_hello().await)));

    let lower = resolver.resolve("hello", "zh").await.unwrap();
    let title = resolver.resolve("Hello", "zh").await.unwrap();

    assert_eq!(lower, title);
    assert!(store.find_by_original("hello").await.unwrap().is_some());
    assert!(store.find_by_original("Hello").await.unwrap().is_some());
    assert_eq!(store.list(100, 0).await.unwrap().len(), 2);
}

#[tokio::test]
async fn local_dictionary_only_serves_chinese() {
    let local = CountingSource::chinese_only("local", Reply::Found(apple()));
    let fallback = CountingSource::new("generative", Reply::Found(apple()));
    let resolver = Resolver::new(memory_store().await, sentence_backend("unused"))
        .with_source(local.clone())
        .with_source(fallback.clone());

    resolver.resolve("apple", "ja").await.unwrap();
    assert_eq!(local.calls(), 0);
    assert_eq!(fallback.calls(), 1);

    resolver.resolve("pear", "zh-TW").await.unwrap();
    assert_eq!(local.calls(), 1);
    assert_eq!(fallback.calls(), 1);
}

#[tokio::test]
async fn transient_failure_falls_through_to_next_source() {
    let failing = CountingSource::new("remote", Reply::Transient);
    let working = CountingSource::new("generative", Reply::Found(apple()));
    let resolver = Resolver::new(memory_store().await, sentence_backend("unused"))
        .with_source(failing.clone())
        .with_source(working.clone());

    let result = resolver.resolve("apple", "zh").await.unwrap();

    assert_eq!(result, apple());
    assert_eq!(failing.calls(), 1);
    assert_eq!(working.calls(), 1);
}

#[tokio::test]
async fn exhausted_chain_propagates_last_error() {
    let translator = Arc::new(FakeTranslator::default());
    let resolver = Resolver::new(memory_store().await, sentence_backend("unused"))
        .with_source(CountingSource::new("empty", Reply::Empty))
        .with_source(CountingSource::new("remote", Reply::Transient))
        .with_translator(translator.clone());

    let err = resolver.resolve("apple", "zh").await.unwrap_err();

    assert!(matches!(err, ResolveError::Provider(ProviderError::Transient { ref provider, .. }) if provider == "remote"));
    assert_eq!(translator.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn no_data_anywhere_degrades_to_bare_translation() {
    let store = memory_store().await;
    let resolver = Resolver::new(store.clone(), sentence_backend("unused"))
        .with_source(CountingSource::new("empty", Reply::Empty))
        .with_translator(Arc::new(FakeTranslator::default()));

    let result = resolver.resolve("apple", "zh").await.unwrap();

    assert_eq!(result.translation, "<apple>");
    assert_eq!(result.detected_source_lang.as_deref(), Some("en"));
    assert!(result.meanings.is_empty());
    assert!(store.find_by_original("apple").await.unwrap().is_none());
}

#[tokio::test]
async fn no_data_and_failing_translator_is_offline() {
    let resolver = Resolver::new(memory_store().await, sentence_backend("unused"))
        .with_source(CountingSource::new("empty", Reply::Empty))
        .with_translator(Arc::new(FakeTranslator {
            fail: true,
            ..Default::default()
        }));

    let result = resolver.resolve("apple", "zh").await.unwrap();

    assert_eq!(result.translation, "[Offline] apple");
    assert_eq!(result.detected_source_lang.as_deref(), Some("auto"));
}

#[tokio::test]
async fn store_failure_does_not_fail_resolution() {
    let source = CountingSource::new("generative", Reply::Found(apple()));
    let resolver =
        Resolver::new(Arc::new(BrokenStore), sentence_backend("unused")).with_source(source.clone());

    assert_eq!(resolver.resolve("apple", "zh").await.unwrap(), apple());
    assert_eq!(resolver.resolve("apple", "zh").await.unwrap(), apple());
    assert_eq!(source.calls(), 2);
}

#[tokio::test]
async fn slow_source_times_out() {
    let resolver = Resolver::new(memory_store().await, sentence_backend("unused"))
        .with_source(CountingSource::new("slow", Reply::Slow))
        .with_adapter_timeout(Duration::from_millis(20));

    let err = resolver.resolve("apple", "zh").await.unwrap_err();

    assert!(matches!(err, ResolveError::Provider(ProviderError::Timeout { .. })));
}

#[tokio::test]
async fn remote_dictionary_translates_definitions() {
    let translator = Arc::new(FakeTranslator::default());
    let source = RemoteDictionarySource::new(Arc::new(FixedDictionary(apple())), translator.clone());

    let result = source
        .lookup("apple", &TargetLanguage::parse("zh"))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(result.translation, "<apple>");
    assert_eq!(result.meanings[0].definitions[0].definition, "<A round fruit>");
    assert_eq!(result.audio_url.as_deref(), Some("https://example.com/apple.mp3"));
    // one bare-word call, one batch
    assert_eq!(translator.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn remote_dictionary_keeps_english_for_english_target() {
    let translator = Arc::new(FakeTranslator::default());
    let source = RemoteDictionarySource::new(Arc::new(FixedDictionary(apple())), translator.clone());

    let result = source
        .lookup("apple", &TargetLanguage::parse("en"))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(result.translation, "A round fruit");
    assert_eq!(translator.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn machine_translated_sentences_degrade() {
    let resolver = Resolver::new(
        memory_store().await,
        SentenceBackend::MachineTranslation(Arc::new(FakeTranslator {
            fail: true,
            ..Default::default()
        })),
    );

    let result = resolver.resolve("I love reading books", "zh").await.unwrap();
    assert_eq!(result.translation, "[Offline] I love reading books");
}

#[tokio::test]
async fn generative_sentence_failure_propagates() {
    let resolver = Resolver::new(memory_store().await, sentence_backend("   "));

    let err = resolver.resolve("I love reading books", "zh").await.unwrap_err();
    assert!(matches!(err, ResolveError::Provider(_)));
}

#[tokio::test]
async fn blank_input_is_rejected() {
    let resolver = Resolver::new(memory_store().await, sentence_backend("unused"));
    assert!(matches!(
        resolver.resolve("   ", "zh").await,
        Err(ResolveError::EmptyInput)
    ));
}
