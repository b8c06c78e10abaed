use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use lingua_core::{ProviderError, TargetLanguage};
use lingua_llm::{GenerativeAdapter, LlmBackend, LlmError};
use lingua_resolver::{Resolver, SentenceBackend, WordSource};
use lingua_store::SqliteStore;
use lingua_types::{LookupResult, MeaningGroup};
use serde_json::{Value, json};
use tower::ServiceExt;

use crate::controller::router;
use crate::state::AppState;

struct FixedSource {
    calls: AtomicUsize,
}

#[async_trait::async_trait]
impl WordSource for FixedSource {
    fn name(&self) -> &str {
        "fixed"
    }

    async fn lookup(
        &self,
        word: &str,
        _target: &TargetLanguage,
    ) -> Result<Option<LookupResult>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if word != "hello" {
            return Ok(None);
        }
        Ok(Some(LookupResult {
            translation: "你好".to_string(),
            phonetic: Some("/hə'ləʊ/".to_string()),
            audio_url: None,
            meanings: vec![MeaningGroup::single("int.", "你好; 喂")],
            phonetics: vec![],
            detected_source_lang: Some("en".to_string()),
        }))
    }
}

struct EchoBackend(&'static str);

impl LlmBackend for EchoBackend {
    fn name(&self) -> &str {
        "echo"
    }

    fn generate(&self, _prompt: &str) -> Result<String, LlmError> {
        Ok(self.0.to_string())
    }
}

async fn app(sentence_reply: &'static str) -> (Router, Arc<FixedSource>) {
    let store = Arc::new(SqliteStore::in_memory().await.unwrap());
    let source = Arc::new(FixedSource {
        calls: AtomicUsize::new(0),
    });
    let sentences =
        SentenceBackend::Generative(GenerativeAdapter::new(Arc::new(EchoBackend(sentence_reply))));
    let resolver = Resolver::new(store.clone(), sentences).with_source(source.clone());

    let state = AppState {
        resolver: Arc::new(resolver),
        words: store.clone(),
        settings: store,
    };

    (router(state), source)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            request = request.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, value)
}

#[tokio::test]
async fn root_reports_service() {
    let (app, _) = app("").await;
    let (status, body) = send(&app, "GET", "/", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok", "service": "LinguaLearn API" }));
}

#[tokio::test]
async fn translate_word_uses_wire_names_and_caches() {
    let (app, source) = app("").await;

    let (status, first) = send(&app, "POST", "/api/translate", Some(json!({ "text": "hello" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["translation"], "你好");
    assert_eq!(first["phonetic"], "/hə'ləʊ/");
    assert_eq!(first["detectedSourceLang"], "en");
    assert_eq!(first["meanings"][0]["partOfSpeech"], "int.");
    assert!(first.get("audioUrl").is_some());

    let (_, second) = send(
        &app,
        "POST",
        "/api/translate",
        Some(json!({ "text": "hello", "targetLang": "zh" })),
    )
    .await;
    assert_eq!(first, second);
    assert_eq!(source.calls.load(Ordering::SeqCst), 1);

    let (_, words) = send(&app, "GET", "/api/words", None).await;
    assert_eq!(words.as_array().unwrap().len(), 1);
    assert_eq!(words[0]["original"], "hello");
    assert_eq!(words[0]["starred"], false);
}

#[tokio::test]
async fn translate_sentence_returns_translation_only() {
    let (app, source) = app("<think>ok</think>我爱读书").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/translate",
        Some(json!({ "text": "I love reading books", "targetLang": "zh" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["translation"], "我爱读书");
    assert_eq!(body["meanings"], json!([]));
    assert_eq!(body["phonetics"], json!([]));
    assert_eq!(source.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn empty_text_is_a_bad_request() {
    let (app, _) = app("").await;
    let (status, body) = send(&app, "POST", "/api/translate", Some(json!({ "text": "  " }))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn failed_sentence_is_a_server_error() {
    let (app, _) = app("").await;
    let (status, body) = send(
        &app,
        "POST",
        "/api/translate",
        Some(json!({ "text": "I love reading books" })),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["detail"].as_str().unwrap().contains("echo"));
}

#[tokio::test]
async fn word_lifecycle() {
    let (app, _) = app("").await;
    let word = json!({ "original": "apple", "translation": "苹果", "context": "an apple a day" });

    let (status, created) = send(&app, "POST", "/api/words", Some(word.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["learned"], false);
    assert_eq!(created["meanings"], json!([]));

    let (_, again) = send(&app, "POST", "/api/words", Some(word)).await;
    assert_eq!(again["id"], created["id"]);

    let id = created["id"].as_str().unwrap();
    let (status, patched) = send(
        &app,
        "PATCH",
        &format!("/api/words/{id}"),
        Some(json!({ "starred": true })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(patched["starred"], true);
    assert_eq!(patched["translation"], "苹果");

    let (status, body) = send(&app, "DELETE", &format!("/api/words/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Word deleted");

    let (status, body) = send(&app, "DELETE", &format!("/api/words/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Word not found");

    let (status, _) = send(
        &app,
        "PATCH",
        &format!("/api/words/{id}"),
        Some(json!({ "learned": true })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn settings_defaults_and_update() {
    let (app, _) = app("").await;

    let (status, settings) = send(&app, "GET", "/api/settings", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        settings,
        json!({
            "targetLanguage": "zh",
            "highlightEnabled": true,
            "immersionMode": false,
            "youtubeSubtitlesEnabled": true
        })
    );

    let (_, updated) = send(
        &app,
        "PUT",
        "/api/settings",
        Some(json!({ "targetLanguage": "ja", "youtubeSubtitlesEnabled": false })),
    )
    .await;
    assert_eq!(updated["targetLanguage"], "ja");
    assert_eq!(updated["youtubeSubtitlesEnabled"], false);
    assert_eq!(updated["highlightEnabled"], true);
}
