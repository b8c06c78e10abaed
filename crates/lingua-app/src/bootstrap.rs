use std::sync::Arc;

use anyhow::anyhow;
use lingua_config::Config;
use lingua_config::translator::TranslatorConfig;
use lingua_dictionary::{BingDictionary, EcDict, FreeDictionary};
use lingua_llm::{GeminiBackend, GenerativeAdapter, OpenRouterBackend, ProviderRegistry};
use lingua_resolver::{
    ChineseDictionarySource, GenerativeSource, RemoteDictionarySource, Resolver, SentenceBackend,
};
use lingua_store::WordStore;
use lingua_translator::{DeepLTranslator, GoogleTranslator, Translator};

const FALLBACK_LLM_PROVIDER: &str = "openrouter";

/// Wire adapters into a resolver in priority order:
/// local dictionary, Bing, remote dictionary, generative model
pub async fn build_resolver(
    config: &Config,
    store: Arc<dyn WordStore>,
) -> anyhow::Result<Resolver> {
    let request_timeout = config.network.request_timeout();
    let translator = build_translator(&config.translator, request_timeout);
    let registry = build_registry(config);

    let backend = registry
        .get(&config.llm.default_provider)
        .ok_or_else(|| anyhow!("no LLM backend named '{}'", registry.default_name()))?;
    let adapter = GenerativeAdapter::new(backend);

    let sentences = match (config.llm.sentence_backend.as_str(), &translator) {
        ("translator", Some(translator)) => SentenceBackend::MachineTranslation(translator.clone()),
        ("translator", None) => {
            tracing::warn!("SENTENCE_BACKEND=translator but the translator is disabled, using LLM");
            SentenceBackend::Generative(adapter.clone())
        }
        ("llm", _) => SentenceBackend::Generative(adapter.clone()),
        (other, _) => {
            tracing::warn!("Unknown sentence backend '{}', using LLM", other);
            SentenceBackend::Generative(adapter.clone())
        }
    };
    tracing::info!("Sentence backend: {}", sentences.name());

    let mut resolver = Resolver::new(store, sentences)
        .with_adapter_timeout(config.network.adapter_timeout());

    if config.dictionary.local_enabled {
        let ecdict = EcDict::open(&config.dictionary.local_path).await;
        resolver = resolver.with_source(Arc::new(ChineseDictionarySource::new(Arc::new(ecdict))));
    }

    if config.dictionary.bing_enabled {
        let bing = BingDictionary::new(&config.dictionary.bing_url, request_timeout);
        resolver = resolver.with_source(Arc::new(ChineseDictionarySource::new(Arc::new(bing))));
    }

    match (&translator, config.dictionary.remote_enabled) {
        (Some(translator), true) => {
            let dictionary = FreeDictionary::new(&config.dictionary.remote_url, request_timeout);
            resolver = resolver.with_source(Arc::new(RemoteDictionarySource::new(
                Arc::new(dictionary),
                translator.clone(),
            )));
        }
        (None, true) => {
            tracing::info!("Remote dictionary needs the translator, skipping it");
        }
        _ => {}
    }

    resolver = resolver.with_source(Arc::new(GenerativeSource::new(adapter)));

    if let Some(translator) = translator {
        resolver = resolver.with_translator(translator);
    }

    tracing::info!("Word sources: {}", resolver.source_names().join(" -> "));
    Ok(resolver)
}

fn build_translator(
    config: &TranslatorConfig,
    timeout: std::time::Duration,
) -> Option<Arc<dyn Translator>> {
    if !config.enabled {
        tracing::info!("Machine translation disabled");
        return None;
    }

    let api_url = Some(config.api_url.clone());
    let translator: Arc<dyn Translator> = match config.provider.as_str() {
        "deepl" => Arc::new(DeepLTranslator::new(config.api_key.clone(), api_url, timeout)),
        "google" => Arc::new(GoogleTranslator::new(api_url, timeout)),
        other => {
            tracing::warn!("Unknown translator provider '{}', using google", other);
            Arc::new(GoogleTranslator::new(api_url, timeout))
        }
    };

    tracing::info!("Translator: {}", translator.metadata().name);
    Some(translator)
}

pub(crate) fn build_registry(config: &Config) -> ProviderRegistry {
    let timeout = config.network.request_timeout();
    let gemini = &config.llm.gemini;
    let openrouter = &config.llm.openrouter;

    ProviderRegistry::new(FALLBACK_LLM_PROVIDER)
        .register(
            "gemini",
            Arc::new(GeminiBackend::new(
                gemini.api_key.clone(),
                gemini.model.clone(),
                gemini.base_url.clone(),
                timeout,
            )),
        )
        .register(
            "openrouter",
            Arc::new(OpenRouterBackend::new(
                openrouter.api_key.clone(),
                openrouter.model.clone(),
                openrouter.base_url.clone(),
                timeout,
            )),
        )
}
