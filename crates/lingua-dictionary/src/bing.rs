use std::time::Duration;

use kuchiki::traits::*;
use kuchiki::{ElementData, NodeDataRef, NodeRef};
use lingua_core::dictionary::{Dictionary, DictionaryMetadata};
use lingua_core::error::ProviderError;
use lingua_core::gloss::{first_gloss, retain_non_empty};
use lingua_types::{LookupResult, MeaningGroup, Phonetic};

const NAME: &str = "Bing Dictionary";

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// English to Chinese dictionary scraped from the Bing dictionary page.
///
/// Like the other networked dictionaries it never fails a lookup: HTTP
/// errors and unrecognised pages are logged and reported as no data.
#[derive(Clone)]
pub struct BingDictionary {
    client: reqwest::Client,
    base_url: String,
}

impl BingDictionary {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_default();

        Self {
            client,
            base_url: base_url.into(),
        }
    }

    async fn fetch_page(&self, word: &str) -> Result<Option<String>, ProviderError> {
        let url = reqwest::Url::parse_with_params(&self.base_url, &[("q", word)])
            .map_err(|e| ProviderError::transient(NAME, e))?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ProviderError::transient(NAME, e))?;

        if response.status() != reqwest::StatusCode::OK {
            tracing::error!("Bing returned {} for '{}'", response.status(), word);
            return Ok(None);
        }

        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::transient(NAME, e))?;
        Ok(Some(body))
    }
}

#[async_trait::async_trait]
impl Dictionary for BingDictionary {
    async fn lookup(&self, word: &str) -> Result<Option<LookupResult>, ProviderError> {
        match self.fetch_page(word).await {
            Ok(Some(html)) => {
                let result = parse_page(&html);
                if result.is_none() {
                    tracing::debug!("{} page for '{}' has no definitions", NAME, word);
                }
                Ok(result)
            }
            Ok(None) => Ok(None),
            Err(e) => {
                tracing::error!("Bing scraping failed: {}", e);
                Ok(None)
            }
        }
    }

    fn metadata(&self) -> DictionaryMetadata {
        DictionaryMetadata {
            name: NAME.to_string(),
            language: "zh".to_string(),
            offline: false,
        }
    }
}

#[derive(Debug, Default)]
struct Pronunciations {
    us: Option<String>,
    uk: Option<String>,
    audio_url: Option<String>,
}

/// Shape a dictionary page into a lookup result.
///
/// Pages without a definition list (suggestions, web translations) are no data.
fn parse_page(html: &str) -> Option<LookupResult> {
    let document = kuchiki::parse_html().one(html);

    let meanings = retain_non_empty(definitions(&document));
    if meanings.is_empty() {
        return None;
    }

    let pron = pronunciations(&document);

    let mut phonetics = Vec::new();
    if let Some(us) = &pron.us {
        phonetics.push(Phonetic {
            text: us.clone(),
            audio: pron.audio_url.clone().unwrap_or_default(),
        });
    }
    if let Some(uk) = &pron.uk {
        phonetics.push(Phonetic {
            text: uk.clone(),
            audio: String::new(),
        });
    }

    Some(LookupResult {
        translation: first_gloss(&meanings).unwrap_or_default(),
        phonetic: pron.us.or(pron.uk),
        audio_url: pron.audio_url,
        meanings,
        phonetics,
        detected_source_lang: Some("en".to_string()),
    })
}

// <ul class="qdef_ul"><li><span class="pos">n.</span><span class="def">...</span></li></ul>
fn definitions(document: &NodeRef) -> Vec<MeaningGroup> {
    let Ok(list) = document.select_first("ul.qdef_ul") else {
        return Vec::new();
    };
    let Ok(items) = list.as_node().select("li") else {
        return Vec::new();
    };

    items
        .filter_map(|li| {
            let node = li.as_node();
            let pos = node.select_first("span.pos").ok()?;
            let def = node.select_first("span.def").ok()?;
            Some(MeaningGroup::single(
                pos.text_contents().trim(),
                def.text_contents().trim(),
            ))
        })
        .collect()
}

// <div class="hd_p1_1"><b>美</b><span>[..]</span><a onclick="..mp3.."></a><b>英</b>...</div>
fn pronunciations(document: &NodeRef) -> Pronunciations {
    let mut pron = Pronunciations::default();

    let Ok(header) = document.select_first("div.hd_p1_1") else {
        return pron;
    };
    let Ok(labels) = header.as_node().select("b") else {
        return pron;
    };

    for label in labels {
        let text = label.text_contents();
        let Some(span) = next_sibling(label.as_node(), "span") else {
            continue;
        };
        let phonetic = bracketed_to_slashed(span.text_contents().trim());

        if text.contains('美') {
            pron.us = Some(phonetic).filter(|p| !p.is_empty());
            pron.audio_url = next_sibling(span.as_node(), "a").and_then(|a| audio_link(&a));
        } else if text.contains('英') {
            pron.uk = Some(phonetic).filter(|p| !p.is_empty());
        }
    }

    pron
}

fn next_sibling(node: &NodeRef, tag: &str) -> Option<NodeDataRef<ElementData>> {
    node.following_siblings()
        .elements()
        .find(|element| &*element.name.local == tag)
}

fn bracketed_to_slashed(text: &str) -> String {
    text.replace(['[', ']'], "/")
}

/// The mp3 url embedded in a player link's script handler
fn audio_link(anchor: &NodeDataRef<ElementData>) -> Option<String> {
    let attributes = anchor.attributes.borrow();
    let handler = attributes
        .get("onclick")
        .or_else(|| attributes.get("onmouseover"))?;

    let start = handler.find("http")?;
    let end = handler[start..].find(".mp3")? + start + ".mp3".len();
    Some(handler[start..end].to_string())
}
