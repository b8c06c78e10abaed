use lingua_types::LookupResult;

use crate::error::ProviderError;

/// Structured word lookup against one dictionary provider
#[async_trait::async_trait]
pub trait Dictionary: Send + Sync {
    /// Look up a single word.
    ///
    /// `Ok(None)` means the provider has nothing for it. The returned
    /// result carries dictionary fields only; `translation` may be empty.
    async fn lookup(&self, word: &str) -> Result<Option<LookupResult>, ProviderError>;

    /// Dictionary metadata
    fn metadata(&self) -> DictionaryMetadata;
}

#[derive(Debug, Clone)]
pub struct DictionaryMetadata {
    pub name: String,
    /// Language the definitions are written in, e.g. "zh" or "en"
    pub language: String,
    pub offline: bool,
}
