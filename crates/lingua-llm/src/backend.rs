/// Text-generation backend.
///
/// Calls block the calling thread for the whole round trip; async callers go
/// through [`crate::GenerativeAdapter`], which moves them onto the blocking pool.
pub trait LlmBackend: Send + Sync {
    /// Registry name, e.g. "gemini"
    fn name(&self) -> &str;

    /// Complete `prompt` at temperature 0 and return the raw model text
    fn generate(&self, prompt: &str) -> Result<String, LlmError>;
}

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("{0} is not configured: missing API key")]
    NotConfigured(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("API error: {0}")]
    Api(String),

    #[error("Empty response from model")]
    EmptyResponse,
}
