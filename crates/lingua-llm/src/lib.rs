pub mod adapter;
pub mod backend;
pub mod gemini;
pub mod openrouter;
pub mod prompts;
pub mod registry;
pub mod sanitize;

pub use adapter::{GeneratedEntry, GenerativeAdapter};
pub use backend::{LlmBackend, LlmError};
pub use gemini::GeminiBackend;
pub use openrouter::OpenRouterBackend;
pub use registry::ProviderRegistry;
