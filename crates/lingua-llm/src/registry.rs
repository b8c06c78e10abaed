use std::collections::HashMap;
use std::sync::Arc;

use crate::backend::LlmBackend;

/// Named generative backends with a default.
///
/// Unknown names resolve to the default backend instead of failing.
#[derive(Clone)]
pub struct ProviderRegistry {
    backends: HashMap<String, Arc<dyn LlmBackend>>,
    default: String,
}

impl ProviderRegistry {
    pub fn new(default: impl Into<String>) -> Self {
        Self {
            backends: HashMap::new(),
            default: default.into(),
        }
    }

    pub fn register(mut self, name: impl Into<String>, backend: Arc<dyn LlmBackend>) -> Self {
        self.backends.insert(name.into(), backend);
        self
    }

    pub fn default_name(&self) -> &str {
        &self.default
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn LlmBackend>> {
        if let Some(backend) = self.backends.get(name) {
            return Some(backend.clone());
        }

        tracing::warn!(
            "Unknown LLM provider '{}', using default '{}'",
            name,
            self.default
        );
        self.backends.get(&self.default).cloned()
    }

    pub fn default_backend(&self) -> Option<Arc<dyn LlmBackend>> {
        self.backends.get(&self.default).cloned()
    }
}
