use std::time::Duration;

/// Failure reported by a provider adapter.
///
/// A miss is not an error: adapters return `Ok(None)` for that.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ProviderError {
    /// Network failure or non-success status from a remote provider
    #[error("{provider} unavailable: {message}")]
    Transient { provider: String, message: String },

    /// Provider answered with data that does not fit the canonical shape
    #[error("{provider} returned malformed data: {message}")]
    Malformed { provider: String, message: String },

    #[error("{provider} timed out after {elapsed:?}")]
    Timeout { provider: String, elapsed: Duration },
}

impl ProviderError {
    pub fn transient(provider: impl Into<String>, message: impl ToString) -> Self {
        Self::Transient {
            provider: provider.into(),
            message: message.to_string(),
        }
    }

    pub fn malformed(provider: impl Into<String>, message: impl ToString) -> Self {
        Self::Malformed {
            provider: provider.into(),
            message: message.to_string(),
        }
    }

    pub fn provider(&self) -> &str {
        match self {
            Self::Transient { provider, .. }
            | Self::Malformed { provider, .. }
            | Self::Timeout { provider, .. } => provider,
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed { .. })
    }
}
