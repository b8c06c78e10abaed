use lingua_core::ProviderError;

#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("Text must not be empty")]
    EmptyInput,

    #[error(transparent)]
    Provider(#[from] ProviderError),
}
