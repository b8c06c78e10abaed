pub mod error;
pub mod policy;
pub mod resolver;
pub mod sources;

pub use error::ResolveError;
pub use policy::FallbackPolicy;
pub use resolver::{Resolver, SentenceBackend};
pub use sources::{GenerativeSource, ChineseDictionarySource, RemoteDictionarySource, WordSource};

#[cfg(test)]
mod tests;
