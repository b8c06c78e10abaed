pub mod dictionary;
pub mod error;
pub mod gloss;
pub mod language;
pub mod preprocess;

pub use dictionary::{Dictionary, DictionaryMetadata};
pub use error::ProviderError;
pub use language::{InputKind, TargetLanguage, classify};
