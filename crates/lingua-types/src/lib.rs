pub mod types;

pub use types::{
    CachedWord, DefinitionEntry, LookupResult, MeaningGroup, NewWord, Phonetic, Settings,
    SettingsUpdate, WordFlagsPatch,
};
