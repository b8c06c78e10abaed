pub mod bing;
pub mod ecdict;
pub mod free_dictionary;

pub use bing::BingDictionary;
pub use ecdict::{EcDict, EcdictEntry, PosFrequency};
pub use free_dictionary::FreeDictionary;
