use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Provider-agnostic result of resolving a word or a sentence
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupResult {
    /// Best single-line gloss
    pub translation: String,
    pub phonetic: Option<String>,
    #[serde(rename = "audioUrl")]
    pub audio_url: Option<String>,
    /// Provider-declared order, may be empty
    #[serde(default)]
    pub meanings: Vec<MeaningGroup>,
    #[serde(default)]
    pub phonetics: Vec<Phonetic>,
    #[serde(rename = "detectedSourceLang")]
    pub detected_source_lang: Option<String>,
}

impl LookupResult {
    /// Sentence-style result: translation only, every dictionary field empty
    pub fn translation_only(translation: String, detected_source_lang: Option<String>) -> Self {
        Self {
            translation,
            detected_source_lang,
            ..Self::default()
        }
    }

    pub fn has_meanings(&self) -> bool {
        !self.meanings.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeaningGroup {
    /// Free-form tag such as "n." or "verb"
    pub part_of_speech: String,
    pub definitions: Vec<DefinitionEntry>,
}

impl MeaningGroup {
    pub fn single(part_of_speech: impl Into<String>, definition: impl Into<String>) -> Self {
        Self {
            part_of_speech: part_of_speech.into(),
            definitions: vec![DefinitionEntry::new(definition)],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefinitionEntry {
    pub definition: String,
    /// Empty string when the provider has no example
    #[serde(default)]
    pub example: String,
}

impl DefinitionEntry {
    pub fn new(definition: impl Into<String>) -> Self {
        Self {
            definition: definition.into(),
            example: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Phonetic {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub audio: String,
}

/// Persisted resolution of a single word plus the user-state flags
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedWord {
    pub id: Uuid,
    pub original: String,
    pub translation: String,
    pub phonetic: Option<String>,
    #[serde(rename = "audioUrl")]
    pub audio_url: Option<String>,
    pub meanings: Vec<MeaningGroup>,
    pub phonetics: Vec<Phonetic>,
    #[serde(rename = "detectedSourceLang")]
    pub detected_source_lang: Option<String>,
    pub context: Option<String>,
    pub url: Option<String>,
    /// Seconds since epoch, set once at creation
    pub timestamp: f64,
    pub learned: bool,
    pub starred: bool,
}

impl CachedWord {
    /// The cached payload exactly as it was stored
    pub fn to_lookup_result(&self) -> LookupResult {
        LookupResult {
            translation: self.translation.clone(),
            phonetic: self.phonetic.clone(),
            audio_url: self.audio_url.clone(),
            meanings: self.meanings.clone(),
            phonetics: self.phonetics.clone(),
            detected_source_lang: self.detected_source_lang.clone(),
        }
    }
}

/// Insert payload for the word store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWord {
    pub original: String,
    pub translation: String,
    #[serde(default)]
    pub phonetic: Option<String>,
    #[serde(default, rename = "audioUrl")]
    pub audio_url: Option<String>,
    #[serde(default)]
    pub meanings: Vec<MeaningGroup>,
    #[serde(default)]
    pub phonetics: Vec<Phonetic>,
    #[serde(default, rename = "detectedSourceLang")]
    pub detected_source_lang: Option<String>,
    #[serde(default)]
    pub context: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl NewWord {
    pub fn from_lookup(original: impl Into<String>, result: &LookupResult) -> Self {
        Self {
            original: original.into(),
            translation: result.translation.clone(),
            phonetic: result.phonetic.clone(),
            audio_url: result.audio_url.clone(),
            meanings: result.meanings.clone(),
            phonetics: result.phonetics.clone(),
            detected_source_lang: result.detected_source_lang.clone(),
            context: None,
            url: None,
        }
    }
}

/// The only fields that may change after a word is stored
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordFlagsPatch {
    #[serde(default)]
    pub learned: Option<bool>,
    #[serde(default)]
    pub starred: Option<bool>,
}

impl WordFlagsPatch {
    pub fn is_empty(&self) -> bool {
        self.learned.is_none() && self.starred.is_none()
    }
}

fn default_target_language() -> String {
    "zh".to_string()
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default = "default_target_language")]
    pub target_language: String,
    #[serde(default = "default_true")]
    pub highlight_enabled: bool,
    #[serde(default)]
    pub immersion_mode: bool,
    #[serde(default = "default_true")]
    pub youtube_subtitles_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            target_language: default_target_language(),
            highlight_enabled: true,
            immersion_mode: false,
            youtube_subtitles_enabled: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdate {
    pub target_language: Option<String>,
    pub highlight_enabled: Option<bool>,
    pub immersion_mode: Option<bool>,
    pub youtube_subtitles_enabled: Option<bool>,
}

impl Settings {
    pub fn apply(&mut self, update: SettingsUpdate) {
        if let Some(target_language) = update.target_language {
            self.target_language = target_language;
        }
        if let Some(highlight_enabled) = update.highlight_enabled {
            self.highlight_enabled = highlight_enabled;
        }
        if let Some(immersion_mode) = update.immersion_mode {
            self.immersion_mode = immersion_mode;
        }
        if let Some(youtube_subtitles_enabled) = update.youtube_subtitles_enabled {
            self.youtube_subtitles_enabled = youtube_subtitles_enabled;
        }
    }
}
