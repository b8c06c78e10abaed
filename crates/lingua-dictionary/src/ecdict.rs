//! Offline English-Chinese dictionary backed by the ECDICT SQLite dataset.
//!
//! The dataset is the `stardict` table of the upstream release
//! (https://github.com/skywind3000/ECDICT/releases). It is opened read-only;
//! when the file is missing the adapter stays usable and reports no data.

use std::path::Path;
use std::sync::LazyLock;

use lingua_core::dictionary::{Dictionary, DictionaryMetadata};
use lingua_core::error::ProviderError;
use lingua_core::gloss::first_gloss;
use lingua_core::preprocess::{DictionaryKey, Preprocessor};
use lingua_types::{LookupResult, MeaningGroup};
use regex::Regex;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

const NAME: &str = "ECDICT";

/// `n. apple`, `vt. to harvest`, `abbr. ...`
static POS_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z]{1,6})\.\s+(\S.*)$").expect("valid regex"));

pub struct EcDict {
    pool: Option<SqlitePool>,
}

impl EcDict {
    /// Open the dataset at `path`, degrading to an empty dictionary if absent
    pub async fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            tracing::warn!("ECDICT database not found at {}", path.display());
            tracing::warn!(
                "Download ecdict-sqlite-28.zip from https://github.com/skywind3000/ECDICT/releases and extract stardict.db"
            );
            return Self { pool: None };
        }

        let options = SqliteConnectOptions::new()
            .filename(&path)
            .read_only(true);

        match SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await
        {
            Ok(pool) => {
                tracing::info!("Loaded ECDICT from {}", path.display());
                Self { pool: Some(pool) }
            }
            Err(e) => {
                tracing::error!("Failed to open ECDICT at {}: {}", path.display(), e);
                Self { pool: None }
            }
        }
    }

    /// Use an already connected pool holding a `stardict` table
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool: Some(pool) }
    }

    pub fn is_available(&self) -> bool {
        self.pool.is_some()
    }

    /// Case-insensitive exact lookup
    pub async fn find(&self, word: &str) -> Result<Option<EcdictEntry>, ProviderError> {
        let Some(pool) = &self.pool else {
            return Ok(None);
        };

        let key = DictionaryKey.process(word);
        if key.is_empty() {
            return Ok(None);
        }

        let row: Result<Option<StardictRow>, sqlx::Error> = sqlx::query_as(
            "SELECT word, phonetic, translation, pos FROM stardict WHERE word = ? COLLATE NOCASE LIMIT 1",
        )
        .bind(&key)
        .fetch_optional(pool)
        .await;

        // A dataset that exists but cannot be queried is no data, like a missing one
        match row {
            Ok(Some(row)) => Ok(Some(EcdictEntry::from(row))),
            Ok(None) => {
                tracing::info!("Word '{}' not found in ECDICT", word);
                Ok(None)
            }
            Err(e) => {
                tracing::error!("ECDICT query failed for '{}': {}", word, e);
                Ok(None)
            }
        }
    }
}

#[async_trait::async_trait]
impl Dictionary for EcDict {
    async fn lookup(&self, word: &str) -> Result<Option<LookupResult>, ProviderError> {
        let Some(entry) = self.find(word).await? else {
            return Ok(None);
        };

        tracing::debug!("ECDICT '{}' pos ranking: {:?}", entry.word, entry.pos);
        Ok(Some(entry.to_lookup_result()))
    }

    fn metadata(&self) -> DictionaryMetadata {
        DictionaryMetadata {
            name: NAME.to_string(),
            language: "zh".to_string(),
            offline: true,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct StardictRow {
    word: String,
    phonetic: Option<String>,
    translation: Option<String>,
    pos: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EcdictEntry {
    pub word: String,
    /// Always `/.../` formatted, empty if the dataset has none
    pub phonetic: String,
    /// Raw packed translation blob
    pub translation: String,
    /// Part-of-speech frequency ranking, most frequent first
    pub pos: Vec<PosFrequency>,
}

impl From<StardictRow> for EcdictEntry {
    fn from(row: StardictRow) -> Self {
        Self {
            word: row.word,
            phonetic: format_phonetic(row.phonetic.as_deref().unwrap_or_default()),
            translation: row.translation.unwrap_or_default(),
            pos: parse_pos(row.pos.as_deref().unwrap_or_default()),
        }
    }
}

impl EcdictEntry {
    pub fn meanings(&self) -> Vec<MeaningGroup> {
        parse_translation(&self.translation)
    }

    pub fn to_lookup_result(&self) -> LookupResult {
        let meanings = self.meanings();
        LookupResult {
            translation: first_gloss(&meanings).unwrap_or_default(),
            phonetic: (!self.phonetic.is_empty()).then(|| self.phonetic.clone()),
            audio_url: None,
            meanings,
            phonetics: vec![],
            detected_source_lang: Some("en".to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PosFrequency {
    pub pos: String,
    pub frequency: u32,
}

/// Parse `n:46/v:54` into a ranking sorted by descending frequency
pub fn parse_pos(pos: &str) -> Vec<PosFrequency> {
    let mut ranking: Vec<PosFrequency> = pos
        .split('/')
        .filter_map(|part| {
            let (tag, freq) = part.split_once(':')?;
            let frequency = freq.trim().parse().ok()?;
            Some(PosFrequency {
                pos: tag.trim().to_string(),
                frequency,
            })
        })
        .collect();

    ranking.sort_by(|a, b| b.frequency.cmp(&a.frequency));
    ranking
}

/// Group a packed translation blob by its part-of-speech markers.
///
/// A marked line opens a group, unmarked lines extend the open group and are
/// joined with "; ". Lines before the first marker have no group and are
/// skipped. A blob with no marker at all becomes one "general" group.
pub fn parse_translation(blob: &str) -> Vec<MeaningGroup> {
    let normalized = blob.replace("\\n", "\n");
    let mut meanings = Vec::new();
    let mut current: Option<(String, Vec<String>)> = None;

    for line in normalized.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(caps) = POS_MARKER.captures(line) {
            if let Some((pos, defs)) = current.take() {
                meanings.push(MeaningGroup::single(pos, defs.join("; ")));
            }
            current = Some((format!("{}.", &caps[1]), vec![caps[2].trim().to_string()]));
        } else if let Some((_, defs)) = current.as_mut() {
            defs.push(line.to_string());
        }
    }

    if let Some((pos, defs)) = current {
        meanings.push(MeaningGroup::single(pos, defs.join("; ")));
    }

    if meanings.is_empty() {
        let whole = normalized
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect::<Vec<_>>()
            .join("; ");
        if !whole.is_empty() {
            meanings.push(MeaningGroup::single("general", whole));
        }
    }

    meanings
}

fn format_phonetic(phonetic: &str) -> String {
    let phonetic = phonetic.trim();
    if phonetic.is_empty() || phonetic.starts_with('/') {
        phonetic.to_string()
    } else {
        format!("/{}/", phonetic)
    }
}
