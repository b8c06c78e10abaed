use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use lingua_types::{CachedWord, NewWord, Settings, SettingsUpdate, WordFlagsPatch};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use uuid::Uuid;

use crate::error::StoreError;
use crate::store::{SettingsStore, WordStore};

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS words (
        id TEXT PRIMARY KEY NOT NULL,
        original TEXT NOT NULL,
        translation TEXT NOT NULL,
        phonetic TEXT,
        audio_url TEXT,
        meanings TEXT NOT NULL DEFAULT '[]',
        phonetics TEXT NOT NULL DEFAULT '[]',
        detected_source_lang TEXT,
        context TEXT,
        url TEXT,
        timestamp REAL NOT NULL,
        learned INTEGER NOT NULL DEFAULT 0,
        starred INTEGER NOT NULL DEFAULT 0
    )",
    "CREATE INDEX IF NOT EXISTS idx_words_original ON words (original)",
    "CREATE TABLE IF NOT EXISTS settings (
        id INTEGER PRIMARY KEY NOT NULL,
        target_language TEXT NOT NULL,
        highlight_enabled INTEGER NOT NULL,
        immersion_mode INTEGER NOT NULL,
        youtube_subtitles_enabled INTEGER NOT NULL
    )",
];

const WORD_COLUMNS: &str = "id, original, translation, phonetic, audio_url, meanings, phonetics, \
     detected_source_lang, context, url, timestamp, learned, starred";

const SETTINGS_ID: i64 = 1;

#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Connect to `url`, creating the file and tables when missing
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.migrate().await?;
        tracing::info!("Connected to word store at {}", url);
        Ok(store)
    }

    /// Private database living as long as the store
    pub async fn in_memory() -> Result<Self, StoreError> {
        // Every connection to :memory: is its own database, so keep exactly one alive
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn migrate(&self) -> Result<(), StoreError> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct WordRow {
    id: String,
    original: String,
    translation: String,
    phonetic: Option<String>,
    audio_url: Option<String>,
    meanings: String,
    phonetics: String,
    detected_source_lang: Option<String>,
    context: Option<String>,
    url: Option<String>,
    timestamp: f64,
    learned: bool,
    starred: bool,
}

impl TryFrom<WordRow> for CachedWord {
    type Error = StoreError;

    fn try_from(row: WordRow) -> Result<Self, Self::Error> {
        Ok(CachedWord {
            id: Uuid::parse_str(&row.id).map_err(|e| StoreError::corrupt("id", e))?,
            original: row.original,
            translation: row.translation,
            phonetic: row.phonetic,
            audio_url: row.audio_url,
            meanings: serde_json::from_str(&row.meanings)
                .map_err(|e| StoreError::corrupt("meanings", e))?,
            phonetics: serde_json::from_str(&row.phonetics)
                .map_err(|e| StoreError::corrupt("phonetics", e))?,
            detected_source_lang: row.detected_source_lang,
            context: row.context,
            url: row.url,
            timestamp: row.timestamp,
            learned: row.learned,
            starred: row.starred,
        })
    }
}

#[derive(sqlx::FromRow)]
struct SettingsRow {
    target_language: String,
    highlight_enabled: bool,
    immersion_mode: bool,
    youtube_subtitles_enabled: bool,
}

impl From<SettingsRow> for Settings {
    fn from(row: SettingsRow) -> Self {
        Settings {
            target_language: row.target_language,
            highlight_enabled: row.highlight_enabled,
            immersion_mode: row.immersion_mode,
            youtube_subtitles_enabled: row.youtube_subtitles_enabled,
        }
    }
}

fn now_seconds() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or_default()
}

#[async_trait::async_trait]
impl WordStore for SqliteStore {
    async fn find_by_original(&self, original: &str) -> Result<Option<CachedWord>, StoreError> {
        let row: Option<WordRow> = sqlx::query_as(&format!(
            "SELECT {WORD_COLUMNS} FROM words WHERE original = ? ORDER BY timestamp ASC, rowid ASC LIMIT 1"
        ))
        .bind(original)
        .fetch_optional(&self.pool)
        .await?;

        row.map(CachedWord::try_from).transpose()
    }

    async fn insert(&self, word: NewWord) -> Result<CachedWord, StoreError> {
        let meanings =
            serde_json::to_string(&word.meanings).map_err(|e| StoreError::corrupt("meanings", e))?;
        let phonetics = serde_json::to_string(&word.phonetics)
            .map_err(|e| StoreError::corrupt("phonetics", e))?;

        let cached = CachedWord {
            id: Uuid::new_v4(),
            original: word.original,
            translation: word.translation,
            phonetic: word.phonetic,
            audio_url: word.audio_url,
            meanings: word.meanings,
            phonetics: word.phonetics,
            detected_source_lang: word.detected_source_lang,
            context: word.context,
            url: word.url,
            timestamp: now_seconds(),
            learned: false,
            starred: false,
        };

        sqlx::query(&format!(
            "INSERT INTO words ({WORD_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
        ))
        .bind(cached.id.to_string())
        .bind(&cached.original)
        .bind(&cached.translation)
        .bind(&cached.phonetic)
        .bind(&cached.audio_url)
        .bind(meanings)
        .bind(phonetics)
        .bind(&cached.detected_source_lang)
        .bind(&cached.context)
        .bind(&cached.url)
        .bind(cached.timestamp)
        .bind(cached.learned)
        .bind(cached.starred)
        .execute(&self.pool)
        .await?;

        tracing::debug!("Stored '{}' as {}", cached.original, cached.id);
        Ok(cached)
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<CachedWord>, StoreError> {
        let rows: Vec<WordRow> = sqlx::query_as(&format!(
            "SELECT {WORD_COLUMNS} FROM words ORDER BY timestamp DESC, rowid DESC LIMIT ? OFFSET ?"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(CachedWord::try_from).collect()
    }

    async fn get(&self, id: Uuid) -> Result<Option<CachedWord>, StoreError> {
        let row: Option<WordRow> =
            sqlx::query_as(&format!("SELECT {WORD_COLUMNS} FROM words WHERE id = ?"))
                .bind(id.to_string())
                .fetch_optional(&self.pool)
                .await?;

        row.map(CachedWord::try_from).transpose()
    }

    async fn update_flags(
        &self,
        id: Uuid,
        patch: WordFlagsPatch,
    ) -> Result<Option<CachedWord>, StoreError> {
        if patch.is_empty() {
            return self.get(id).await;
        }

        let result = sqlx::query(
            "UPDATE words SET learned = COALESCE(?, learned), starred = COALESCE(?, starred) WHERE id = ?",
        )
        .bind(patch.learned)
        .bind(patch.starred)
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get(id).await
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM words WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait::async_trait]
impl SettingsStore for SqliteStore {
    async fn settings(&self) -> Result<Settings, StoreError> {
        let row: Option<SettingsRow> = sqlx::query_as(
            "SELECT target_language, highlight_enabled, immersion_mode, youtube_subtitles_enabled \
             FROM settings WHERE id = ?",
        )
        .bind(SETTINGS_ID)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(row) = row {
            return Ok(row.into());
        }

        let defaults = Settings::default();
        self.write_settings(&defaults, false).await?;
        Ok(defaults)
    }

    async fn update_settings(&self, update: SettingsUpdate) -> Result<Settings, StoreError> {
        let mut settings = self.settings().await?;
        settings.apply(update);
        self.write_settings(&settings, true).await?;
        Ok(settings)
    }
}

impl SqliteStore {
    async fn write_settings(&self, settings: &Settings, replace: bool) -> Result<(), StoreError> {
        let verb = if replace { "INSERT OR REPLACE" } else { "INSERT OR IGNORE" };
        sqlx::query(&format!(
            "{verb} INTO settings (id, target_language, highlight_enabled, immersion_mode, youtube_subtitles_enabled) \
             VALUES (?, ?, ?, ?, ?)"
        ))
        .bind(SETTINGS_ID)
        .bind(&settings.target_language)
        .bind(settings.highlight_enabled)
        .bind(settings.immersion_mode)
        .bind(settings.youtube_subtitles_enabled)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
