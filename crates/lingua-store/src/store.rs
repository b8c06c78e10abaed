use lingua_types::{CachedWord, NewWord, Settings, SettingsUpdate, WordFlagsPatch};
use uuid::Uuid;

use crate::error::StoreError;

/// Saved words, doubling as the resolution cache.
///
/// `original` is matched exactly and case-sensitively. There is no uniqueness
/// constraint: two concurrent inserts of the same word both land, and the
/// oldest row is the one `find_by_original` returns.
#[async_trait::async_trait]
pub trait WordStore: Send + Sync {
    async fn find_by_original(&self, original: &str) -> Result<Option<CachedWord>, StoreError>;

    /// Insert a new row with fresh id, current timestamp and cleared flags
    async fn insert(&self, word: NewWord) -> Result<CachedWord, StoreError>;

    /// Newest first
    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<CachedWord>, StoreError>;

    async fn get(&self, id: Uuid) -> Result<Option<CachedWord>, StoreError>;

    /// Only the user-state flags are writable; `None` when the id is unknown
    async fn update_flags(
        &self,
        id: Uuid,
        patch: WordFlagsPatch,
    ) -> Result<Option<CachedWord>, StoreError>;

    /// `false` when nothing was deleted
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;
}

/// The singleton settings row
#[async_trait::async_trait]
pub trait SettingsStore: Send + Sync {
    /// Current settings, created with defaults on first read
    async fn settings(&self) -> Result<Settings, StoreError>;

    async fn update_settings(&self, update: SettingsUpdate) -> Result<Settings, StoreError>;
}
