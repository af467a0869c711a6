#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use cloudnote_core::models::{Note, Principal, User};
use cloudnote_core::storage::{
    BulkUpdate, Database, FindOptions, NoteFilter, NoteStore, SqliteNoteStore,
    SqliteUserDirectory, StoreResult,
};
use cloudnote_core::{CoreConfig, NoteRepository, Services, StoreError};
use tempfile::TempDir;

pub struct Harness {
    pub services: Services,
    _dir: TempDir,
}

/// Services over a fresh on-disk database.
pub fn harness() -> Harness {
    let dir = TempDir::new().expect("failed to create temp dir");
    let config = CoreConfig {
        database_path: dir.path().join("cloudnote.db"),
        ..CoreConfig::default()
    };
    Harness {
        services: Services::sqlite(&config),
        _dir: dir,
    }
}

pub async fn register(users: &SqliteUserDirectory, email: &str) -> Principal {
    let user = User::new(email);
    users.create(&user).await.expect("failed to register user");
    user.principal()
}

/// Wraps the SQLite store to slow down listing or break access tracking.
pub struct InstrumentedStore {
    inner: SqliteNoteStore,
    pub find_delay: Option<Duration>,
    pub fail_touch: bool,
}

impl InstrumentedStore {
    pub fn new(find_delay: Option<Duration>, fail_touch: bool) -> Self {
        Self {
            inner: SqliteNoteStore::new(Arc::new(Database::in_memory())),
            find_delay,
            fail_touch,
        }
    }

    pub fn into_repository(self, config: &CoreConfig) -> NoteRepository {
        NoteRepository::with_config(Arc::new(self), config)
    }
}

#[async_trait]
impl NoteStore for InstrumentedStore {
    async fn find_by_id(&self, id: &str) -> StoreResult<Option<Note>> {
        self.inner.find_by_id(id).await
    }

    async fn find(&self, filter: &NoteFilter, options: &FindOptions) -> StoreResult<Vec<Note>> {
        if let Some(delay) = self.find_delay {
            tokio::time::sleep(delay).await;
        }
        self.inner.find(filter, options).await
    }

    async fn count(&self, filter: &NoteFilter) -> StoreResult<u64> {
        self.inner.count(filter).await
    }

    async fn exists(&self, filter: &NoteFilter) -> StoreResult<bool> {
        self.inner.exists(filter).await
    }

    async fn insert(&self, note: &Note) -> StoreResult<()> {
        self.inner.insert(note).await
    }

    async fn replace(&self, note: &Note) -> StoreResult<bool> {
        self.inner.replace(note).await
    }

    async fn delete_by_id(&self, id: &str) -> StoreResult<bool> {
        self.inner.delete_by_id(id).await
    }

    async fn update_many(&self, filter: &NoteFilter, update: &BulkUpdate) -> StoreResult<u64> {
        self.inner.update_many(filter, update).await
    }

    async fn delete_many(&self, filter: &NoteFilter) -> StoreResult<u64> {
        self.inner.delete_many(filter).await
    }

    async fn distinct_folders(&self, filter: &NoteFilter) -> StoreResult<Vec<String>> {
        self.inner.distinct_folders(filter).await
    }

    async fn folder_counts(&self, filter: &NoteFilter) -> StoreResult<BTreeMap<String, u64>> {
        self.inner.folder_counts(filter).await
    }

    async fn distinct_tags(&self, filter: &NoteFilter) -> StoreResult<Vec<String>> {
        self.inner.distinct_tags(filter).await
    }

    async fn touch_last_accessed(&self, id: &str, at: DateTime<Utc>) -> StoreResult<bool> {
        if self.fail_touch {
            return Err(StoreError::Corrupt(format!("refusing to touch {id}")));
        }
        self.inner.touch_last_accessed(id, at).await
    }
}
