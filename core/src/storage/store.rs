//! The document-store seam the services are written against.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::StoreError;
use crate::models::{EditorType, Note, User};
use crate::query::Sort;

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Predicate over notes. Every populated field must match.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoteFilter {
    pub owner_id: Option<String>,
    /// Excludes notes of this owner
    pub not_owner_id: Option<String>,
    pub folder: Option<String>,
    pub tag: Option<String>,
    pub editor_type: Option<EditorType>,
    pub is_favorite: Option<bool>,
    pub is_pinned: Option<bool>,
    pub is_public: Option<bool>,
    pub has_shares: Option<bool>,
    /// Collaborator email that must appear in `shared_with`
    pub shared_with: Option<String>,
    /// Case-insensitive substring over title, content and tags
    pub text: Option<String>,
}

impl NoteFilter {
    pub fn owned_by(owner_id: &str) -> Self {
        Self {
            owner_id: Some(owner_id.to_string()),
            ..Default::default()
        }
    }

    pub fn in_folder(mut self, folder: &str) -> Self {
        self.folder = Some(folder.to_string());
        self
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FindOptions {
    pub sort: Sort,
    pub skip: usize,
    pub limit: Option<usize>,
}

/// Field changes applied to every note matching a filter.
#[derive(Debug, Clone)]
pub struct BulkUpdate {
    pub folder: Option<String>,
    pub updated_at: DateTime<Utc>,
}

#[async_trait]
pub trait NoteStore: Send + Sync {
    async fn find_by_id(&self, id: &str) -> StoreResult<Option<Note>>;

    async fn find(&self, filter: &NoteFilter, options: &FindOptions) -> StoreResult<Vec<Note>>;

    async fn count(&self, filter: &NoteFilter) -> StoreResult<u64>;

    async fn exists(&self, filter: &NoteFilter) -> StoreResult<bool>;

    async fn insert(&self, note: &Note) -> StoreResult<()>;

    /// Overwrite every mutable field of an existing note. `owner_id` and
    /// `created_at` are never rewritten. Returns false when the id is unknown.
    async fn replace(&self, note: &Note) -> StoreResult<bool>;

    async fn delete_by_id(&self, id: &str) -> StoreResult<bool>;

    /// Not atomic across the match set from the caller's point of view.
    async fn update_many(&self, filter: &NoteFilter, update: &BulkUpdate) -> StoreResult<u64>;

    async fn delete_many(&self, filter: &NoteFilter) -> StoreResult<u64>;

    async fn distinct_folders(&self, filter: &NoteFilter) -> StoreResult<Vec<String>>;

    async fn folder_counts(&self, filter: &NoteFilter) -> StoreResult<BTreeMap<String, u64>>;

    async fn distinct_tags(&self, filter: &NoteFilter) -> StoreResult<Vec<String>>;

    async fn touch_last_accessed(&self, id: &str, at: DateTime<Utc>) -> StoreResult<bool>;
}

/// Account lookup used to resolve collaborator emails.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Known users among `emails`; unknown addresses are simply absent.
    async fn find_by_emails(&self, emails: &[String]) -> StoreResult<Vec<User>>;
}
