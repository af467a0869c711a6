use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::config::CoreConfig;
use crate::error::Field;
use crate::models::{
    color, email, normalize_folder, normalize_title, now, tag, NewNote, Note, NoteUpdate,
    Principal,
};
use crate::query::{ListFilter, NotePage, PageRequest, Sort};
use crate::storage::{FindOptions, NoteFilter, NoteStore};
use crate::visibility::{can_read, can_write};
use crate::{Error, Result};

/// Access-checked note operations for one principal at a time.
#[derive(Clone)]
pub struct NoteRepository {
    store: Arc<dyn NoteStore>,
    list_timeout: Duration,
    default_page_size: usize,
    max_page_size: usize,
}

impl NoteRepository {
    pub fn new(store: Arc<dyn NoteStore>) -> Self {
        Self::with_config(store, &CoreConfig::default())
    }

    pub fn with_config(store: Arc<dyn NoteStore>, config: &CoreConfig) -> Self {
        Self {
            store,
            list_timeout: config.list_timeout(),
            default_page_size: config.default_page_size,
            max_page_size: config.max_page_size,
        }
    }

    pub(crate) fn store(&self) -> &Arc<dyn NoteStore> {
        &self.store
    }

    /// Fetch a note the principal may read and record the access.
    pub async fn get_by_id(&self, principal: &Principal, id: &str) -> Result<Note> {
        Note::check_id(id)?;
        let note = match self.store.find_by_id(id).await? {
            Some(note) if can_read(principal, &note) => note,
            _ => return Err(Error::NotFoundOrForbidden),
        };
        self.schedule_touch(note.id.clone());
        Ok(note)
    }

    /// Bump `last_accessed` without making the caller wait. Failures are
    /// logged and dropped.
    fn schedule_touch(&self, id: String) {
        let store = Arc::clone(&self.store);
        tokio::spawn(async move {
            if let Err(error) = store.touch_last_accessed(&id, now()).await {
                warn!(note_id = %id, %error, "failed to record note access");
            }
        });
    }

    /// Fetch a note only its owner may change
    pub(crate) async fn load_for_write(&self, principal: &Principal, id: &str) -> Result<Note> {
        Note::check_id(id)?;
        match self.store.find_by_id(id).await? {
            Some(note) if can_write(principal, &note) => Ok(note),
            _ => Err(Error::NotFoundOrForbidden),
        }
    }

    /// Persist a fully validated note
    pub(crate) async fn save(&self, note: &Note) -> Result<()> {
        note.validate()?;
        if !self.store.replace(note).await? {
            // Deleted between load and save
            return Err(Error::NotFoundOrForbidden);
        }
        Ok(())
    }

    /// The principal's own notes, filtered, sorted and paged.
    pub async fn list(
        &self,
        principal: &Principal,
        filter: &ListFilter,
        page: PageRequest,
        sort: Sort,
    ) -> Result<NotePage> {
        self.page(filter.to_store_filter(&principal.id), page, sort).await
    }

    /// Free-text search over the principal's notes, newest first
    pub async fn search(
        &self,
        principal: &Principal,
        query: &str,
        page: PageRequest,
    ) -> Result<NotePage> {
        self.list(principal, &ListFilter::text(query), page, Sort::default())
            .await
    }

    pub(crate) async fn page(
        &self,
        filter: NoteFilter,
        page: PageRequest,
        sort: Sort,
    ) -> Result<NotePage> {
        let pagination = page.resolve(self.default_page_size, self.max_page_size);
        let options = FindOptions {
            sort,
            skip: pagination.skip,
            limit: Some(pagination.limit),
        };
        debug!(?filter, ?options, "listing notes");

        let query = async {
            let items = self.store.find(&filter, &options).await?;
            let total = self.store.count(&filter).await?;
            Ok::<_, Error>((items, total))
        };
        let (items, total) = match tokio::time::timeout(self.list_timeout, query).await {
            Ok(result) => result?,
            Err(_) => {
                warn!(timeout = ?self.list_timeout, "note list query timed out");
                return Err(Error::QueryTimeout(self.list_timeout));
            }
        };

        Ok(NotePage {
            items,
            total,
            limit: pagination.limit,
            skip: pagination.skip,
        })
    }

    pub async fn create(&self, principal: &Principal, payload: NewNote) -> Result<Note> {
        if payload.owner_id.as_deref().is_some_and(|o| o != principal.id) {
            debug!(owner = %principal.id, "ignoring ownerId in create payload");
        }

        let mut note = Note::new(principal.id.clone(), normalize_title(&payload.title)?);
        if let Some(content) = payload.content {
            note.content = content;
        }
        if let Some(tags) = payload.tags {
            note.tags = tag::normalize_list(&tags)?;
        }
        note.folder = normalize_folder(payload.folder.as_deref())?;
        if let Some(c) = payload.color {
            note.color = color::normalize(&c)?;
        }
        note.is_pinned = payload.is_pinned.unwrap_or(false);
        note.is_favorite = payload.is_favorite.unwrap_or(false);
        note.is_public = payload.is_public.unwrap_or(false);
        note.editor_type = payload.editor_type.unwrap_or_default();
        if let Some(shared_with) = payload.shared_with {
            note.shared_with = email::normalize_list(&shared_with)?;
        }

        note.validate()?;
        self.store.insert(&note).await?;
        info!(note_id = %note.id, owner = %note.owner_id, folder = %note.folder, "created note");
        Ok(note)
    }

    /// Partial update by the owner. `owner_id` in the payload is ignored.
    pub async fn update(&self, principal: &Principal, id: &str, payload: NoteUpdate) -> Result<Note> {
        let mut note = self.load_for_write(principal, id).await?;

        if payload.owner_id.is_some() {
            debug!(note_id = %id, "ignoring ownerId in update payload");
        }
        if let Some(title) = payload.title {
            note.title = normalize_title(&title)?;
        }
        if let Some(content) = payload.content {
            note.content = content;
        }
        if let Some(tags) = payload.tags {
            note.tags = tag::normalize_list(&tags)?;
        }
        if let Some(folder) = payload.folder {
            note.folder = normalize_folder(Some(&folder))?;
        }
        if let Some(c) = payload.color {
            note.color = color::normalize(&c)?;
        }
        if let Some(pinned) = payload.is_pinned {
            note.is_pinned = pinned;
        }
        if let Some(favorite) = payload.is_favorite {
            note.is_favorite = favorite;
        }
        if let Some(public) = payload.is_public {
            note.is_public = public;
        }
        if let Some(editor_type) = payload.editor_type {
            note.editor_type = editor_type;
        }
        if let Some(shared_with) = payload.shared_with {
            note.shared_with = email::normalize_list(&shared_with)?;
        }

        note.touch();
        self.save(&note).await?;
        info!(note_id = %note.id, "updated note");
        Ok(note)
    }

    /// Hard delete by the owner. A second delete of the same id fails.
    pub async fn delete(&self, principal: &Principal, id: &str) -> Result<()> {
        let note = self.load_for_write(principal, id).await?;
        if !self.store.delete_by_id(&note.id).await? {
            return Err(Error::NotFoundOrForbidden);
        }
        info!(note_id = %note.id, "deleted note");
        Ok(())
    }

    pub async fn toggle_pin(&self, principal: &Principal, id: &str) -> Result<Note> {
        let mut note = self.load_for_write(principal, id).await?;
        note.is_pinned = !note.is_pinned;
        note.touch();
        self.save(&note).await?;
        Ok(note)
    }

    pub async fn toggle_favorite(&self, principal: &Principal, id: &str) -> Result<Note> {
        let mut note = self.load_for_write(principal, id).await?;
        note.is_favorite = !note.is_favorite;
        note.touch();
        self.save(&note).await?;
        Ok(note)
    }

    /// Distinct non-empty tags across the principal's notes
    pub async fn search_tags(&self, principal: &Principal) -> Result<Vec<String>> {
        let tags = self
            .store
            .distinct_tags(&NoteFilter::owned_by(&principal.id))
            .await?;
        Ok(tags)
    }
}

/// Blank and oversized folder names are rejected rather than defaulted
pub(crate) fn required_folder_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(Error::validation(Field::Folder, "folder name is required"));
    }
    normalize_folder(Some(trimmed))
}
