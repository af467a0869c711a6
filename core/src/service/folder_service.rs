//! Folders are derived from the `folder` field of notes: there is no folder
//! record. A folder appears as soon as one note uses its name and disappears
//! with the last such note, so rename and delete are bulk updates over notes.
//! Those bulk updates are best-effort: if the store fails midway, some notes
//! may have moved and others not.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::info;

use super::note_repository::{required_folder_name, NoteRepository};
use crate::error::Field;
use crate::models::{now, NewNote, Note, Principal, DEFAULT_FOLDER};
use crate::storage::{BulkUpdate, NoteFilter};
use crate::{Error, Result};

/// Outcome of a folder delete; only one counter is non-zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderDeletion {
    pub deleted: u64,
    pub moved: u64,
}

#[derive(Clone)]
pub struct FolderService {
    notes: NoteRepository,
}

impl FolderService {
    pub fn new(notes: NoteRepository) -> Self {
        Self { notes }
    }

    pub async fn list_folders(&self, principal: &Principal) -> Result<Vec<String>> {
        let folders = self
            .notes
            .store()
            .distinct_folders(&NoteFilter::owned_by(&principal.id))
            .await?;
        Ok(folders)
    }

    pub async fn folder_counts(&self, principal: &Principal) -> Result<BTreeMap<String, u64>> {
        let counts = self
            .notes
            .store()
            .folder_counts(&NoteFilter::owned_by(&principal.id))
            .await?;
        Ok(counts)
    }

    async fn folder_exists(&self, principal: &Principal, name: &str) -> Result<bool> {
        let filter = NoteFilter::owned_by(&principal.id).in_folder(name);
        Ok(self.notes.store().exists(&filter).await?)
    }

    /// Make an empty folder observable by seeding it with a starter note.
    pub async fn create_folder(&self, principal: &Principal, name: &str) -> Result<Note> {
        let name = required_folder_name(name)?;
        if self.folder_exists(principal, &name).await? {
            return Err(Error::Conflict(format!("folder '{}' already exists", name)));
        }

        let placeholder = NewNote {
            content: Some(format!("Notes you file under {} will show up here.", name)),
            folder: Some(name.clone()),
            ..NewNote::titled(format!("{} - Getting Started", name))
        };
        let note = self.notes.create(principal, placeholder).await?;
        info!(owner = %principal.id, folder = %name, "created folder");
        Ok(note)
    }

    /// Move every note of `old_name` to `new_name`. Refuses to merge into an
    /// existing folder. Returns how many notes moved.
    pub async fn rename_folder(
        &self,
        principal: &Principal,
        old_name: &str,
        new_name: &str,
    ) -> Result<u64> {
        let old_name = required_folder_name(old_name)?;
        let new_name = required_folder_name(new_name)?;
        if old_name == new_name {
            return Err(Error::validation(
                Field::Folder,
                "new folder name must differ from the old one",
            ));
        }
        if self.folder_exists(principal, &new_name).await? {
            return Err(Error::Conflict(format!("folder '{}' already exists", new_name)));
        }

        let update = BulkUpdate {
            folder: Some(new_name.clone()),
            updated_at: now(),
        };
        let filter = NoteFilter::owned_by(&principal.id).in_folder(&old_name);
        let modified = self.notes.store().update_many(&filter, &update).await?;
        info!(owner = %principal.id, from = %old_name, to = %new_name, modified, "renamed folder");
        Ok(modified)
    }

    /// Remove a folder, either deleting its notes or moving them to
    /// `Default`.
    pub async fn delete_folder(
        &self,
        principal: &Principal,
        name: &str,
        delete_notes: bool,
    ) -> Result<FolderDeletion> {
        let name = required_folder_name(name)?;
        let filter = NoteFilter::owned_by(&principal.id).in_folder(&name);

        if delete_notes {
            let deleted = self.notes.store().delete_many(&filter).await?;
            info!(owner = %principal.id, folder = %name, deleted, "deleted folder and its notes");
            return Ok(FolderDeletion { deleted, moved: 0 });
        }

        if name == DEFAULT_FOLDER {
            return Err(Error::validation(
                Field::Folder,
                "notes of the Default folder have nowhere to move",
            ));
        }
        let update = BulkUpdate {
            folder: Some(DEFAULT_FOLDER.to_string()),
            updated_at: now(),
        };
        let moved = self.notes.store().update_many(&filter, &update).await?;
        info!(owner = %principal.id, folder = %name, moved, "deleted folder");
        Ok(FolderDeletion { deleted: 0, moved })
    }
}
