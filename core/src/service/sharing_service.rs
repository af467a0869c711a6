use std::sync::Arc;

use tracing::info;

use super::note_repository::NoteRepository;
use crate::error::Field;
use crate::models::{email, Note, Principal, ShareRequest};
use crate::query::{NotePage, PageRequest, Sort};
use crate::storage::{NoteFilter, UserDirectory};
use crate::{Error, Result};

/// Owner-only changes to who can read a note.
#[derive(Clone)]
pub struct SharingService {
    notes: NoteRepository,
    users: Arc<dyn UserDirectory>,
}

impl SharingService {
    pub fn new(notes: NoteRepository, users: Arc<dyn UserDirectory>) -> Self {
        Self { notes, users }
    }

    /// Set the public flag and/or replace the collaborator list.
    ///
    /// Emails are resolved against registered users; unknown addresses are
    /// dropped, and the request fails if none resolve. An empty email list
    /// leaves the collaborators untouched.
    pub async fn set_sharing(
        &self,
        principal: &Principal,
        note_id: &str,
        request: ShareRequest,
    ) -> Result<Note> {
        let mut note = self.notes.load_for_write(principal, note_id).await?;

        if let Some(is_public) = request.is_public {
            note.is_public = is_public;
        }
        if let Some(emails) = request.emails.filter(|e| !e.is_empty()) {
            let wanted = email::normalize_list(&emails)?;
            let known = self.users.find_by_emails(&wanted).await?;
            if known.is_empty() {
                return Err(Error::validation(
                    Field::Email,
                    "none of the supplied emails belong to a registered user",
                ));
            }
            note.shared_with = wanted
                .into_iter()
                .filter(|e| known.iter().any(|u| email::normalize(&u.email) == *e))
                .collect();
        }

        note.touch();
        self.notes.save(&note).await?;
        info!(
            note_id = %note.id,
            is_public = note.is_public,
            collaborators = note.shared_with.len(),
            "updated sharing"
        );
        Ok(note)
    }

    /// Remove one collaborator. Unknown addresses leave the note unchanged.
    pub async fn revoke(&self, principal: &Principal, note_id: &str, collaborator: &str) -> Result<Note> {
        let mut note = self.notes.load_for_write(principal, note_id).await?;
        let target = email::normalize(collaborator);
        let before = note.shared_with.len();
        note.shared_with.retain(|e| email::normalize(e) != target);
        if note.shared_with.len() == before {
            return Ok(note);
        }

        note.touch();
        self.notes.save(&note).await?;
        info!(note_id = %note.id, "revoked collaborator");
        Ok(note)
    }

    /// Notes other owners have shared with the principal, newest first.
    pub async fn shared_with_me(&self, principal: &Principal, page: PageRequest) -> Result<NotePage> {
        let filter = NoteFilter {
            not_owner_id: Some(principal.id.clone()),
            shared_with: Some(principal.email.clone()),
            ..Default::default()
        };
        self.notes.page(filter, page, Sort::default()).await
    }
}
