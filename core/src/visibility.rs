//! Who may see or change a note.
//!
//! Reading is granted to the owner, to anyone when the note is public, and to
//! collaborators listed by email in `shared_with`. Writing is owner-only:
//! sharing never grants edit rights.

use serde::Serialize;

use crate::models::{email, Note, Principal};

pub fn can_read(principal: &Principal, note: &Note) -> bool {
    principal.id == note.owner_id || note.is_public || is_collaborator(principal, note)
}

pub fn can_write(principal: &Principal, note: &Note) -> bool {
    principal.id == note.owner_id
}

pub fn is_collaborator(principal: &Principal, note: &Note) -> bool {
    let email = email::normalize(&principal.email);
    !email.is_empty() && note.shared_with.iter().any(|e| email::normalize(e) == email)
}

/// Read-time classification of a note; never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Private,
    Public,
    Shared,
}

impl Visibility {
    pub fn of(note: &Note) -> Self {
        if note.is_public {
            Visibility::Public
        } else if !note.shared_with.is_empty() {
            Visibility::Shared
        } else {
            Visibility::Private
        }
    }
}
