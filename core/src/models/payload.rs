//! Request payloads accepted by the services. Field names follow the JSON
//! bodies the route handlers receive.

use serde::{Deserialize, Serialize};

use super::EditorType;

/// Body of a create request. Every field but `title` is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewNote {
    pub title: String,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
    pub folder: Option<String>,
    pub color: Option<String>,
    pub is_pinned: Option<bool>,
    pub is_favorite: Option<bool>,
    pub is_public: Option<bool>,
    pub editor_type: Option<EditorType>,
    pub shared_with: Option<Vec<String>>,
    /// Accepted for wire compatibility; the owner is always the caller.
    pub owner_id: Option<String>,
}

impl NewNote {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }
}

/// Partial update: only the supplied fields change.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NoteUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
    pub folder: Option<String>,
    pub color: Option<String>,
    pub is_pinned: Option<bool>,
    pub is_favorite: Option<bool>,
    pub is_public: Option<bool>,
    pub editor_type: Option<EditorType>,
    pub shared_with: Option<Vec<String>>,
    /// Never applied.
    pub owner_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShareRequest {
    pub is_public: Option<bool>,
    pub emails: Option<Vec<String>>,
}
