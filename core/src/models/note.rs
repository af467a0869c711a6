use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Field;
use crate::models::{color, email, tag, now};
use crate::{Error, Result};

pub const MAX_TITLE_CHARS: usize = 100;
pub const MAX_FOLDER_CHARS: usize = 30;
pub const DEFAULT_FOLDER: &str = "Default";

const ID_HEX_LEN: usize = 24;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EditorType {
    #[default]
    Rich,
    Markdown,
    Simple,
}

impl EditorType {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "rich" => Some(EditorType::Rich),
            "markdown" => Some(EditorType::Markdown),
            "simple" => Some(EditorType::Simple),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EditorType::Rich => "rich",
            EditorType::Markdown => "markdown",
            EditorType::Simple => "simple",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub folder: String,
    pub color: String,
    pub is_pinned: bool,
    pub is_favorite: bool,
    pub is_public: bool,
    pub editor_type: EditorType,
    pub owner_id: String,
    pub shared_with: Vec<String>,
    pub last_accessed: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Note {
    /// Create a note with every optional field at its default
    pub fn new(owner_id: String, title: String) -> Self {
        let now = now();
        Self {
            id: Self::generate_id(),
            title,
            content: String::new(),
            tags: Vec::new(),
            folder: DEFAULT_FOLDER.to_string(),
            color: color::DEFAULT_COLOR.to_string(),
            is_pinned: false,
            is_favorite: false,
            is_public: false,
            editor_type: EditorType::Rich,
            owner_id,
            shared_with: Vec::new(),
            last_accessed: now,
            created_at: now,
            updated_at: now,
        }
    }

    /// Generate a 24-hex-character identifier: a seconds prefix followed by
    /// random bits, so ids sort roughly by creation time.
    pub fn generate_id() -> String {
        let secs = Utc::now().timestamp() as u32;
        let random = uuid::Uuid::new_v4().simple().to_string();
        format!("{:08x}{}", secs, &random[..ID_HEX_LEN - 8])
    }

    pub fn is_valid_id(id: &str) -> bool {
        id.len() == ID_HEX_LEN && id.bytes().all(|b| b.is_ascii_hexdigit())
    }

    /// Reject malformed ids before they reach a store query
    pub fn check_id(id: &str) -> Result<()> {
        if Self::is_valid_id(id) {
            Ok(())
        } else {
            Err(Error::InvalidIdentifier(id.to_string()))
        }
    }

    /// Update the modification and access timestamps
    pub fn touch(&mut self) {
        let now = now();
        self.updated_at = now;
        self.last_accessed = now;
    }

    /// Check every field constraint of a note about to be persisted
    pub fn validate(&self) -> Result<()> {
        normalize_title(&self.title)?;
        normalize_folder(Some(&self.folder))?;
        tag::validate_list(&self.tags)?;
        color::normalize(&self.color)?;
        email::validate_list(&self.shared_with)?;
        Ok(())
    }
}

/// Trim a title and reject blank or oversized values
pub fn normalize_title(title: &str) -> Result<String> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(Error::validation(Field::Title, "title is required"));
    }
    if trimmed.chars().count() > MAX_TITLE_CHARS {
        return Err(Error::validation(
            Field::Title,
            format!("title cannot exceed {} characters", MAX_TITLE_CHARS),
        ));
    }
    Ok(trimmed.to_string())
}

/// Trim a folder name; a missing or blank name means the default folder
pub fn normalize_folder(folder: Option<&str>) -> Result<String> {
    let trimmed = folder.map(str::trim).unwrap_or_default();
    if trimmed.is_empty() {
        return Ok(DEFAULT_FOLDER.to_string());
    }
    if trimmed.chars().count() > MAX_FOLDER_CHARS {
        return Err(Error::validation(
            Field::Folder,
            format!("folder name cannot exceed {} characters", MAX_FOLDER_CHARS),
        ));
    }
    Ok(trimmed.to_string())
}
