//! Request-shaped list parameters: filters, pagination and sort order.

use serde::{Deserialize, Serialize};

use crate::models::{EditorType, Note};
use crate::storage::NoteFilter;

pub const DEFAULT_PAGE_SIZE: usize = 50;
pub const MAX_PAGE_SIZE: usize = 100;

/// Filters accepted by the note list. Absent fields do not constrain.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListFilter {
    pub folder: Option<String>,
    pub tag: Option<String>,
    pub editor_type: Option<EditorType>,
    pub is_favorite: Option<bool>,
    pub is_pinned: Option<bool>,
    pub is_public: Option<bool>,
    pub has_shares: Option<bool>,
    /// Case-insensitive substring over title, content and tags
    pub query: Option<String>,
}

impl ListFilter {
    pub fn text(query: impl Into<String>) -> Self {
        Self {
            query: Some(query.into()),
            ..Default::default()
        }
    }

    /// Constrain to the notes owned by `owner_id`
    pub fn to_store_filter(&self, owner_id: &str) -> NoteFilter {
        let non_blank = |s: &Option<String>| {
            s.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        NoteFilter {
            owner_id: Some(owner_id.to_string()),
            folder: non_blank(&self.folder),
            tag: non_blank(&self.tag),
            editor_type: self.editor_type,
            is_favorite: self.is_favorite,
            is_pinned: self.is_pinned,
            is_public: self.is_public,
            has_shares: self.has_shares,
            text: non_blank(&self.query),
            ..Default::default()
        }
    }
}

/// Raw paging parameters as they arrive on a request.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PageRequest {
    pub limit: Option<i64>,
    pub skip: Option<i64>,
}

impl PageRequest {
    pub fn new(limit: Option<i64>, skip: Option<i64>) -> Self {
        Self { limit, skip }
    }

    /// Non-positive limits fall back to the default, oversized ones are
    /// clamped, negative skips become zero.
    pub fn resolve(&self, default_limit: usize, max_limit: usize) -> Pagination {
        let limit = match self.limit {
            Some(l) if l > 0 => (l as u64).min(max_limit as u64) as usize,
            _ => default_limit.min(max_limit),
        };
        let skip = self.skip.unwrap_or(0).max(0) as usize;
        Pagination { limit, skip }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub limit: usize,
    pub skip: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    UpdatedAt,
    CreatedAt,
    Title,
    LastAccessed,
}

impl SortField {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "updatedAt" => Some(SortField::UpdatedAt),
            "createdAt" => Some(SortField::CreatedAt),
            "title" => Some(SortField::Title),
            "lastAccessed" => Some(SortField::LastAccessed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Sort {
    pub field: SortField,
    pub descending: bool,
}

impl Default for Sort {
    fn default() -> Self {
        Self {
            field: SortField::UpdatedAt,
            descending: true,
        }
    }
}

impl Sort {
    /// Parse `field` or `-field`; anything outside the allow-list yields the
    /// default `-updatedAt`.
    pub fn parse(param: &str) -> Self {
        let param = param.trim();
        let (descending, name) = match param.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, param),
        };
        match SortField::parse(name) {
            Some(field) => Self { field, descending },
            None => {
                tracing::debug!(sort = param, "unknown sort, using -updatedAt");
                Self::default()
            }
        }
    }

    pub fn from_param(param: Option<&str>) -> Self {
        param.map(Self::parse).unwrap_or_default()
    }
}

/// One page of a list result plus the unpaged total.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotePage {
    pub items: Vec<Note>,
    pub total: u64,
    pub limit: usize,
    pub skip: usize,
}

impl NotePage {
    pub fn page_count(&self) -> u64 {
        if self.limit == 0 {
            return 0;
        }
        self.total.div_ceil(self.limit as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_defaults() {
        let p = PageRequest::default().resolve(DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE);
        assert_eq!(p, Pagination { limit: 50, skip: 0 });
    }

    #[test]
    fn test_pagination_clamps() {
        let p = PageRequest::new(Some(500), Some(-3)).resolve(DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE);
        assert_eq!(p, Pagination { limit: 100, skip: 0 });

        let p = PageRequest::new(Some(-5), Some(20)).resolve(DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE);
        assert_eq!(p, Pagination { limit: 50, skip: 20 });

        let p = PageRequest::new(Some(0), None).resolve(DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE);
        assert_eq!(p.limit, 50);
    }

    #[test]
    fn test_sort_parse() {
        assert_eq!(
            Sort::parse("title"),
            Sort { field: SortField::Title, descending: false }
        );
        assert_eq!(
            Sort::parse("-lastAccessed"),
            Sort { field: SortField::LastAccessed, descending: true }
        );
        assert_eq!(Sort::parse("nonsense"), Sort::default());
        assert_eq!(Sort::parse("-ownerId"), Sort::default());
        assert_eq!(Sort::from_param(None), Sort::default());
    }

    #[test]
    fn test_filter_drops_blank_values() {
        let filter = ListFilter {
            folder: Some("  ".to_string()),
            query: Some(" trip ".to_string()),
            ..Default::default()
        };
        let store = filter.to_store_filter("u1");
        assert_eq!(store.owner_id.as_deref(), Some("u1"));
        assert!(store.folder.is_none());
        assert_eq!(store.text.as_deref(), Some("trip"));
    }

    #[test]
    fn test_page_count() {
        let page = NotePage { items: Vec::new(), total: 101, limit: 50, skip: 0 };
        assert_eq!(page.page_count(), 3);
    }
}
