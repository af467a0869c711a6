use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::types::{Type, Value};
use rusqlite::{params, params_from_iter, OptionalExtension, Row};

use super::store::{BulkUpdate, FindOptions, NoteFilter, NoteStore, StoreResult};
use super::Database;
use crate::models::{datetime_to_timestamp, email, timestamp_to_datetime, EditorType, Note};
use crate::query::SortField;

const NOTE_COLUMNS: &str = "notes.id, notes.title, notes.content, notes.tags, notes.folder, \
     notes.color, notes.is_pinned, notes.is_favorite, notes.is_public, notes.editor_type, \
     notes.owner_id, notes.shared_with, notes.last_accessed, notes.created_at, notes.updated_at";

/// `NoteStore` backed by the `notes` table.
#[derive(Clone)]
pub struct SqliteNoteStore {
    db: Arc<Database>,
}

impl SqliteNoteStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }
}

fn json_list(row: &Row, idx: usize) -> rusqlite::Result<Vec<String>> {
    let raw: String = row.get(idx)?;
    serde_json::from_str(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn row_to_note(row: &Row) -> rusqlite::Result<Note> {
    Ok(Note {
        id: row.get(0)?,
        title: row.get(1)?,
        content: row.get(2)?,
        tags: json_list(row, 3)?,
        folder: row.get(4)?,
        color: row.get(5)?,
        is_pinned: row.get(6)?,
        is_favorite: row.get(7)?,
        is_public: row.get(8)?,
        editor_type: EditorType::parse(&row.get::<_, String>(9)?).unwrap_or_default(),
        owner_id: row.get(10)?,
        shared_with: json_list(row, 11)?,
        last_accessed: timestamp_to_datetime(row.get(12)?),
        created_at: timestamp_to_datetime(row.get(13)?),
        updated_at: timestamp_to_datetime(row.get(14)?),
    })
}

/// Translate a filter into a WHERE clause and its positional arguments
fn where_clause(filter: &NoteFilter) -> (String, Vec<Value>) {
    let mut clauses: Vec<&str> = Vec::new();
    let mut args: Vec<Value> = Vec::new();

    if let Some(owner) = &filter.owner_id {
        clauses.push("notes.owner_id = ?");
        args.push(Value::Text(owner.clone()));
    }
    if let Some(owner) = &filter.not_owner_id {
        clauses.push("notes.owner_id <> ?");
        args.push(Value::Text(owner.clone()));
    }
    if let Some(folder) = &filter.folder {
        clauses.push("notes.folder = ?");
        args.push(Value::Text(folder.clone()));
    }
    if let Some(tag) = &filter.tag {
        clauses.push("EXISTS (SELECT 1 FROM json_each(notes.tags) AS t WHERE t.value = ?)");
        args.push(Value::Text(tag.clone()));
    }
    if let Some(editor) = filter.editor_type {
        clauses.push("notes.editor_type = ?");
        args.push(Value::Text(editor.as_str().to_string()));
    }
    for (column, flag) in [
        ("notes.is_favorite = ?", filter.is_favorite),
        ("notes.is_pinned = ?", filter.is_pinned),
        ("notes.is_public = ?", filter.is_public),
    ] {
        if let Some(flag) = flag {
            clauses.push(column);
            args.push(Value::Integer(flag as i64));
        }
    }
    match filter.has_shares {
        Some(true) => clauses.push("json_array_length(notes.shared_with) > 0"),
        Some(false) => clauses.push("json_array_length(notes.shared_with) = 0"),
        None => {}
    }
    if let Some(collaborator) = &filter.shared_with {
        clauses.push(
            "EXISTS (SELECT 1 FROM json_each(notes.shared_with) AS s WHERE lower(s.value) = ?)",
        );
        args.push(Value::Text(email::normalize(collaborator)));
    }
    if let Some(text) = &filter.text {
        clauses.push(
            "(ci_contains(notes.title, ?) OR ci_contains(notes.content, ?) \
             OR EXISTS (SELECT 1 FROM json_each(notes.tags) AS q WHERE ci_contains(q.value, ?)))",
        );
        for _ in 0..3 {
            args.push(Value::Text(text.clone()));
        }
    }

    if clauses.is_empty() {
        ("1 = 1".to_string(), args)
    } else {
        (clauses.join(" AND "), args)
    }
}

fn order_clause(options: &FindOptions) -> String {
    let column = match options.sort.field {
        SortField::UpdatedAt => "notes.updated_at",
        SortField::CreatedAt => "notes.created_at",
        SortField::Title => "notes.title COLLATE NOCASE",
        SortField::LastAccessed => "notes.last_accessed",
    };
    let direction = if options.sort.descending { "DESC" } else { "ASC" };
    format!("{column} {direction}, notes.id {direction}")
}

#[async_trait]
impl NoteStore for SqliteNoteStore {
    async fn find_by_id(&self, id: &str) -> StoreResult<Option<Note>> {
        let id = id.to_string();
        self.db
            .run(move |conn| {
                let sql = format!("SELECT {NOTE_COLUMNS} FROM notes WHERE notes.id = ?1");
                let note = conn
                    .query_row(&sql, params![id], row_to_note)
                    .optional()?;
                Ok(note)
            })
            .await
    }

    async fn find(&self, filter: &NoteFilter, options: &FindOptions) -> StoreResult<Vec<Note>> {
        let (clause, mut args) = where_clause(filter);
        let order = order_clause(options);
        args.push(Value::Integer(options.limit.map(|l| l as i64).unwrap_or(-1)));
        args.push(Value::Integer(options.skip as i64));

        self.db
            .run(move |conn| {
                let sql = format!(
                    "SELECT {NOTE_COLUMNS} FROM notes WHERE {clause} ORDER BY {order} LIMIT ? OFFSET ?"
                );
                tracing::trace!(%sql, "find notes");
                let mut stmt = conn.prepare(&sql)?;
                let notes = stmt
                    .query_map(params_from_iter(args), row_to_note)?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(notes)
            })
            .await
    }

    async fn count(&self, filter: &NoteFilter) -> StoreResult<u64> {
        let (clause, args) = where_clause(filter);
        self.db
            .run(move |conn| {
                let sql = format!("SELECT COUNT(*) FROM notes WHERE {clause}");
                let count: i64 = conn.query_row(&sql, params_from_iter(args), |row| row.get(0))?;
                Ok(count as u64)
            })
            .await
    }

    async fn exists(&self, filter: &NoteFilter) -> StoreResult<bool> {
        let (clause, args) = where_clause(filter);
        self.db
            .run(move |conn| {
                let sql = format!("SELECT EXISTS (SELECT 1 FROM notes WHERE {clause})");
                let found: bool = conn.query_row(&sql, params_from_iter(args), |row| row.get(0))?;
                Ok(found)
            })
            .await
    }

    async fn insert(&self, note: &Note) -> StoreResult<()> {
        let note = note.clone();
        let tags = serde_json::to_string(&note.tags)?;
        let shared_with = serde_json::to_string(&note.shared_with)?;
        self.db
            .run(move |conn| {
                conn.execute(
                    "INSERT INTO notes (id, title, content, tags, folder, color, is_pinned, \
                     is_favorite, is_public, editor_type, owner_id, shared_with, last_accessed, \
                     created_at, updated_at) \
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
                    params![
                        note.id,
                        note.title,
                        note.content,
                        tags,
                        note.folder,
                        note.color,
                        note.is_pinned,
                        note.is_favorite,
                        note.is_public,
                        note.editor_type.as_str(),
                        note.owner_id,
                        shared_with,
                        datetime_to_timestamp(&note.last_accessed),
                        datetime_to_timestamp(&note.created_at),
                        datetime_to_timestamp(&note.updated_at),
                    ],
                )?;
                Ok(())
            })
            .await
    }

    async fn replace(&self, note: &Note) -> StoreResult<bool> {
        let note = note.clone();
        let tags = serde_json::to_string(&note.tags)?;
        let shared_with = serde_json::to_string(&note.shared_with)?;
        self.db
            .run(move |conn| {
                let rows_affected = conn.execute(
                    "UPDATE notes SET title = ?1, content = ?2, tags = ?3, folder = ?4, \
                     color = ?5, is_pinned = ?6, is_favorite = ?7, is_public = ?8, \
                     editor_type = ?9, shared_with = ?10, last_accessed = ?11, updated_at = ?12 \
                     WHERE id = ?13",
                    params![
                        note.title,
                        note.content,
                        tags,
                        note.folder,
                        note.color,
                        note.is_pinned,
                        note.is_favorite,
                        note.is_public,
                        note.editor_type.as_str(),
                        shared_with,
                        datetime_to_timestamp(&note.last_accessed),
                        datetime_to_timestamp(&note.updated_at),
                        note.id,
                    ],
                )?;
                Ok(rows_affected > 0)
            })
            .await
    }

    async fn delete_by_id(&self, id: &str) -> StoreResult<bool> {
        let id = id.to_string();
        self.db
            .run(move |conn| {
                let rows_affected = conn.execute("DELETE FROM notes WHERE id = ?1", params![id])?;
                Ok(rows_affected > 0)
            })
            .await
    }

    async fn update_many(&self, filter: &NoteFilter, update: &BulkUpdate) -> StoreResult<u64> {
        let (clause, filter_args) = where_clause(filter);
        let mut sets = vec!["updated_at = ?"];
        let mut args = vec![Value::Integer(datetime_to_timestamp(&update.updated_at))];
        if let Some(folder) = &update.folder {
            sets.push("folder = ?");
            args.push(Value::Text(folder.clone()));
        }
        args.extend(filter_args);
        let sets = sets.join(", ");

        self.db
            .run(move |conn| {
                let sql = format!("UPDATE notes SET {sets} WHERE {clause}");
                let rows_affected = conn.execute(&sql, params_from_iter(args))?;
                Ok(rows_affected as u64)
            })
            .await
    }

    async fn delete_many(&self, filter: &NoteFilter) -> StoreResult<u64> {
        let (clause, args) = where_clause(filter);
        self.db
            .run(move |conn| {
                let sql = format!("DELETE FROM notes WHERE {clause}");
                let rows_affected = conn.execute(&sql, params_from_iter(args))?;
                Ok(rows_affected as u64)
            })
            .await
    }

    async fn distinct_folders(&self, filter: &NoteFilter) -> StoreResult<Vec<String>> {
        let (clause, args) = where_clause(filter);
        self.db
            .run(move |conn| {
                let sql = format!(
                    "SELECT DISTINCT notes.folder FROM notes WHERE {clause} ORDER BY notes.folder"
                );
                let mut stmt = conn.prepare(&sql)?;
                let folders = stmt
                    .query_map(params_from_iter(args), |row| row.get::<_, String>(0))?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(folders)
            })
            .await
    }

    async fn folder_counts(&self, filter: &NoteFilter) -> StoreResult<BTreeMap<String, u64>> {
        let (clause, args) = where_clause(filter);
        self.db
            .run(move |conn| {
                let sql = format!(
                    "SELECT notes.folder, COUNT(*) FROM notes WHERE {clause} GROUP BY notes.folder"
                );
                let mut stmt = conn.prepare(&sql)?;
                let counts = stmt
                    .query_map(params_from_iter(args), |row| {
                        Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)? as u64))
                    })?
                    .collect::<std::result::Result<BTreeMap<_, _>, _>>()?;
                Ok(counts)
            })
            .await
    }

    async fn distinct_tags(&self, filter: &NoteFilter) -> StoreResult<Vec<String>> {
        let (clause, args) = where_clause(filter);
        self.db
            .run(move |conn| {
                let sql = format!(
                    "SELECT DISTINCT tag.value FROM notes, json_each(notes.tags) AS tag \
                     WHERE {clause} AND trim(tag.value) <> '' ORDER BY tag.value"
                );
                let mut stmt = conn.prepare(&sql)?;
                let tags = stmt
                    .query_map(params_from_iter(args), |row| row.get::<_, String>(0))?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(tags)
            })
            .await
    }

    async fn touch_last_accessed(&self, id: &str, at: DateTime<Utc>) -> StoreResult<bool> {
        let id = id.to_string();
        self.db
            .run(move |conn| {
                let rows_affected = conn.execute(
                    "UPDATE notes SET last_accessed = ?1 WHERE id = ?2",
                    params![datetime_to_timestamp(&at), id],
                )?;
                Ok(rows_affected > 0)
            })
            .await
    }
}
