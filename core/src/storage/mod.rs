mod database;
mod sqlite_notes;
mod sqlite_users;
mod store;

pub use database::{Connection, Database};
pub use sqlite_notes::SqliteNoteStore;
pub use sqlite_users::SqliteUserDirectory;
pub use store::{BulkUpdate, FindOptions, NoteFilter, NoteStore, StoreResult, UserDirectory};
