mod folder_service;
mod note_repository;
mod sharing_service;

pub use folder_service::{FolderDeletion, FolderService};
pub use note_repository::NoteRepository;
pub use sharing_service::SharingService;

use std::sync::Arc;

use crate::config::CoreConfig;
use crate::storage::{Database, SqliteNoteStore, SqliteUserDirectory};

/// The services wired onto one SQLite database.
#[derive(Clone)]
pub struct Services {
    pub notes: NoteRepository,
    pub folders: FolderService,
    pub sharing: SharingService,
    pub users: SqliteUserDirectory,
}

impl Services {
    /// Nothing touches the database until the first call.
    pub fn sqlite(config: &CoreConfig) -> Self {
        let db = Arc::new(Database::new(&config.database_path));
        Self::on_database(db, config)
    }

    pub fn on_database(db: Arc<Database>, config: &CoreConfig) -> Self {
        let users = SqliteUserDirectory::new(Arc::clone(&db));
        let notes = NoteRepository::with_config(Arc::new(SqliteNoteStore::new(db)), config);
        Self {
            folders: FolderService::new(notes.clone()),
            sharing: SharingService::new(notes.clone(), Arc::new(users.clone())),
            notes,
            users,
        }
    }
}
