use crate::error::StoreError;
use crate::{Error, Result};
use rusqlite::functions::FunctionFlags;
use rusqlite::Connection as SqliteConnection;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio::sync::OnceCell;

pub type Connection = SqliteConnection;

const IN_MEMORY: &str = ":memory:";

/// Database manager shared by the SQLite drivers.
///
/// The connection is opened on first use and then reused by every store
/// built on the same `Database`. Work runs on the blocking thread pool.
pub struct Database {
    db_path: PathBuf,
    shared: OnceCell<Arc<Mutex<Connection>>>,
}

impl Database {
    /// Create a new database manager
    pub fn new<P: AsRef<Path>>(db_path: P) -> Self {
        Self {
            db_path: db_path.as_ref().to_path_buf(),
            shared: OnceCell::new(),
        }
    }

    /// A private in-memory database, mostly for tests
    pub fn in_memory() -> Self {
        Self::new(IN_MEMORY)
    }

    fn is_in_memory(&self) -> bool {
        self.db_path.as_os_str() == IN_MEMORY
    }

    /// Get a connection to the database
    pub fn connect(&self) -> Result<Connection> {
        let conn = SqliteConnection::open(&self.db_path)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        register_functions(&conn)?;
        Ok(conn)
    }

    /// Create a new database and initialize it with the schema
    pub fn create(&self) -> Result<Connection> {
        if !self.is_in_memory() {
            if let Some(parent) = self.db_path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent).map_err(StoreError::from)?;
                }
            }
        }

        let conn = self.connect()?;
        self.initialize_schema(&conn)?;
        Ok(conn)
    }

    /// Initialize the database schema
    fn initialize_schema(&self, conn: &Connection) -> Result<()> {
        let schema = include_str!("../../schema.sql");
        conn.execute_batch(schema)?;
        Ok(())
    }

    /// The shared connection, opened and migrated on first call
    async fn shared(&self) -> std::result::Result<Arc<Mutex<Connection>>, StoreError> {
        let conn = self
            .shared
            .get_or_try_init(|| async {
                let path = self.db_path.clone();
                let conn = tokio::task::spawn_blocking(move || {
                    let db = Database::new(path);
                    db.create().map_err(|e| match e {
                        Error::PersistenceUnavailable(inner) => inner,
                        other => StoreError::Corrupt(other.to_string()),
                    })
                })
                .await??;
                tracing::debug!(path = %self.db_path.display(), "opened database");
                Ok::<_, StoreError>(Arc::new(Mutex::new(conn)))
            })
            .await?;
        Ok(Arc::clone(conn))
    }

    /// Run `f` against the shared connection on the blocking pool
    pub async fn run<T, F>(&self, f: F) -> std::result::Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> std::result::Result<T, StoreError> + Send + 'static,
    {
        let shared = self.shared().await?;
        tokio::task::spawn_blocking(move || {
            let conn = shared.lock().map_err(|_| StoreError::Poisoned)?;
            f(&conn)
        })
        .await?
    }
}

/// `ci_contains(haystack, needle)`: substring test that ignores case for any
/// script, not only ASCII like the built-in `LIKE`.
fn register_functions(conn: &Connection) -> rusqlite::Result<()> {
    conn.create_scalar_function(
        "ci_contains",
        2,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let haystack = ctx.get::<Option<String>>(0)?.unwrap_or_default();
            let needle = ctx.get::<Option<String>>(1)?.unwrap_or_default();
            Ok(haystack.to_lowercase().contains(&needle.to_lowercase()))
        },
    )
}
