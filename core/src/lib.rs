//! Note query, filtering and sharing-visibility core.
//!
//! Callers resolve a [`models::Principal`] and go through the services in
//! [`service`]; every single-note read or write is checked against
//! [`visibility`]. Persistence sits behind [`storage::NoteStore`] and
//! [`storage::UserDirectory`], with SQLite drivers included.

pub mod config;
pub mod error;
pub mod models;
pub mod query;
pub mod service;
pub mod storage;
pub mod visibility;

pub use config::{ConfigError, CoreConfig};
pub use error::{Error, Field, Result, StoreError};
pub use service::{FolderDeletion, FolderService, NoteRepository, Services, SharingService};
