mod note;
mod payload;
mod principal;
pub mod color;
pub mod email;
pub mod tag;

pub use note::{
    normalize_folder, normalize_title, EditorType, Note, DEFAULT_FOLDER, MAX_FOLDER_CHARS,
    MAX_TITLE_CHARS,
};
pub use payload::{NewNote, NoteUpdate, ShareRequest};
pub use principal::{Principal, User};

use chrono::{DateTime, Utc};

/// Convert Unix timestamp (milliseconds) to DateTime<Utc>
pub fn timestamp_to_datetime(timestamp: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(timestamp).unwrap_or_default()
}

/// Convert DateTime<Utc> to Unix timestamp (milliseconds)
pub fn datetime_to_timestamp(datetime: &DateTime<Utc>) -> i64 {
    datetime.timestamp_millis()
}

/// Current time at the precision the store keeps
pub fn now() -> DateTime<Utc> {
    timestamp_to_datetime(datetime_to_timestamp(&Utc::now()))
}
