use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::email;

/// The authenticated actor behind a request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Principal {
    pub id: String,
    pub email: String,
}

impl Principal {
    pub fn new(id: impl Into<String>, email: &str) -> Self {
        Self {
            id: id.into(),
            email: email::normalize(email),
        }
    }
}

/// A registered account, as seen by collaborator lookups
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(email: &str) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            email: email::normalize(email),
            created_at: crate::models::now(),
        }
    }

    pub fn principal(&self) -> Principal {
        Principal {
            id: self.id.clone(),
            email: self.email.clone(),
        }
    }
}
