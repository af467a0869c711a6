use std::sync::Arc;

use async_trait::async_trait;
use rusqlite::{params, OptionalExtension, Row};

use super::store::{StoreResult, UserDirectory};
use super::Database;
use crate::models::{datetime_to_timestamp, email, timestamp_to_datetime, User};

/// `UserDirectory` over the `users` table.
#[derive(Clone)]
pub struct SqliteUserDirectory {
    db: Arc<Database>,
}

fn row_to_user(row: &Row) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        email: row.get(1)?,
        created_at: timestamp_to_datetime(row.get(2)?),
    })
}

impl SqliteUserDirectory {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Register a user
    pub async fn create(&self, user: &User) -> StoreResult<()> {
        let user = user.clone();
        self.db
            .run(move |conn| {
                conn.execute(
                    "INSERT INTO users (id, email, created_at) VALUES (?1, ?2, ?3)",
                    params![user.id, user.email, datetime_to_timestamp(&user.created_at)],
                )?;
                Ok(())
            })
            .await
    }

    pub async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let email = email::normalize(email);
        self.db
            .run(move |conn| {
                let user = conn
                    .query_row(
                        "SELECT id, email, created_at FROM users WHERE email = ?1",
                        params![email],
                        row_to_user,
                    )
                    .optional()?;
                Ok(user)
            })
            .await
    }
}

#[async_trait]
impl UserDirectory for SqliteUserDirectory {
    async fn find_by_emails(&self, emails: &[String]) -> StoreResult<Vec<User>> {
        if emails.is_empty() {
            return Ok(Vec::new());
        }
        let wanted: Vec<String> = emails.iter().map(|e| email::normalize(e)).collect();
        let wanted = serde_json::to_string(&wanted)?;
        self.db
            .run(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT id, email, created_at FROM users \
                     WHERE email IN (SELECT value FROM json_each(?1)) ORDER BY email",
                )?;
                let users = stmt
                    .query_map(params![wanted], row_to_user)?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(users)
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_and_find() {
        let users = SqliteUserDirectory::new(Arc::new(Database::in_memory()));
        let alice = User::new("alice@x.com");
        users.create(&alice).await.unwrap();

        let found = users.find_by_email("ALICE@x.com").await.unwrap().unwrap();
        assert_eq!(found.id, alice.id);
        assert!(users.find_by_email("nobody@x.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let users = SqliteUserDirectory::new(Arc::new(Database::in_memory()));
        users.create(&User::new("alice@x.com")).await.unwrap();
        assert!(users.create(&User::new("Alice@X.com")).await.is_err());
    }

    #[tokio::test]
    async fn test_find_by_emails_skips_unknown() {
        let users = SqliteUserDirectory::new(Arc::new(Database::in_memory()));
        users.create(&User::new("a@x.com")).await.unwrap();
        users.create(&User::new("b@x.com")).await.unwrap();

        let emails = vec![
            "B@x.com".to_string(),
            "ghost@x.com".to_string(),
            "a@x.com".to_string(),
        ];
        let found = users.find_by_emails(&emails).await.unwrap();
        let found: Vec<&str> = found.iter().map(|u| u.email.as_str()).collect();
        assert_eq!(found, vec!["a@x.com", "b@x.com"]);
        assert!(users.find_by_emails(&[]).await.unwrap().is_empty());
    }
}
