//! # User Repository
//!
//! Database operations for login accounts. Password hashing lives in
//! the server's auth module; this repository only stores and fetches
//! the PHC hash string.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use shopbill_core::User;

/// Repository for user database operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Fetches a user by username.
    pub async fn find_by_username(&self, username: &str) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash, created_at
             FROM users
             WHERE username = ?1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Whether a username is already taken.
    pub async fn username_exists(&self, username: &str) -> DbResult<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE username = ?1")
            .bind(username)
            .fetch_one(&self.pool)
            .await?;

        Ok(count > 0)
    }

    /// Inserts a new user and returns its id.
    ///
    /// `password_hash` must already be an argon2 PHC string.
    pub async fn insert(&self, username: &str, password_hash: &str) -> DbResult<i64> {
        debug!(username = %username, "Inserting user");

        let result = sqlx::query(
            "INSERT INTO users (username, password_hash, created_at)
             VALUES (?1, ?2, ?3)",
        )
        .bind(username)
        .bind(password_hash)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::pool::{Database, DbConfig};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let db = test_db().await;
        let repo = db.users();

        assert!(!repo.username_exists("cashier1").await.unwrap());

        let id = repo.insert("cashier1", "$argon2id$fake").await.unwrap();
        assert!(id > 0);
        assert!(repo.username_exists("cashier1").await.unwrap());

        let user = repo.find_by_username("cashier1").await.unwrap().unwrap();
        assert_eq!(user.id, id);
        assert_eq!(user.password_hash, "$argon2id$fake");

        assert!(repo.find_by_username("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_is_unique_violation() {
        let db = test_db().await;
        let repo = db.users();

        repo.insert("cashier1", "h1").await.unwrap();
        let err = repo.insert("cashier1", "h2").await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }
}
