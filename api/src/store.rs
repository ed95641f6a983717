use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

use crate::error::AppResult;
use crate::models::user::User;

const USER_COLUMNS: &str =
    "id, username, email, full_name, password_hash, disabled, created_at, updated_at";

/// Open the account database and bring its schema up to date.
pub async fn connect(database_url: &str) -> AppResult<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;
    migrate(&pool).await?;
    Ok(pool)
}

pub async fn migrate(pool: &SqlitePool) -> AppResult<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| crate::error::AppError::Internal(format!("migration failed: {}", e)))
}

pub struct UserStore;

impl UserStore {
    /// Insert a new, enabled account. Uniqueness of username and email is
    /// left to the table constraints.
    pub async fn create(
        pool: &SqlitePool,
        username: &str,
        email: &str,
        full_name: &str,
        password_hash: &str,
    ) -> AppResult<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (username, email, full_name, password_hash) VALUES (?, ?, ?, ?) RETURNING {}",
            USER_COLUMNS
        ))
        .bind(username)
        .bind(email)
        .bind(full_name)
        .bind(password_hash)
        .fetch_one(pool)
        .await?;
        Ok(user)
    }

    pub async fn get_by_username(pool: &SqlitePool, username: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE username = ?",
            USER_COLUMNS
        ))
        .bind(username)
        .fetch_optional(pool)
        .await?;
        Ok(user)
    }

    pub async fn username_exists(pool: &SqlitePool, username: &str) -> AppResult<bool> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE username = ?")
            .bind(username)
            .fetch_one(pool)
            .await?;
        Ok(count > 0)
    }

    pub async fn email_exists(pool: &SqlitePool, email: &str) -> AppResult<bool> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE email = ?")
            .bind(email)
            .fetch_one(pool)
            .await?;
        Ok(count > 0)
    }

    /// Returns false when no account has that username.
    pub async fn set_disabled(
        pool: &SqlitePool,
        username: &str,
        disabled: bool,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE users SET disabled = ?, updated_at = CURRENT_TIMESTAMP WHERE username = ?",
        )
        .bind(disabled)
        .bind(username)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    async fn memory_pool() -> SqlitePool {
        // One connection: every new in-memory connection is a fresh database.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        migrate(&pool).await.unwrap();
        pool
    }

    #[tokio::test]
    async fn test_create_and_fetch() {
        let pool = memory_pool().await;
        let user = UserStore::create(&pool, "alice", "a@x.com", "Alice", "$hash")
            .await
            .unwrap();
        assert_eq!(user.username, "alice");
        assert!(!user.disabled);

        let fetched = UserStore::get_by_username(&pool, "alice").await.unwrap().unwrap();
        assert_eq!(fetched.id, user.id);
        assert_eq!(fetched.email, "a@x.com");
        assert_eq!(fetched.password_hash, "$hash");
        assert!(UserStore::get_by_username(&pool, "bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unique_constraints_enforced_by_table() {
        let pool = memory_pool().await;
        UserStore::create(&pool, "alice", "a@x.com", "Alice", "h").await.unwrap();

        let dup_username = UserStore::create(&pool, "alice", "other@x.com", "A", "h").await;
        match dup_username {
            Err(AppError::Sqlx(e)) => {
                assert!(e.as_database_error().unwrap().is_unique_violation())
            }
            other => panic!("expected unique violation, got {:?}", other),
        }

        let dup_email = UserStore::create(&pool, "alice2", "a@x.com", "A", "h").await;
        assert!(matches!(dup_email, Err(AppError::Sqlx(_))));

        let rows = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE username = ?")
            .bind("alice")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[tokio::test]
    async fn test_exists_checks() {
        let pool = memory_pool().await;
        UserStore::create(&pool, "alice", "a@x.com", "Alice", "h").await.unwrap();
        assert!(UserStore::username_exists(&pool, "alice").await.unwrap());
        assert!(!UserStore::username_exists(&pool, "bob").await.unwrap());
        assert!(UserStore::email_exists(&pool, "a@x.com").await.unwrap());
        assert!(!UserStore::email_exists(&pool, "b@x.com").await.unwrap());
    }

    #[tokio::test]
    async fn test_set_disabled() {
        let pool = memory_pool().await;
        UserStore::create(&pool, "alice", "a@x.com", "Alice", "h").await.unwrap();
        assert!(UserStore::set_disabled(&pool, "alice", true).await.unwrap());
        let user = UserStore::get_by_username(&pool, "alice").await.unwrap().unwrap();
        assert!(user.disabled);
        assert!(!UserStore::set_disabled(&pool, "ghost", true).await.unwrap());
    }
}
