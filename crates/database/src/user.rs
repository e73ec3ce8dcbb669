//! User registration and lookup.

use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::User;

/// Register a user if they are not known yet.
///
/// Existing rows are left untouched, so a returning user keeps their
/// `paid_until` and original username.
pub async fn register_user(pool: &SqlitePool, user_id: i64, username: &str) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO users (user_id, username, paid_until)
        VALUES (?, ?, NULL)
        ON CONFLICT(user_id) DO NOTHING
        "#,
    )
    .bind(user_id)
    .bind(username)
    .execute(pool)
    .await?;

    Ok(())
}

/// Get a user by ID.
pub async fn get_user(pool: &SqlitePool, user_id: i64) -> Result<User> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT user_id, username, paid_until, created_at
        FROM users
        WHERE user_id = ?
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "User",
        id: user_id.to_string(),
    })
}

/// Count registered users.
pub async fn count_users(pool: &SqlitePool) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM users
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(count)
}
