//! Conversation history persistence.

use sqlx::SqlitePool;

use crate::models::HistoryEntry;
use crate::Result;

/// Insert a conversation turn.
pub async fn append_history(
    pool: &SqlitePool,
    user_id: i64,
    role: &str,
    content: &str,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO history (user_id, role, content)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(user_id)
    .bind(role)
    .bind(content)
    .execute(pool)
    .await?;

    Ok(())
}

/// Get the most recent turns for a user, newest first.
pub async fn read_history(
    pool: &SqlitePool,
    user_id: i64,
    limit: i64,
) -> Result<Vec<HistoryEntry>> {
    let rows = sqlx::query_as::<_, HistoryEntry>(
        r#"
        SELECT id, user_id, role, content, created_at
        FROM history
        WHERE user_id = ?
        ORDER BY created_at DESC, id DESC
        LIMIT ?
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Delete every turn for a user except the `limit` most recent ones.
pub async fn delete_history_except_recent(
    pool: &SqlitePool,
    user_id: i64,
    limit: i64,
) -> Result<u64> {
    let result = sqlx::query(
        r#"
        DELETE FROM history
        WHERE id IN (
            SELECT id
            FROM history
            WHERE user_id = ?
            ORDER BY created_at DESC, id DESC
            LIMIT -1 OFFSET ?
        )
        "#,
    )
    .bind(user_id)
    .bind(limit.max(0))
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

/// Count stored turns for a user.
pub async fn count_history(pool: &SqlitePool, user_id: i64) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM history WHERE user_id = ?
        "#,
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(count)
}
