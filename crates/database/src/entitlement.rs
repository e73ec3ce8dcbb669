//! Paid-until storage for users and group chats.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::{GroupChat, Principal};

/// Get the stored expiry for a principal.
///
/// Returns `None` both when no row exists and when the row has never been
/// granted access.
pub async fn get_entitlement(
    pool: &SqlitePool,
    principal: Principal,
) -> Result<Option<DateTime<Utc>>> {
    let sql = match principal {
        Principal::User(_) => "SELECT paid_until FROM users WHERE user_id = ?",
        Principal::Group(_) => "SELECT paid_until FROM group_chats WHERE chat_id = ?",
    };

    let paid_until = sqlx::query_scalar::<_, Option<DateTime<Utc>>>(sql)
        .bind(principal.id())
        .fetch_optional(pool)
        .await?
        .flatten();

    Ok(paid_until)
}

/// Set the expiry for a principal, creating the row if needed.
///
/// Any existing expiry is overwritten.
pub async fn set_entitlement(
    pool: &SqlitePool,
    principal: Principal,
    paid_until: DateTime<Utc>,
) -> Result<()> {
    match principal {
        Principal::User(user_id) => {
            sqlx::query(
                r#"
                INSERT INTO users (user_id, username, paid_until)
                VALUES (?, 'manual', ?)
                ON CONFLICT(user_id) DO UPDATE SET
                    paid_until = excluded.paid_until
                "#,
            )
            .bind(user_id)
            .bind(paid_until)
            .execute(pool)
            .await?;
        }
        Principal::Group(chat_id) => {
            sqlx::query(
                r#"
                INSERT INTO group_chats (chat_id, paid_until)
                VALUES (?, ?)
                ON CONFLICT(chat_id) DO UPDATE SET
                    paid_until = excluded.paid_until
                "#,
            )
            .bind(chat_id)
            .bind(paid_until)
            .execute(pool)
            .await?;
        }
    }

    Ok(())
}

/// Get a group chat by ID.
pub async fn get_group(pool: &SqlitePool, chat_id: i64) -> Result<GroupChat> {
    sqlx::query_as::<_, GroupChat>(
        r#"
        SELECT chat_id, paid_until, created_at
        FROM group_chats
        WHERE chat_id = ?
        "#,
    )
    .bind(chat_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "GroupChat",
        id: chat_id.to_string(),
    })
}
