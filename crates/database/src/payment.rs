//! Payment records.

use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::{Payment, PaymentStatus};

/// Record a new pending payment and return its ID.
pub async fn create_payment(
    pool: &SqlitePool,
    user_id: i64,
    chat_id: Option<i64>,
    amount: i64,
    payload: &str,
) -> Result<i64> {
    let id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO payments (user_id, chat_id, amount, status, payload)
        VALUES (?, ?, ?, 'pending', ?)
        RETURNING id
        "#,
    )
    .bind(user_id)
    .bind(chat_id)
    .bind(amount)
    .bind(payload)
    .fetch_one(pool)
    .await?;

    Ok(id)
}

/// Update the status of a payment.
pub async fn update_payment_status(
    pool: &SqlitePool,
    payment_id: i64,
    status: PaymentStatus,
) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE payments
        SET status = ?
        WHERE id = ?
        "#,
    )
    .bind(status.as_str())
    .bind(payment_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "Payment",
            id: payment_id.to_string(),
        });
    }

    Ok(())
}

/// Find the most recent pending payment for a user.
pub async fn find_latest_pending_payment(pool: &SqlitePool, user_id: i64) -> Result<Option<i64>> {
    let id = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT id
        FROM payments
        WHERE user_id = ? AND status = 'pending'
        ORDER BY created_at DESC, id DESC
        LIMIT 1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(id)
}

/// Get a payment by ID.
pub async fn get_payment(pool: &SqlitePool, payment_id: i64) -> Result<Payment> {
    sqlx::query_as::<_, Payment>(
        r#"
        SELECT id, user_id, chat_id, amount, status, payload, created_at
        FROM payments
        WHERE id = ?
        "#,
    )
    .bind(payment_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "Payment",
        id: payment_id.to_string(),
    })
}
