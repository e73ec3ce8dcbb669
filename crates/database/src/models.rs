//! Database models.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::DatabaseError;

/// An entity that can hold entitlement: an individual user or a group chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum Principal {
    /// Individual user, keyed by transport user id.
    User(i64),
    /// Group chat, keyed by transport chat id.
    Group(i64),
}

impl Principal {
    /// Raw transport id of the principal.
    pub fn id(&self) -> i64 {
        match self {
            Principal::User(id) | Principal::Group(id) => *id,
        }
    }

    /// Whether this principal is a group chat.
    pub fn is_group(&self) -> bool {
        matches!(self, Principal::Group(_))
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Principal::User(id) => write!(f, "user:{}", id),
            Principal::Group(id) => write!(f, "group:{}", id),
        }
    }
}

/// A user who has contacted the bot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Transport user id.
    pub user_id: i64,
    /// Username at registration time ("аноним" when unknown).
    pub username: String,
    /// Personal access expiry, if ever granted.
    pub paid_until: Option<DateTime<Utc>>,
    /// Registration timestamp.
    pub created_at: String,
}

/// A group chat with shared access.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct GroupChat {
    /// Transport chat id (negative for Telegram groups).
    pub chat_id: i64,
    /// Group access expiry.
    pub paid_until: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: String,
}

/// Payment lifecycle state. Transitions only go `Pending -> Success`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Success,
}

impl PaymentStatus {
    /// Storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Success => "success",
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = DatabaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(PaymentStatus::Pending),
            "success" => Ok(PaymentStatus::Success),
            other => Err(DatabaseError::InvalidValue {
                field: "payment status",
                value: other.to_string(),
            }),
        }
    }
}

/// An invoice issued to a user, optionally on behalf of a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Payment {
    /// Auto-incrementing ID.
    pub id: i64,
    /// Paying user.
    pub user_id: i64,
    /// Group the payment is for, if any.
    pub chat_id: Option<i64>,
    /// Amount in the smallest currency unit.
    pub amount: i64,
    /// Raw status ("pending" or "success").
    pub status: String,
    /// Opaque invoice payload.
    pub payload: String,
    /// Creation timestamp.
    pub created_at: String,
}

impl Payment {
    /// Parsed payment status.
    pub fn status(&self) -> Result<PaymentStatus, DatabaseError> {
        self.status.parse()
    }
}

/// A single stored conversation turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct HistoryEntry {
    /// Auto-incrementing ID (tie-breaker for equal timestamps).
    pub id: i64,
    /// Owner of the turn.
    pub user_id: i64,
    /// "user" or "assistant".
    pub role: String,
    /// Turn text.
    pub content: String,
    /// Creation timestamp.
    pub created_at: String,
}
