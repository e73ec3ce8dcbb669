//! Entitlement ledger: who may talk to the bot, and for how long.

use chrono::{DateTime, Duration, Utc};
use database::{entitlement, Database, DatabaseError, Principal};
use tracing::info;

/// Days left until `paid_until`.
///
/// `-1` when there has never been a grant, `0` once expired, otherwise whole
/// days remaining rounded down.
pub fn days_remaining(paid_until: Option<DateTime<Utc>>, now: DateTime<Utc>) -> i64 {
    match paid_until {
        None => -1,
        Some(until) => (until - now).num_days().max(0),
    }
}

/// Paid-until bookkeeping for users and group chats.
#[derive(Debug, Clone)]
pub struct EntitlementLedger {
    db: Database,
}

impl EntitlementLedger {
    /// Create a ledger over the given database.
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Whether `principal` is entitled right now.
    pub async fn is_entitled(&self, principal: Principal) -> database::Result<bool> {
        self.is_entitled_at(principal, Utc::now()).await
    }

    /// Whether `principal` is entitled at `now`.
    pub async fn is_entitled_at(
        &self,
        principal: Principal,
        now: DateTime<Utc>,
    ) -> database::Result<bool> {
        let paid_until = entitlement::get_entitlement(self.db.pool(), principal).await?;
        Ok(paid_until.is_some_and(|until| until > now))
    }

    /// Whole days of access left. See [`days_remaining`].
    pub async fn remaining_days(&self, principal: Principal) -> database::Result<i64> {
        self.remaining_days_at(principal, Utc::now()).await
    }

    /// Whole days of access left at `now`.
    pub async fn remaining_days_at(
        &self,
        principal: Principal,
        now: DateTime<Utc>,
    ) -> database::Result<i64> {
        let paid_until = entitlement::get_entitlement(self.db.pool(), principal).await?;
        Ok(days_remaining(paid_until, now))
    }

    /// Set `paid_until = now + period`, replacing any previous value.
    pub async fn grant(
        &self,
        principal: Principal,
        period: Duration,
    ) -> database::Result<DateTime<Utc>> {
        self.grant_at(principal, period, Utc::now()).await
    }

    /// Set `paid_until = now + period` for an explicit `now`.
    ///
    /// Grants reset the clock; they never stack on top of remaining time.
    pub async fn grant_at(
        &self,
        principal: Principal,
        period: Duration,
        now: DateTime<Utc>,
    ) -> database::Result<DateTime<Utc>> {
        let paid_until = now
            .checked_add_signed(period)
            .ok_or_else(|| DatabaseError::InvalidValue {
                field: "paid_until",
                value: format!("{} + {}", now, period),
            })?;
        entitlement::set_entitlement(self.db.pool(), principal, paid_until).await?;
        info!("Granted {} until {}", principal, paid_until);
        Ok(paid_until)
    }
}
