//! Invoice payloads and payment settlement.

use chrono::{DateTime, Duration, Utc};
use database::{payment, user, Database, PaymentStatus, Principal};
use tracing::{info, warn};

use crate::error::{OrchestratorError, Result};
use crate::ledger::EntitlementLedger;

const USER_PREFIX: &str = "user_pay_";
const GROUP_PREFIX: &str = "group_pay_";

/// Payload for a personal invoice: `user_pay_<user_id>_<amount>`.
pub fn user_payload(user_id: i64, amount: i64) -> String {
    format!("{}{}_{}", USER_PREFIX, user_id, amount)
}

/// Payload for a group invoice: `group_pay_<chat_id>_<user_id>_<amount>`.
pub fn group_payload(chat_id: i64, user_id: i64, amount: i64) -> String {
    format!("{}{}_{}_{}", GROUP_PREFIX, chat_id, user_id, amount)
}

/// Who a settled payment pays for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentTarget {
    /// The paying user personally.
    Payer,
    /// A group chat.
    Group(i64),
}

impl PaymentTarget {
    /// Resolve against the paying user.
    pub fn principal(&self, payer_id: i64) -> Principal {
        match self {
            PaymentTarget::Payer => Principal::User(payer_id),
            PaymentTarget::Group(chat_id) => Principal::Group(*chat_id),
        }
    }
}

/// Decode an invoice payload.
///
/// Anything that is not a group payload pays for the payer. A group payload
/// whose chat id does not parse is an error rather than a silent personal
/// grant.
pub fn parse_payload(payload: &str) -> Result<PaymentTarget> {
    let Some(rest) = payload.strip_prefix(GROUP_PREFIX) else {
        return Ok(PaymentTarget::Payer);
    };

    rest.split('_')
        .next()
        .and_then(|chat_id| chat_id.parse::<i64>().ok())
        .map(PaymentTarget::Group)
        .ok_or_else(|| {
            OrchestratorError::Settlement(format!("bad group payload: {}", payload))
        })
}

/// Result of a successful settlement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settlement {
    /// Who got access.
    pub principal: Principal,
    /// Payment row moved to `success`, if one was pending.
    pub payment_id: Option<i64>,
    /// New expiry.
    pub paid_until: DateTime<Utc>,
}

/// Applies successful payments to the ledger.
#[derive(Debug, Clone)]
pub struct SettlementHandler {
    db: Database,
    ledger: EntitlementLedger,
    access_days: i64,
}

impl SettlementHandler {
    /// Create a handler granting `access_days` per payment.
    pub fn new(db: Database, ledger: EntitlementLedger, access_days: i64) -> Self {
        Self {
            db,
            ledger,
            access_days,
        }
    }

    /// Settle a payment made by `payer_id` with the given invoice payload.
    ///
    /// The latest pending payment of the payer is marked paid. This matches
    /// by recency, not by payload, so two open invoices from one user settle
    /// in reverse order of creation.
    pub async fn settle(
        &self,
        payer_id: i64,
        username: &str,
        payload: &str,
    ) -> Result<Settlement> {
        let pool = self.db.pool();
        user::register_user(pool, payer_id, username).await?;

        let payment_id = payment::find_latest_pending_payment(pool, payer_id).await?;
        match payment_id {
            Some(id) => payment::update_payment_status(pool, id, PaymentStatus::Success).await?,
            None => warn!(
                "No pending payment for user {} (payload {}), granting anyway",
                payer_id, payload
            ),
        }

        let principal = parse_payload(payload)?.principal(payer_id);
        let period = Duration::try_days(self.access_days).ok_or_else(|| {
            OrchestratorError::Settlement(format!("bad access period: {}", self.access_days))
        })?;
        let paid_until = self.ledger.grant(principal, period).await?;

        info!(
            "Settled payment {:?} from user {} for {}",
            payment_id, payer_id, principal
        );

        Ok(Settlement {
            principal,
            payment_id,
            paid_until,
        })
    }
}
