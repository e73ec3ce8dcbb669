//! Main orchestrator that coordinates message processing.

use brain_core::{hash_prompt, Brain, CompletionOutcome, CompletionRequest, Role};
use chrono::{Duration, Utc};
use database::{payment, user, Database, Principal};
use tracing::{debug, error, info, warn};

use crate::command::Command;
use crate::config::OrchestratorConfig;
use crate::error::{OrchestratorError, Result};
use crate::event::{username_or_default, ChatKind, InboundText, SettlementEvent};
use crate::history::HistoryStore;
use crate::ledger::EntitlementLedger;
use crate::messages;
use crate::sender::{Invoice, MessageSender};
use crate::settlement::{group_payload, user_payload, SettlementHandler};
use crate::single_flight::InFlight;

/// Why `/grant` arguments were rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GrantArgsError {
    Usage,
    NotNumbers,
    NotPositive,
}

fn parse_grant_args(args: &[String]) -> std::result::Result<(i64, Duration), GrantArgsError> {
    let [target, days] = args else {
        return Err(GrantArgsError::Usage);
    };

    let target: i64 = target.parse().map_err(|_| GrantArgsError::NotNumbers)?;
    let days: i64 = days.parse().map_err(|_| GrantArgsError::NotNumbers)?;
    if days <= 0 {
        return Err(GrantArgsError::NotPositive);
    }
    let period = Duration::try_days(days).ok_or(GrantArgsError::NotNumbers)?;

    Ok((target, period))
}

/// Main orchestrator that coordinates message processing.
///
/// The orchestrator:
/// - Gates triggered messages on the entitlement of the user or group
/// - Keeps one completion in flight per user
/// - Persists the question before asking the brain, the answer only if genuine
/// - Issues invoices and settles payments
/// - Answers `/start`, `/status` and the admin grant commands
///
/// Every inbound event gets exactly one reply. Internal failures are logged
/// and answered with a fixed text; they never propagate to the caller.
pub struct Orchestrator<B: Brain, S: MessageSender> {
    db: Database,
    brain: B,
    sender: S,
    ledger: EntitlementLedger,
    history: HistoryStore,
    settlement: SettlementHandler,
    in_flight: InFlight,
    config: OrchestratorConfig,
}

impl<B: Brain, S: MessageSender> Orchestrator<B, S> {
    /// Create a new orchestrator with the given components.
    pub fn new(db: Database, brain: B, sender: S, config: OrchestratorConfig) -> Self {
        let ledger = EntitlementLedger::new(db.clone());
        let history = HistoryStore::new(db.clone(), config.max_history);
        let settlement = SettlementHandler::new(db.clone(), ledger.clone(), config.access_days);

        info!(
            "Orchestrator ready: brain={}, trigger={:?}, access_days={}, max_history={}",
            brain.name(),
            config.trigger_prefix,
            config.access_days,
            history.max_history()
        );
        info!(
            "System prompt fingerprint: {}",
            hash_prompt(&config.system_prompt)
        );
        if config.admin_id.is_none() {
            warn!("ADMIN_ID not set, admin commands will be refused");
        }

        Self {
            db,
            brain,
            sender,
            ledger,
            history,
            settlement,
            in_flight: InFlight::new(),
            config,
        }
    }

    /// Get the configuration.
    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Get the entitlement ledger.
    pub fn ledger(&self) -> &EntitlementLedger {
        &self.ledger
    }

    /// Get the history store.
    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    /// Get the in-flight set.
    pub fn in_flight(&self) -> &InFlight {
        &self.in_flight
    }

    /// Handle a text message.
    ///
    /// Returns the reply that was sent, or `None` when the message was not
    /// meant for the bot.
    pub async fn handle_text(&self, message: InboundText) -> Option<String> {
        let command = Command::parse(&message.text, &self.config.trigger_prefix)?;
        debug!(
            "Handling {:?} from {} in {}",
            command, message.sender_id, message.chat_id
        );

        // /start greets; everything else threads onto the message.
        let reply_to = match command {
            Command::Start => None,
            _ => message.message_id,
        };

        let result = match command {
            Command::Ask(question) => self.ask(&message, &question).await,
            Command::Start => self.start(&message).await,
            Command::Status => self.status(&message).await,
            Command::Pay => self.pay(&message).await,
            Command::Grant(args) => self.grant_user(&message, &args).await,
            Command::GrantGroup(args) => self.grant_group(&message, &args).await,
        };

        let text = result.unwrap_or_else(|e| {
            error!(
                "Failed to handle message from {} in {}: {}",
                message.sender_id, message.chat_id, e
            );
            messages::GENERIC_FAILURE.to_string()
        });

        self.reply(message.chat_id, &text, reply_to).await;
        Some(text)
    }

    /// Handle a successful payment. Returns the reply that was sent.
    pub async fn handle_settlement(&self, event: SettlementEvent) -> String {
        let username = username_or_default(event.username.as_deref());
        let days = self.config.access_days;

        let text = match self
            .settlement
            .settle(event.sender_id, username, &event.payload)
            .await
        {
            Ok(settlement) if settlement.principal.is_group() => messages::settled_group(days),
            Ok(_) => messages::settled_private(days),
            Err(OrchestratorError::Settlement(reason)) => {
                error!(
                    "Payment from {} could not be applied: {}",
                    event.sender_id, reason
                );
                messages::SETTLEMENT_FAILED.to_string()
            }
            Err(e) => {
                error!("Failed to settle payment from {}: {}", event.sender_id, e);
                messages::GENERIC_FAILURE.to_string()
            }
        };

        self.reply(event.chat_id, &text, event.message_id).await;
        text
    }

    /// Approve a pre-checkout query. Every query is approved.
    pub async fn handle_pre_checkout(&self, query_id: &str) {
        info!("Approving pre-checkout query {}", query_id);
        if let Err(e) = self.sender.answer_pre_checkout(query_id, true).await {
            warn!("Failed to answer pre-checkout query {}: {}", query_id, e);
        }
    }

    async fn reply(&self, chat_id: i64, text: &str, reply_to: Option<i64>) {
        if let Err(e) = self.sender.send_message(chat_id, text, reply_to).await {
            warn!("Failed to send reply to {}: {}", chat_id, e);
        }
    }

    /// Answer a triggered question.
    async fn ask(&self, message: &InboundText, question: &str) -> Result<String> {
        let user_id = message.sender_id;

        let Some(_guard) = self.in_flight.try_acquire(user_id) else {
            info!("User {} already has a question in flight", user_id);
            return Ok(messages::STILL_THINKING.to_string());
        };

        user::register_user(self.db.pool(), user_id, message.username_or_default()).await?;

        let principal = message.principal();
        let now = Utc::now();
        if !self.ledger.is_entitled_at(principal, now).await? {
            let days = self.ledger.remaining_days_at(principal, now).await?;
            info!("{} not entitled (days: {})", principal, days);
            return Ok(self.gate_text(principal, days));
        }

        if question.is_empty() {
            return Ok(messages::EMPTY_QUESTION.to_string());
        }

        // History is read before the question is stored, so the question
        // appears exactly once in the prompt.
        let history = self.history.recent(user_id).await?;
        self.history.append(user_id, Role::User, question).await?;

        if let Err(e) = self.sender.set_typing(message.chat_id).await {
            warn!("Failed to start typing indicator: {}", e);
        }

        let request = CompletionRequest::new(
            self.config.system_prompt.clone(),
            question,
            principal.to_string(),
        )
        .with_history(history);

        let outcome = self.brain.complete(request).await;

        match &outcome {
            CompletionOutcome::Answer(answer) => {
                self.history.append(user_id, Role::Assistant, answer).await?;
            }
            CompletionOutcome::Fallback(kind) => {
                warn!(
                    "Completion for user {} in {} fell back: {}",
                    user_id,
                    principal,
                    kind.as_str()
                );
            }
        }

        Ok(outcome.text().to_string())
    }

    fn gate_text(&self, principal: Principal, days: i64) -> String {
        let never_paid = days < 0;
        match (principal, never_paid) {
            (Principal::Group(_), true) => {
                messages::group_never_paid(self.config.pay_amount, self.config.access_days)
            }
            (Principal::Group(_), false) => messages::GROUP_LAPSED.to_string(),
            (Principal::User(_), true) => messages::private_never_paid(self.config.access_days),
            (Principal::User(_), false) => messages::PRIVATE_LAPSED.to_string(),
        }
    }

    async fn start(&self, message: &InboundText) -> Result<String> {
        user::register_user(
            self.db.pool(),
            message.sender_id,
            message.username_or_default(),
        )
        .await?;

        Ok(match message.chat_kind {
            ChatKind::Group => messages::start_group(&self.config.trigger_prefix),
            ChatKind::Private => {
                messages::start_private(&self.config.trigger_prefix, self.config.access_days)
            }
        })
    }

    async fn status(&self, message: &InboundText) -> Result<String> {
        let principal = message.principal();
        let now = Utc::now();
        let entitled = self.ledger.is_entitled_at(principal, now).await?;
        let days = self.ledger.remaining_days_at(principal, now).await?;

        Ok(match principal {
            Principal::Group(_) => messages::group_status(days, entitled),
            Principal::User(_) => messages::private_status(days, entitled),
        })
    }

    async fn pay(&self, message: &InboundText) -> Result<String> {
        let user_id = message.sender_id;
        let amount = self.config.pay_amount;
        let days = self.config.access_days;
        user::register_user(self.db.pool(), user_id, message.username_or_default()).await?;

        let (group_chat, payload, description, nudge) = match message.chat_kind {
            ChatKind::Group => (
                Some(message.chat_id),
                group_payload(message.chat_id, user_id, amount),
                messages::invoice_description_group(amount, days),
                messages::pay_nudge_group(amount),
            ),
            ChatKind::Private => (
                None,
                user_payload(user_id, amount),
                messages::invoice_description_private(amount, days),
                messages::pay_nudge_private(amount, days),
            ),
        };

        let payment_id =
            payment::create_payment(self.db.pool(), user_id, group_chat, amount, &payload).await?;
        info!(
            "Created pending payment {} for user {} ({})",
            payment_id, user_id, payload
        );

        let invoice = Invoice {
            title: messages::INVOICE_TITLE.to_string(),
            description,
            payload,
            currency: self.config.pay_currency.clone(),
            label: messages::INVOICE_LABEL.to_string(),
            amount,
        };
        self.sender.send_invoice(message.chat_id, &invoice).await?;

        Ok(nudge)
    }

    async fn grant_user(&self, message: &InboundText, args: &[String]) -> Result<String> {
        if !self.config.is_admin(message.sender_id) {
            warn!("Refused /grant from non-admin {}", message.sender_id);
            return Ok(messages::GRANT_FORBIDDEN.to_string());
        }

        let (user_id, period) = match parse_grant_args(args) {
            Ok(parsed) => parsed,
            Err(GrantArgsError::Usage) => return Ok(messages::GRANT_USAGE.to_string()),
            Err(GrantArgsError::NotNumbers) => return Ok(messages::GRANT_NOT_NUMBERS.to_string()),
            Err(GrantArgsError::NotPositive) => {
                return Ok(messages::GRANT_DAYS_POSITIVE.to_string())
            }
        };

        let remaining = self.manual_grant(Principal::User(user_id), period).await?;
        Ok(messages::granted_user(user_id, remaining))
    }

    async fn grant_group(&self, message: &InboundText, args: &[String]) -> Result<String> {
        if !self.config.is_admin(message.sender_id) {
            warn!("Refused /grant_group from non-admin {}", message.sender_id);
            return Ok(messages::GRANT_FORBIDDEN.to_string());
        }

        let (chat_id, period) = match parse_grant_args(args) {
            Ok(parsed) => parsed,
            Err(GrantArgsError::Usage) => return Ok(messages::GRANT_GROUP_USAGE.to_string()),
            Err(GrantArgsError::NotNumbers) => {
                return Ok(messages::GRANT_GROUP_NOT_NUMBERS.to_string())
            }
            Err(GrantArgsError::NotPositive) => {
                return Ok(messages::GRANT_GROUP_DAYS_POSITIVE.to_string())
            }
        };

        let remaining = self.manual_grant(Principal::Group(chat_id), period).await?;
        Ok(messages::granted_group(chat_id, remaining))
    }

    async fn manual_grant(&self, principal: Principal, period: Duration) -> Result<i64> {
        let now = Utc::now();
        self.ledger.grant_at(principal, period, now).await?;
        let remaining = self.ledger.remaining_days_at(principal, now).await?;
        info!("Admin granted {} ({} days)", principal, remaining);
        Ok(remaining)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use brain_core::{FailureKind, HistoryMessage};
    use database::{history, PaymentStatus};
    use mock_brain::{DelayedBrain, EchoBrain, FailingBrain};

    use crate::sender::{RecordingSender, Sent};

    const ADMIN: i64 = 5653464572;
    const USER: i64 = 1001;
    const GROUP: i64 = -100500;

    async fn setup<B: Brain>(brain: B) -> (Orchestrator<B, RecordingSender>, RecordingSender) {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();
        let sender = RecordingSender::new();
        let config = OrchestratorConfig::builder()
            .system_prompt("persona")
            .admin_id(ADMIN)
            .build();
        (Orchestrator::new(db, brain, sender.clone(), config), sender)
    }

    fn private(sender_id: i64, text: &str) -> InboundText {
        InboundText {
            sender_id,
            username: Some("tester".to_string()),
            chat_id: sender_id,
            chat_kind: ChatKind::Private,
            message_id: Some(77),
            text: text.to_string(),
        }
    }

    fn group(sender_id: i64, text: &str) -> InboundText {
        InboundText {
            chat_id: GROUP,
            chat_kind: ChatKind::Group,
            ..private(sender_id, text)
        }
    }

    async fn turns<B: Brain>(orchestrator: &Orchestrator<B, RecordingSender>, user_id: i64) -> i64 {
        history::count_history(orchestrator.db.pool(), user_id)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_untriggered_text_is_ignored() {
        let (orchestrator, sender) = setup(EchoBrain::new()).await;

        let reply = orchestrator.handle_text(private(USER, "просто текст")).await;

        assert!(reply.is_none());
        assert!(sender.sent().is_empty());
    }

    #[tokio::test]
    async fn test_unpaid_user_gets_pay_prompt() {
        let brain = EchoBrain::new();
        let (orchestrator, sender) = setup(brain.clone()).await;

        let reply = orchestrator
            .handle_text(private(USER, "Мага, привет"))
            .await
            .unwrap();

        assert_eq!(reply, messages::private_never_paid(30));
        assert_eq!(turns(&orchestrator, USER).await, 0);
        assert_eq!(brain.call_count(), 0);
        assert_eq!(
            sender.sent(),
            vec![Sent::Message {
                chat_id: USER,
                text: reply,
                reply_to: Some(77),
            }]
        );
    }

    #[tokio::test]
    async fn test_lapsed_user_gets_different_text() {
        let (orchestrator, _) = setup(EchoBrain::new()).await;
        orchestrator
            .ledger()
            .grant_at(
                Principal::User(USER),
                Duration::days(30),
                Utc::now() - Duration::days(40),
            )
            .await
            .unwrap();

        let reply = orchestrator
            .handle_text(private(USER, "Мага, привет"))
            .await
            .unwrap();

        assert_eq!(reply, messages::PRIVATE_LAPSED);
        assert_eq!(turns(&orchestrator, USER).await, 0);
    }

    #[tokio::test]
    async fn test_entitled_user_gets_answer_with_history() {
        let brain = EchoBrain::with_prefix("Ответ: ");
        let (orchestrator, sender) = setup(brain.clone()).await;
        orchestrator
            .ledger()
            .grant(Principal::User(USER), Duration::days(30))
            .await
            .unwrap();

        let first = orchestrator
            .handle_text(private(USER, "Мага, первый"))
            .await
            .unwrap();
        let second = orchestrator
            .handle_text(private(USER, "мага,второй"))
            .await
            .unwrap();

        assert_eq!(first, "Ответ: первый");
        assert_eq!(second, "Ответ: второй");

        let requests = brain.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].system_prompt, "persona");
        assert!(requests[0].history.is_empty());
        assert_eq!(requests[0].principal_id, "user:1001");
        assert_eq!(
            requests[1].history,
            vec![
                HistoryMessage::user("первый"),
                HistoryMessage::assistant("Ответ: первый")
            ]
        );
        assert_eq!(requests[1].user_text, "второй");

        assert!(sender.sent().contains(&Sent::Typing { chat_id: USER }));
        assert_eq!(turns(&orchestrator, USER).await, 4);
    }

    #[tokio::test]
    async fn test_fallback_is_not_persisted() {
        let (orchestrator, _) = setup(FailingBrain::new(FailureKind::RateLimited)).await;
        orchestrator
            .ledger()
            .grant(Principal::User(USER), Duration::days(30))
            .await
            .unwrap();

        let reply = orchestrator
            .handle_text(private(USER, "Мага, ну как?"))
            .await
            .unwrap();

        assert_eq!(reply, FailureKind::RateLimited.fallback_text());
        let recent = orchestrator.history().recent(USER).await.unwrap();
        assert_eq!(recent, vec![HistoryMessage::user("ну как?")]);
    }

    #[tokio::test]
    async fn test_empty_question() {
        let brain = EchoBrain::new();
        let (orchestrator, _) = setup(brain.clone()).await;
        orchestrator
            .ledger()
            .grant(Principal::User(USER), Duration::days(30))
            .await
            .unwrap();

        let reply = orchestrator
            .handle_text(private(USER, "Мага,   "))
            .await
            .unwrap();

        assert_eq!(reply, messages::EMPTY_QUESTION);
        assert_eq!(brain.call_count(), 0);
        assert_eq!(turns(&orchestrator, USER).await, 0);
    }

    #[tokio::test]
    async fn test_group_access_shared_history_personal() {
        let brain = EchoBrain::new();
        let (orchestrator, _) = setup(brain.clone()).await;

        let reply = orchestrator
            .handle_text(group(USER, "Мага, кто тут?"))
            .await
            .unwrap();
        assert_eq!(reply, messages::group_never_paid(10, 30));

        orchestrator
            .ledger()
            .grant(Principal::Group(GROUP), Duration::days(30))
            .await
            .unwrap();

        orchestrator
            .handle_text(group(USER, "Мага, я первый"))
            .await
            .unwrap();
        let reply = orchestrator
            .handle_text(group(2002, "Мага, я второй"))
            .await
            .unwrap();

        assert_eq!(reply, "я второй");
        // The second member never sees the first member's turns.
        let requests = brain.requests();
        assert!(requests[1].history.is_empty());
        assert_eq!(requests[1].principal_id, format!("group:{}", GROUP));
        assert_eq!(turns(&orchestrator, USER).await, 2);
        assert_eq!(turns(&orchestrator, 2002).await, 2);

        // Group access does not open private chats.
        let reply = orchestrator
            .handle_text(private(USER, "Мага, а в личке?"))
            .await
            .unwrap();
        assert_eq!(reply, messages::private_never_paid(30));
    }

    #[tokio::test]
    async fn test_duplicate_in_flight_is_rejected() {
        let brain = DelayedBrain::with_millis(EchoBrain::new(), 50);
        let (orchestrator, _) = setup(brain).await;
        let orchestrator = Arc::new(orchestrator);
        orchestrator
            .ledger()
            .grant(Principal::User(USER), Duration::days(30))
            .await
            .unwrap();

        // The first call claims the slot before its first await.
        let (first, second) = tokio::join!(
            orchestrator.handle_text(private(USER, "Мага, раз")),
            orchestrator.handle_text(private(USER, "Мага, два")),
        );

        assert_eq!(first.unwrap(), "раз");
        assert_eq!(second.unwrap(), messages::STILL_THINKING);
        assert!(orchestrator.in_flight().is_empty());
        assert_eq!(turns(&orchestrator, USER).await, 2);

        // Slot is free again.
        let third = orchestrator
            .handle_text(private(USER, "Мага, три"))
            .await
            .unwrap();
        assert_eq!(third, "три");
    }

    #[tokio::test]
    async fn test_storage_failure_gets_generic_reply() {
        let (orchestrator, sender) = setup(EchoBrain::new()).await;
        orchestrator.db.close().await;

        let reply = orchestrator
            .handle_text(private(USER, "Мага, алло"))
            .await
            .unwrap();

        assert_eq!(reply, messages::GENERIC_FAILURE);
        assert_eq!(sender.texts(), vec![messages::GENERIC_FAILURE.to_string()]);
        assert!(orchestrator.in_flight().is_empty());
    }

    #[tokio::test]
    async fn test_end_to_end_private_payment() {
        let brain = EchoBrain::new();
        let (orchestrator, sender) = setup(brain.clone()).await;

        // Not paid yet.
        let reply = orchestrator
            .handle_text(private(USER, "Мага, hello"))
            .await
            .unwrap();
        assert_eq!(reply, messages::private_never_paid(30));

        // Invoice.
        let reply = orchestrator
            .handle_text(private(USER, "/pay"))
            .await
            .unwrap();
        assert_eq!(reply, messages::pay_nudge_private(10, 30));
        let invoices = sender.invoices();
        assert_eq!(invoices.len(), 1);
        assert_eq!(invoices[0].payload, format!("user_pay_{}_10", USER));
        assert_eq!(invoices[0].currency, "XTR");
        assert_eq!(invoices[0].amount, 10);
        let pending = payment::find_latest_pending_payment(orchestrator.db.pool(), USER)
            .await
            .unwrap()
            .unwrap();

        orchestrator.handle_pre_checkout("query-1").await;
        assert!(sender.sent().contains(&Sent::PreCheckout {
            query_id: "query-1".to_string(),
            ok: true,
        }));

        // Settlement.
        let reply = orchestrator
            .handle_settlement(SettlementEvent {
                sender_id: USER,
                username: None,
                chat_id: USER,
                message_id: Some(78),
                payload: invoices[0].payload.clone(),
            })
            .await;
        assert_eq!(reply, messages::settled_private(30));
        let stored = payment::get_payment(orchestrator.db.pool(), pending)
            .await
            .unwrap();
        assert_eq!(stored.status().unwrap(), PaymentStatus::Success);

        let principal = Principal::User(USER);
        assert!(orchestrator.ledger().is_entitled(principal).await.unwrap());
        let days = orchestrator.ledger().remaining_days(principal).await.unwrap();
        assert!((29..=30).contains(&days));

        // Now the question goes through.
        let reply = orchestrator
            .handle_text(private(USER, "Мага, hello"))
            .await
            .unwrap();
        assert_eq!(reply, "hello");
        assert_eq!(
            orchestrator.history().recent(USER).await.unwrap(),
            vec![HistoryMessage::user("hello"), HistoryMessage::assistant("hello")]
        );
    }

    #[tokio::test]
    async fn test_group_payment_flow() {
        let (orchestrator, sender) = setup(EchoBrain::new()).await;

        let reply = orchestrator
            .handle_text(group(USER, "Оплата"))
            .await
            .unwrap();
        assert_eq!(reply, messages::pay_nudge_group(10));
        let payload = sender.invoices()[0].payload.clone();
        assert_eq!(payload, format!("group_pay_{}_{}_10", GROUP, USER));

        let reply = orchestrator
            .handle_settlement(SettlementEvent {
                sender_id: USER,
                username: Some("hero".to_string()),
                chat_id: GROUP,
                message_id: None,
                payload,
            })
            .await;

        assert_eq!(reply, messages::settled_group(30));
        assert!(orchestrator
            .ledger()
            .is_entitled(Principal::Group(GROUP))
            .await
            .unwrap());
        assert!(!orchestrator
            .ledger()
            .is_entitled(Principal::User(USER))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_bad_settlement_payload() {
        let (orchestrator, _) = setup(EchoBrain::new()).await;

        let reply = orchestrator
            .handle_settlement(SettlementEvent {
                sender_id: USER,
                username: None,
                chat_id: USER,
                message_id: None,
                payload: "group_pay_oops_1_10".to_string(),
            })
            .await;

        assert_eq!(reply, messages::SETTLEMENT_FAILED);
    }

    #[tokio::test]
    async fn test_status_replies() {
        let (orchestrator, _) = setup(EchoBrain::new()).await;

        let reply = orchestrator
            .handle_text(private(USER, "/status"))
            .await
            .unwrap();
        assert_eq!(reply, messages::private_status(-1, false));

        orchestrator
            .ledger()
            .grant(Principal::Group(GROUP), Duration::days(10) + Duration::hours(1))
            .await
            .unwrap();
        let reply = orchestrator
            .handle_text(group(USER, "/status@MagaBot"))
            .await
            .unwrap();
        assert_eq!(reply, messages::group_status(10, true));
    }

    #[tokio::test]
    async fn test_start_registers_and_greets() {
        let (orchestrator, sender) = setup(EchoBrain::new()).await;

        let reply = orchestrator
            .handle_text(private(USER, "/start"))
            .await
            .unwrap();

        assert_eq!(reply, messages::start_private("Мага,", 30));
        assert!(user::get_user(orchestrator.db.pool(), USER).await.is_ok());
        assert_eq!(
            sender.sent(),
            vec![Sent::Message {
                chat_id: USER,
                text: reply,
                reply_to: None,
            }]
        );

        let reply = orchestrator
            .handle_text(group(USER, "/start"))
            .await
            .unwrap();
        assert_eq!(reply, messages::start_group("Мага,"));
    }

    #[tokio::test]
    async fn test_grant_commands() {
        let (orchestrator, _) = setup(EchoBrain::new()).await;

        let refused = orchestrator
            .handle_text(private(USER, &format!("/grant {} 30", USER)))
            .await
            .unwrap();
        assert_eq!(refused, messages::GRANT_FORBIDDEN);
        assert!(!orchestrator
            .ledger()
            .is_entitled(Principal::User(USER))
            .await
            .unwrap());

        let cases = [
            ("/grant 5", messages::GRANT_USAGE.to_string()),
            ("/grant x 5", messages::GRANT_NOT_NUMBERS.to_string()),
            ("/grant 5 0", messages::GRANT_DAYS_POSITIVE.to_string()),
            ("/grant 5 7", messages::granted_user(5, 7)),
            ("/grant_group -1", messages::GRANT_GROUP_USAGE.to_string()),
            ("/grant_group -1 many", messages::GRANT_GROUP_NOT_NUMBERS.to_string()),
            ("/grant_group -1 -3", messages::GRANT_GROUP_DAYS_POSITIVE.to_string()),
            ("/grant_group -1 14", messages::granted_group(-1, 14)),
        ];
        for (text, expected) in cases {
            let reply = orchestrator.handle_text(private(ADMIN, text)).await.unwrap();
            assert_eq!(reply, expected, "{}", text);
        }

        assert!(orchestrator
            .ledger()
            .is_entitled(Principal::User(5))
            .await
            .unwrap());
        assert!(orchestrator
            .ledger()
            .is_entitled(Principal::Group(-1))
            .await
            .unwrap());
    }

    #[test]
    fn test_parse_grant_args() {
        let args = |a: &[&str]| a.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        assert_eq!(
            parse_grant_args(&args(&["5", "2"])),
            Ok((5, Duration::days(2)))
        );
        assert_eq!(parse_grant_args(&args(&[])), Err(GrantArgsError::Usage));
        assert_eq!(
            parse_grant_args(&args(&["1", "2", "3"])),
            Err(GrantArgsError::Usage)
        );
        assert_eq!(
            parse_grant_args(&args(&["1", "9223372036854775807"])),
            Err(GrantArgsError::NotNumbers)
        );
    }
}
