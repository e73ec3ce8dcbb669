//! Conversation orchestrator for the access-gated chat bot.
//!
//! This crate provides the [`Orchestrator`] type which turns transport-neutral
//! events ([`InboundText`], [`SettlementEvent`]) into replies.
//!
//! # Features
//!
//! - Answers trigger-prefixed messages through any [`brain_core::Brain`]
//! - Gates access on per-user or per-group paid-until dates
//! - Keeps a bounded per-user history window
//! - Issues invoices and settles successful payments
//! - Admin commands to grant access manually
//!
//! # Architecture
//!
//! ```text
//! Inbound text (from the transport)
//!          ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      ORCHESTRATOR                           │
//! │                                                             │
//! │  1. Classify: /start, /status, /pay, /grant, trigger        │
//! │         ↓                                                   │
//! │  2. Claim the user's in-flight slot                         │
//! │         ↓                                                   │
//! │  3. Check entitlement (group in groups, user in private)    │
//! │         ↓                                                   │
//! │  4. Read history, store question, start typing              │
//! │         ↓                                                   │
//! │  5. Ask the brain; store the answer only if genuine         │
//! │         ↓                                                   │
//! │  6. Reply through the MessageSender                         │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use database::Database;
//! use mock_brain::EchoBrain;
//! use orchestrator::{ChatKind, InboundText, LoggingSender, Orchestrator, OrchestratorConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("sqlite::memory:").await?;
//!     db.migrate().await?;
//!
//!     let orchestrator =
//!         Orchestrator::new(db, EchoBrain::new(), LoggingSender, OrchestratorConfig::default());
//!
//!     let reply = orchestrator
//!         .handle_text(InboundText {
//!             sender_id: 42,
//!             username: Some("alice".to_string()),
//!             chat_id: 42,
//!             chat_kind: ChatKind::Private,
//!             message_id: Some(1),
//!             text: "Мага, привет".to_string(),
//!         })
//!         .await;
//!
//!     println!("Reply: {:?}", reply);
//!     Ok(())
//! }
//! ```

mod command;
mod config;
mod error;
mod event;
mod history;
mod ledger;
pub mod messages;
mod orchestrator;
mod sender;
mod settlement;
mod single_flight;

// Public exports
pub use command::{strip_trigger, Command, PAY_TEXT_PREFIX};
pub use config::{
    load_system_prompt, OrchestratorConfig, OrchestratorConfigBuilder, DEFAULT_SYSTEM_PROMPT,
    DEFAULT_SYSTEM_PROMPT_FILE, DEFAULT_TRIGGER_PREFIX,
};
pub use error::{OrchestratorError, Result};
pub use event::{ChatKind, InboundText, SettlementEvent};
pub use history::HistoryStore;
pub use ledger::{days_remaining, EntitlementLedger};
pub use orchestrator::Orchestrator;
pub use sender::{Invoice, LoggingSender, MessageSender, NoOpSender, RecordingSender, Sent};
pub use settlement::{
    group_payload, parse_payload, user_payload, PaymentTarget, Settlement, SettlementHandler,
};
pub use single_flight::{InFlight, InFlightGuard};

// Re-export commonly used types from dependencies
pub use brain_core::{CompletionOutcome, FailureKind};
pub use database::Principal;
