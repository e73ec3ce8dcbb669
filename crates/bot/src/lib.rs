//! Glue between the Telegram transport and the conversation orchestrator.
//!
//! - [`config`] - Settings gathered from the environment
//! - [`dispatch`] - Turning Bot API updates into orchestrator events
//! - [`sender`] - [`orchestrator::MessageSender`] over the Bot API

pub mod config;
pub mod dispatch;
pub mod sender;

pub use config::{AppConfig, ConfigError, DEFAULT_SQLITE_PATH};
pub use dispatch::{classify, dispatch, Event};
pub use sender::TelegramSender;
