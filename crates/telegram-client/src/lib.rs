//! Telegram Bot API client library.
//!
//! This crate provides a small Rust client for the parts of the Telegram Bot
//! API the chat bot needs:
//!
//! - Receiving updates via long polling (`getUpdates`)
//! - Sending text replies and the "typing" indicator
//! - Sending invoices and answering pre-checkout queries
//!
//! # Example
//!
//! ```no_run
//! use futures::StreamExt;
//! use telegram_client::{subscribe, BotConfig, ReconnectConfig, TelegramClient};
//!
//! # async fn example() -> Result<(), telegram_client::TelegramError> {
//! let client = TelegramClient::new(BotConfig::new("123:abc"))?;
//! let me = client.get_me().await?;
//! println!("Running as @{}", me.username.unwrap_or_default());
//!
//! let mut updates = subscribe(client.clone(), ReconnectConfig::default());
//! while let Some(update) = updates.next().await {
//!     if let Some(text) = update.message.and_then(|m| m.text) {
//!         println!("Got: {}", text);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod poll;
pub mod types;

pub use client::TelegramClient;
pub use config::{BotConfig, DEFAULT_API_URL, DEFAULT_POLL_TIMEOUT_SECS};
pub use error::TelegramError;
pub use poll::{subscribe, ReconnectConfig, UpdateStream};
pub use types::*;
