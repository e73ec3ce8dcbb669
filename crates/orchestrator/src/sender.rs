//! Message sender trait and implementations.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::OrchestratorError;

/// An invoice to show in a chat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    /// Product title.
    pub title: String,
    /// Product description.
    pub description: String,
    /// Opaque payload echoed back on settlement.
    pub payload: String,
    /// Currency code.
    pub currency: String,
    /// Price label.
    pub label: String,
    /// Amount in the smallest currency unit.
    pub amount: i64,
}

/// Trait for talking back to chats.
///
/// Abstracted to support different transports (Telegram, tests, etc.)
#[async_trait]
pub trait MessageSender: Send + Sync {
    /// Send a text message, optionally as a reply to `reply_to`.
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        reply_to: Option<i64>,
    ) -> Result<(), OrchestratorError>;

    /// Send an invoice.
    async fn send_invoice(&self, chat_id: i64, invoice: &Invoice)
        -> Result<(), OrchestratorError>;

    /// Show the "typing" indicator.
    async fn set_typing(&self, chat_id: i64) -> Result<(), OrchestratorError>;

    /// Answer a pre-checkout query.
    async fn answer_pre_checkout(&self, query_id: &str, ok: bool)
        -> Result<(), OrchestratorError>;
}

/// A no-op message sender for testing that discards all messages.
#[derive(Debug, Clone, Default)]
pub struct NoOpSender;

#[async_trait]
impl MessageSender for NoOpSender {
    async fn send_message(
        &self,
        _chat_id: i64,
        _text: &str,
        _reply_to: Option<i64>,
    ) -> Result<(), OrchestratorError> {
        Ok(())
    }

    async fn send_invoice(
        &self,
        _chat_id: i64,
        _invoice: &Invoice,
    ) -> Result<(), OrchestratorError> {
        Ok(())
    }

    async fn set_typing(&self, _chat_id: i64) -> Result<(), OrchestratorError> {
        Ok(())
    }

    async fn answer_pre_checkout(
        &self,
        _query_id: &str,
        _ok: bool,
    ) -> Result<(), OrchestratorError> {
        Ok(())
    }
}

/// A logging message sender for debugging that logs all operations.
#[derive(Debug, Clone, Default)]
pub struct LoggingSender;

#[async_trait]
impl MessageSender for LoggingSender {
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        reply_to: Option<i64>,
    ) -> Result<(), OrchestratorError> {
        tracing::info!("Sending to {} (reply to {:?}): {}", chat_id, reply_to, text);
        Ok(())
    }

    async fn send_invoice(
        &self,
        chat_id: i64,
        invoice: &Invoice,
    ) -> Result<(), OrchestratorError> {
        tracing::info!(
            "Invoice to {}: {} {} ({})",
            chat_id,
            invoice.amount,
            invoice.currency,
            invoice.payload
        );
        Ok(())
    }

    async fn set_typing(&self, chat_id: i64) -> Result<(), OrchestratorError> {
        tracing::info!("Typing in {}", chat_id);
        Ok(())
    }

    async fn answer_pre_checkout(
        &self,
        query_id: &str,
        ok: bool,
    ) -> Result<(), OrchestratorError> {
        tracing::info!("Pre-checkout {} answered ok={}", query_id, ok);
        Ok(())
    }
}

/// Something a [`RecordingSender`] was asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    Message {
        chat_id: i64,
        text: String,
        reply_to: Option<i64>,
    },
    Invoice {
        chat_id: i64,
        invoice: Invoice,
    },
    Typing {
        chat_id: i64,
    },
    PreCheckout {
        query_id: String,
        ok: bool,
    },
}

/// Records every call. Clones share the record.
#[derive(Debug, Clone, Default)]
pub struct RecordingSender {
    sent: Arc<Mutex<Vec<Sent>>>,
}

impl RecordingSender {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything sent so far, in order.
    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().map(|sent| sent.clone()).unwrap_or_default()
    }

    /// Texts of sent messages, in order.
    pub fn texts(&self) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter_map(|item| match item {
                Sent::Message { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }

    /// Invoices sent, in order.
    pub fn invoices(&self) -> Vec<Invoice> {
        self.sent()
            .into_iter()
            .filter_map(|item| match item {
                Sent::Invoice { invoice, .. } => Some(invoice),
                _ => None,
            })
            .collect()
    }

    fn push(&self, item: Sent) {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(item);
        }
    }
}

#[async_trait]
impl MessageSender for RecordingSender {
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        reply_to: Option<i64>,
    ) -> Result<(), OrchestratorError> {
        self.push(Sent::Message {
            chat_id,
            text: text.to_string(),
            reply_to,
        });
        Ok(())
    }

    async fn send_invoice(
        &self,
        chat_id: i64,
        invoice: &Invoice,
    ) -> Result<(), OrchestratorError> {
        self.push(Sent::Invoice {
            chat_id,
            invoice: invoice.clone(),
        });
        Ok(())
    }

    async fn set_typing(&self, chat_id: i64) -> Result<(), OrchestratorError> {
        self.push(Sent::Typing { chat_id });
        Ok(())
    }

    async fn answer_pre_checkout(
        &self,
        query_id: &str,
        ok: bool,
    ) -> Result<(), OrchestratorError> {
        self.push(Sent::PreCheckout {
            query_id: query_id.to_string(),
            ok,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invoice() -> Invoice {
        Invoice {
            title: "t".to_string(),
            description: "d".to_string(),
            payload: "user_pay_1_10".to_string(),
            currency: "XTR".to_string(),
            label: "l".to_string(),
            amount: 10,
        }
    }

    #[tokio::test]
    async fn test_noop_and_logging_senders() {
        // Should not error
        NoOpSender.send_message(1, "test", None).await.unwrap();
        NoOpSender.send_invoice(1, &invoice()).await.unwrap();
        LoggingSender.send_message(-5, "test", Some(3)).await.unwrap();
        LoggingSender.set_typing(-5).await.unwrap();
        LoggingSender.answer_pre_checkout("q", true).await.unwrap();
    }

    #[tokio::test]
    async fn test_recording_sender() {
        let sender = RecordingSender::new();
        let handle = sender.clone();

        sender.set_typing(1).await.unwrap();
        sender.send_message(1, "hi", Some(9)).await.unwrap();
        sender.send_invoice(1, &invoice()).await.unwrap();

        assert_eq!(handle.sent().len(), 3);
        assert_eq!(handle.sent()[0], Sent::Typing { chat_id: 1 });
        assert_eq!(handle.texts(), vec!["hi".to_string()]);
        assert_eq!(handle.invoices(), vec![invoice()]);
    }
}
