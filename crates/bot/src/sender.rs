//! Telegram-backed message sender.

use async_trait::async_trait;
use orchestrator::{Invoice, MessageSender, OrchestratorError};
use telegram_client::{LabeledPrice, SendInvoiceParams, TelegramClient, TelegramError};

/// Sends orchestrator replies through the Bot API.
#[derive(Debug, Clone)]
pub struct TelegramSender {
    client: TelegramClient,
}

impl TelegramSender {
    /// Create a new Telegram sender.
    pub fn new(client: TelegramClient) -> Self {
        Self { client }
    }
}

fn send_failed(e: TelegramError) -> OrchestratorError {
    OrchestratorError::SendFailed(e.to_string())
}

/// Bot API parameters for an invoice. Stars invoices carry no provider token.
pub fn invoice_params(chat_id: i64, invoice: &Invoice) -> SendInvoiceParams {
    SendInvoiceParams {
        chat_id,
        title: invoice.title.clone(),
        description: invoice.description.clone(),
        payload: invoice.payload.clone(),
        provider_token: String::new(),
        currency: invoice.currency.clone(),
        prices: vec![LabeledPrice {
            label: invoice.label.clone(),
            amount: invoice.amount,
        }],
    }
}

#[async_trait]
impl MessageSender for TelegramSender {
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        reply_to: Option<i64>,
    ) -> Result<(), OrchestratorError> {
        self.client
            .send_message(chat_id, text, reply_to)
            .await
            .map_err(send_failed)?;
        Ok(())
    }

    async fn send_invoice(
        &self,
        chat_id: i64,
        invoice: &Invoice,
    ) -> Result<(), OrchestratorError> {
        self.client
            .send_invoice(&invoice_params(chat_id, invoice))
            .await
            .map_err(send_failed)?;
        Ok(())
    }

    async fn set_typing(&self, chat_id: i64) -> Result<(), OrchestratorError> {
        self.client.send_typing(chat_id).await.map_err(send_failed)
    }

    async fn answer_pre_checkout(
        &self,
        query_id: &str,
        ok: bool,
    ) -> Result<(), OrchestratorError> {
        self.client
            .answer_pre_checkout_query(query_id, ok, None)
            .await
            .map_err(send_failed)
    }
}
