//! Types for calls made to the Bot API.

use serde::Serialize;

/// Parameters for `getUpdates`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GetUpdatesParams {
    /// First update id to return.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
    /// Long-poll timeout in seconds.
    pub timeout: u64,
    /// Update kinds to receive.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub allowed_updates: Vec<String>,
}

/// Which message a reply refers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplyParameters {
    pub message_id: i64,
    /// Send anyway if the original was deleted.
    pub allow_sending_without_reply: bool,
}

/// Parameters for `sendMessage`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SendMessageParams {
    pub chat_id: i64,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_parameters: Option<ReplyParameters>,
}

impl SendMessageParams {
    /// Plain text message.
    pub fn text(chat_id: i64, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            text: text.into(),
            reply_parameters: None,
        }
    }

    /// Thread the message under `message_id`.
    pub fn reply_to(mut self, message_id: i64) -> Self {
        self.reply_parameters = Some(ReplyParameters {
            message_id,
            allow_sending_without_reply: true,
        });
        self
    }
}

/// One line of an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabeledPrice {
    pub label: String,
    /// Smallest currency unit; whole stars for `XTR`.
    pub amount: i64,
}

/// Parameters for `sendInvoice`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SendInvoiceParams {
    pub chat_id: i64,
    pub title: String,
    pub description: String,
    pub payload: String,
    /// Empty for Telegram Stars.
    pub provider_token: String,
    pub currency: String,
    pub prices: Vec<LabeledPrice>,
}

/// Parameters for `sendChatAction`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatActionParams {
    pub chat_id: i64,
    pub action: String,
}

impl ChatActionParams {
    /// The "typing…" indicator.
    pub fn typing(chat_id: i64) -> Self {
        Self {
            chat_id,
            action: "typing".to_string(),
        }
    }
}

/// Parameters for `answerPreCheckoutQuery`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerPreCheckoutParams {
    pub pre_checkout_query_id: String,
    pub ok: bool,
    /// Shown to the user when `ok` is false.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}
