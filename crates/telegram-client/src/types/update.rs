//! Types for updates received from the Bot API.

use serde::{Deserialize, Serialize};

/// Envelope around every Bot API response.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the call succeeded.
    pub ok: bool,
    /// Result payload when `ok`.
    pub result: Option<T>,
    /// Human-readable error when not `ok`.
    pub description: Option<String>,
    /// Error code when not `ok`.
    pub error_code: Option<i64>,
}

/// An incoming update.
///
/// Only the update kinds the bot subscribes to are modelled; the rest are
/// ignored during deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Update {
    /// Monotonic update id, used as the polling offset.
    pub update_id: i64,
    /// New message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Message>,
    /// Pre-checkout query for an invoice.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre_checkout_query: Option<PreCheckoutQuery>,
}

/// A chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub message_id: i64,
    /// Sender; absent for channel posts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<User>,
    pub chat: Chat,
    /// Unix timestamp.
    #[serde(default)]
    pub date: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Present on the service message that confirms a payment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub successful_payment: Option<SuccessfulPayment>,
}

/// A Telegram user or bot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub is_bot: bool,
    #[serde(default)]
    pub first_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

/// Kind of chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatType {
    Private,
    Group,
    Supergroup,
    Channel,
    #[serde(other)]
    Unknown,
}

impl ChatType {
    /// Groups and supergroups.
    pub fn is_group(&self) -> bool {
        matches!(self, ChatType::Group | ChatType::Supergroup)
    }
}

/// A chat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chat {
    /// Chat id; negative for groups.
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: ChatType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// Confirmation of a completed payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuccessfulPayment {
    pub currency: String,
    pub total_amount: i64,
    /// The payload we put on the invoice.
    pub invoice_payload: String,
    #[serde(default)]
    pub telegram_payment_charge_id: String,
}

/// Last check before a payment goes through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreCheckoutQuery {
    pub id: String,
    pub from: User,
    pub currency: String,
    pub total_amount: i64,
    pub invoice_payload: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_group_text_update() {
        let json = r#"{
            "update_id": 10,
            "message": {
                "message_id": 5,
                "from": {"id": 42, "is_bot": false, "first_name": "Ali", "username": "ali"},
                "chat": {"id": -1001234, "type": "supergroup", "title": "Банда"},
                "date": 1700000000,
                "text": "Мага, привет"
            }
        }"#;

        let update: Update = serde_json::from_str(json).unwrap();
        let message = update.message.unwrap();
        assert_eq!(update.update_id, 10);
        assert_eq!(message.chat.kind, ChatType::Supergroup);
        assert!(message.chat.kind.is_group());
        assert_eq!(message.from.unwrap().username.as_deref(), Some("ali"));
        assert_eq!(message.text.as_deref(), Some("Мага, привет"));
    }

    #[test]
    fn test_parse_payment_update() {
        let json = r#"{
            "update_id": 11,
            "message": {
                "message_id": 6,
                "from": {"id": 42, "is_bot": false, "first_name": "Ali"},
                "chat": {"id": 42, "type": "private"},
                "date": 1700000001,
                "successful_payment": {
                    "currency": "XTR",
                    "total_amount": 10,
                    "invoice_payload": "user_pay_42_10",
                    "telegram_payment_charge_id": "abc",
                    "provider_payment_charge_id": "def"
                }
            }
        }"#;

        let update: Update = serde_json::from_str(json).unwrap();
        let payment = update.message.unwrap().successful_payment.unwrap();
        assert_eq!(payment.invoice_payload, "user_pay_42_10");
        assert_eq!(payment.total_amount, 10);
    }

    #[test]
    fn test_parse_pre_checkout_and_unknown_kinds() {
        let json = r#"{
            "update_id": 12,
            "pre_checkout_query": {
                "id": "q1",
                "from": {"id": 42, "is_bot": false, "first_name": "Ali"},
                "currency": "XTR",
                "total_amount": 10,
                "invoice_payload": "user_pay_42_10"
            }
        }"#;
        let update: Update = serde_json::from_str(json).unwrap();
        assert_eq!(update.pre_checkout_query.unwrap().id, "q1");

        let json = r#"{"update_id": 13, "edited_message": {"message_id": 1}}"#;
        let update: Update = serde_json::from_str(json).unwrap();
        assert!(update.message.is_none());
        assert!(update.pre_checkout_query.is_none());

        let chat: Chat = serde_json::from_str(r#"{"id": 1, "type": "forum"}"#).unwrap();
        assert_eq!(chat.kind, ChatType::Unknown);
    }

    #[test]
    fn test_parse_error_response() {
        let json = r#"{"ok": false, "error_code": 401, "description": "Unauthorized"}"#;
        let response: ApiResponse<Vec<Update>> = serde_json::from_str(json).unwrap();
        assert!(!response.ok);
        assert!(response.result.is_none());
        assert_eq!(response.error_code, Some(401));
    }
}
