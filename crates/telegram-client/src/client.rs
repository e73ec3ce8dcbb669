//! Telegram Bot API HTTP client.

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::config::BotConfig;
use crate::error::TelegramError;
use crate::types::{
    AnswerPreCheckoutParams, ApiResponse, ChatActionParams, GetUpdatesParams, Message,
    SendInvoiceParams, SendMessageParams, Update, User,
};

/// Update kinds the bot asks for.
const ALLOWED_UPDATES: [&str; 2] = ["message", "pre_checkout_query"];

/// Slack on top of the long-poll timeout before the HTTP client gives up.
const REQUEST_GRACE: Duration = Duration::from_secs(10);

/// Client for the Telegram Bot API.
#[derive(Clone)]
pub struct TelegramClient {
    http: Client,
    config: BotConfig,
}

impl TelegramClient {
    /// Create a client. No request is made.
    pub fn new(config: BotConfig) -> Result<Self, TelegramError> {
        if config.token.trim().is_empty() {
            return Err(TelegramError::Config("bot token is empty".to_string()));
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(config.poll_timeout_secs) + REQUEST_GRACE)
            .build()
            .map_err(TelegramError::Http)?;

        Ok(Self { http, config })
    }

    /// Get the configuration.
    pub fn config(&self) -> &BotConfig {
        &self.config
    }

    /// Identify the bot (also validates the token).
    pub async fn get_me(&self) -> Result<User, TelegramError> {
        self.call("getMe", &serde_json::json!({})).await
    }

    /// Long-poll for updates starting at `offset`.
    pub async fn get_updates(&self, offset: Option<i64>) -> Result<Vec<Update>, TelegramError> {
        let params = GetUpdatesParams {
            offset,
            timeout: self.config.poll_timeout_secs,
            allowed_updates: ALLOWED_UPDATES.iter().map(|s| s.to_string()).collect(),
        };
        self.call("getUpdates", &params).await
    }

    /// Send a text message, optionally as a reply.
    pub async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        reply_to: Option<i64>,
    ) -> Result<Message, TelegramError> {
        let mut params = SendMessageParams::text(chat_id, text);
        if let Some(message_id) = reply_to {
            params = params.reply_to(message_id);
        }
        self.call("sendMessage", &params).await
    }

    /// Send an invoice.
    pub async fn send_invoice(&self, params: &SendInvoiceParams) -> Result<Message, TelegramError> {
        self.call("sendInvoice", params).await
    }

    /// Show the "typing" indicator for a few seconds.
    pub async fn send_typing(&self, chat_id: i64) -> Result<(), TelegramError> {
        let _: bool = self
            .call("sendChatAction", &ChatActionParams::typing(chat_id))
            .await?;
        Ok(())
    }

    /// Accept or reject a pre-checkout query.
    pub async fn answer_pre_checkout_query(
        &self,
        query_id: &str,
        ok: bool,
        error_message: Option<&str>,
    ) -> Result<(), TelegramError> {
        let params = AnswerPreCheckoutParams {
            pre_checkout_query_id: query_id.to_string(),
            ok,
            error_message: error_message.map(str::to_string),
        };
        let _: bool = self.call("answerPreCheckoutQuery", &params).await?;
        Ok(())
    }

    /// Call a Bot API method.
    ///
    /// The Bot API reports failures as `ok: false` with a non-2xx status, so
    /// the body is decoded regardless of status.
    async fn call<P: Serialize + ?Sized, R: DeserializeOwned>(
        &self,
        method: &str,
        params: &P,
    ) -> Result<R, TelegramError> {
        debug!("Bot API call: {}", method);

        let response = self
            .http
            .post(self.config.method_url(method))
            .json(params)
            .send()
            .await
            .map_err(http_error)?;

        let status = response.status();
        let body = response.text().await.map_err(http_error)?;
        let parsed: ApiResponse<R> = serde_json::from_str(&body).map_err(|e| {
            debug!("Undecodable {} response (HTTP {}): {}", method, status, body);
            TelegramError::Json(e)
        })?;

        if !parsed.ok {
            return Err(TelegramError::Api {
                code: parsed.error_code.unwrap_or(i64::from(status.as_u16())),
                description: parsed.description.unwrap_or_default(),
            });
        }

        parsed.result.ok_or_else(|| TelegramError::Api {
            code: i64::from(status.as_u16()),
            description: format!("{} returned no result", method),
        })
    }
}

fn http_error(e: reqwest::Error) -> TelegramError {
    TelegramError::Http(e.without_url())
}

impl std::fmt::Debug for TelegramClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramClient")
            .field("config", &self.config)
            .finish()
    }
}
