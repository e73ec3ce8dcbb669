//! Chat roles, history turns, and completion requests.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Speaker of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    /// Wire and storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "system" => Ok(Role::System),
            "user" => Ok(Role::User),
            "assistant" => Ok(Role::Assistant),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

/// A single message in the conversation history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryMessage {
    /// Who said it.
    pub role: Role,
    /// Message content
    pub content: String,
}

impl HistoryMessage {
    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Create an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Everything a brain needs to produce one reply.
///
/// The prompt sent upstream is `[system] + history + [user_text]`; history is
/// expected oldest-first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    /// Persona / system instruction.
    pub system_prompt: String,
    /// Prior turns, oldest first.
    pub history: Vec<HistoryMessage>,
    /// The new user turn.
    pub user_text: String,
    /// Principal the request is made for, used only for logging.
    pub principal_id: String,
}

impl CompletionRequest {
    /// Create a request without history.
    pub fn new(
        system_prompt: impl Into<String>,
        user_text: impl Into<String>,
        principal_id: impl Into<String>,
    ) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            history: Vec::new(),
            user_text: user_text.into(),
            principal_id: principal_id.into(),
        }
    }

    /// Attach prior turns (oldest first).
    pub fn with_history(mut self, history: Vec<HistoryMessage>) -> Self {
        self.history = history;
        self
    }

    /// Flatten into the ordered message list sent upstream.
    pub fn messages(&self) -> Vec<HistoryMessage> {
        let mut messages = Vec::with_capacity(self.history.len() + 2);
        messages.push(HistoryMessage {
            role: Role::System,
            content: self.system_prompt.clone(),
        });
        messages.extend(self.history.iter().cloned());
        messages.push(HistoryMessage::user(self.user_text.clone()));
        messages
    }
}
