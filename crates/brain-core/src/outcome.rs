//! Completion results.

use serde::{Deserialize, Serialize};

/// Why a completion could not produce a genuine answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Still rate limited after every retry.
    RateLimited,
    /// Upstream rejected our credentials (401). Operator action needed.
    Unauthorized,
    /// Upstream rejected the request shape (400). Operator action needed.
    BadRequest,
    /// An attempt exceeded the wall-clock ceiling.
    Timeout,
    /// Any other upstream or connection failure.
    Upstream,
}

impl FailureKind {
    /// User-facing reply substituted for a real answer.
    ///
    /// Each kind has its own sentence so logs and chats can be grepped by
    /// symptom.
    pub fn fallback_text(&self) -> &'static str {
        match self {
            FailureKind::RateLimited => {
                "Мага перегружен, очередь как на рынке. Попробуй через минуту."
            }
            FailureKind::Unauthorized => {
                "Ключ от мозгов не подходит. Админ, проверь API-ключ."
            }
            FailureKind::BadRequest => {
                "Запрос кривой получился, API его не принял. Переформулируй."
            }
            FailureKind::Timeout => "Таймаут, брат. API спит? Жди.",
            FailureKind::Upstream => {
                "Эй, связь барахлит. Попробуй позже, а то нервы не железные."
            }
        }
    }

    /// Short label for logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::RateLimited => "rate_limited",
            FailureKind::Unauthorized => "unauthorized",
            FailureKind::BadRequest => "bad_request",
            FailureKind::Timeout => "timeout",
            FailureKind::Upstream => "upstream",
        }
    }
}

/// Result of asking a brain for a reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionOutcome {
    /// Generated text, already trimmed.
    Answer(String),
    /// Classified failure; reply with [`FailureKind::fallback_text`].
    Fallback(FailureKind),
}

impl CompletionOutcome {
    /// Text to send back to the user.
    pub fn text(&self) -> &str {
        match self {
            CompletionOutcome::Answer(text) => text,
            CompletionOutcome::Fallback(kind) => kind.fallback_text(),
        }
    }

    /// Whether this is a genuine answer that may enter conversation history.
    pub fn is_answer(&self) -> bool {
        matches!(self, CompletionOutcome::Answer(_))
    }

    /// The failure kind, if any.
    pub fn failure(&self) -> Option<FailureKind> {
        match self {
            CompletionOutcome::Answer(_) => None,
            CompletionOutcome::Fallback(kind) => Some(*kind),
        }
    }
}
