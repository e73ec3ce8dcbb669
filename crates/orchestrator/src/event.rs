//! Transport-neutral inbound events.

use database::Principal;

/// Kind of chat an event came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatKind {
    /// One-on-one chat with the bot.
    Private,
    /// Group or supergroup.
    Group,
}

/// A text message addressed to the bot (or at least visible to it).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundText {
    /// Author's user id.
    pub sender_id: i64,
    /// Author's username, when the transport knows it.
    pub username: Option<String>,
    /// Chat the message was posted in.
    pub chat_id: i64,
    /// Private or group.
    pub chat_kind: ChatKind,
    /// Transport message id, used to thread the reply.
    pub message_id: Option<i64>,
    /// Raw message text.
    pub text: String,
}

impl InboundText {
    /// Principal whose entitlement gates this message.
    ///
    /// Group members share the group's access; in private chats it is the
    /// sender's own.
    pub fn principal(&self) -> Principal {
        match self.chat_kind {
            ChatKind::Group => Principal::Group(self.chat_id),
            ChatKind::Private => Principal::User(self.sender_id),
        }
    }

    /// Whether this came from a group chat.
    pub fn is_group(&self) -> bool {
        self.chat_kind == ChatKind::Group
    }

    /// Username or the stored default.
    pub fn username_or_default(&self) -> &str {
        username_or_default(self.username.as_deref())
    }
}

/// A successful payment reported by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettlementEvent {
    /// Paying user id.
    pub sender_id: i64,
    /// Paying user's username, if known.
    pub username: Option<String>,
    /// Chat where the payment message arrived (the reply goes here).
    pub chat_id: i64,
    /// Transport message id of the payment notice.
    pub message_id: Option<i64>,
    /// Opaque invoice payload we issued.
    pub payload: String,
}

pub(crate) fn username_or_default(username: Option<&str>) -> &str {
    match username {
        Some(name) if !name.trim().is_empty() => name,
        _ => "аноним",
    }
}
