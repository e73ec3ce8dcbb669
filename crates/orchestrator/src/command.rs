//! Classifying inbound text into commands.

/// What an inbound text asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `/start`
    Start,
    /// `/status`
    Status,
    /// `/pay`, or a message starting with "Оплата"
    Pay,
    /// `/grant <user_id> <days>` with raw arguments
    Grant(Vec<String>),
    /// `/grant_group <chat_id> <days>` with raw arguments
    GrantGroup(Vec<String>),
    /// Trigger-prefixed message; holds the trimmed remainder (may be empty)
    Ask(String),
}

/// Text prefix that also opens an invoice.
pub const PAY_TEXT_PREFIX: &str = "Оплата";

impl Command {
    /// Classify `text`, or `None` if the bot should stay silent.
    pub fn parse(text: &str, trigger_prefix: &str) -> Option<Self> {
        let text = text.trim_start();

        if let Some(rest) = text.strip_prefix('/') {
            let mut parts = rest.split_whitespace();
            let head = parts.next()?;
            // "/status@MagaBot" in groups
            let name = head.split('@').next().unwrap_or(head).to_lowercase();
            let args: Vec<String> = parts.map(str::to_string).collect();

            return match name.as_str() {
                "start" => Some(Command::Start),
                "status" => Some(Command::Status),
                "pay" => Some(Command::Pay),
                "grant" => Some(Command::Grant(args)),
                "grant_group" => Some(Command::GrantGroup(args)),
                _ => None,
            };
        }

        if text.starts_with(PAY_TEXT_PREFIX) {
            return Some(Command::Pay);
        }

        strip_trigger(text, trigger_prefix).map(|rest| Command::Ask(rest.to_string()))
    }
}

/// Remainder of `text` after a case-insensitive `prefix`, trimmed.
pub fn strip_trigger<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let prefix_chars = prefix.chars().count();
    if prefix_chars == 0 {
        return None;
    }

    let split_at = match text.char_indices().nth(prefix_chars) {
        Some((index, _)) => index,
        None if text.chars().count() == prefix_chars => text.len(),
        None => return None,
    };

    let (head, rest) = text.split_at(split_at);
    if head.to_lowercase() == prefix.to_lowercase() {
        Some(rest.trim())
    } else {
        None
    }
}
