//! Turning Bot API updates into orchestrator events.

use brain_core::Brain;
use orchestrator::{ChatKind, InboundText, MessageSender, Orchestrator, SettlementEvent};
use telegram_client::{ChatType, Message, Update};
use tracing::debug;

/// Something the orchestrator handles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A text message.
    Text(InboundText),
    /// A confirmed payment.
    Settlement(SettlementEvent),
    /// An invoice about to be paid.
    PreCheckout { query_id: String },
}

fn chat_kind(kind: ChatType) -> Option<ChatKind> {
    match kind {
        ChatType::Private => Some(ChatKind::Private),
        ChatType::Group | ChatType::Supergroup => Some(ChatKind::Group),
        ChatType::Channel | ChatType::Unknown => None,
    }
}

/// Classify an update, or `None` when the bot has nothing to do with it.
pub fn classify(update: &Update) -> Option<Event> {
    if let Some(query) = &update.pre_checkout_query {
        return Some(Event::PreCheckout {
            query_id: query.id.clone(),
        });
    }

    let message = update.message.as_ref()?;
    match classify_message(message) {
        Ok(event) => Some(event),
        Err(reason) => {
            debug!("Skipping update {}: {}", update.update_id, reason);
            None
        }
    }
}

fn classify_message(message: &Message) -> Result<Event, &'static str> {
    let from = message.from.as_ref().ok_or("no sender")?;
    if from.is_bot {
        return Err("message from a bot");
    }
    let chat_kind = chat_kind(message.chat.kind).ok_or("unsupported chat type")?;

    if let Some(payment) = &message.successful_payment {
        return Ok(Event::Settlement(SettlementEvent {
            sender_id: from.id,
            username: from.username.clone(),
            chat_id: message.chat.id,
            message_id: Some(message.message_id),
            payload: payment.invoice_payload.clone(),
        }));
    }

    let text = message.text.as_ref().ok_or("no text content")?;
    Ok(Event::Text(InboundText {
        sender_id: from.id,
        username: from.username.clone(),
        chat_id: message.chat.id,
        chat_kind,
        message_id: Some(message.message_id),
        text: text.clone(),
    }))
}

/// Hand an event to the orchestrator.
pub async fn dispatch<B: Brain, S: MessageSender>(orchestrator: &Orchestrator<B, S>, event: Event) {
    match event {
        Event::Text(message) => {
            orchestrator.handle_text(message).await;
        }
        Event::Settlement(payment) => {
            orchestrator.handle_settlement(payment).await;
        }
        Event::PreCheckout { query_id } => {
            orchestrator.handle_pre_checkout(&query_id).await;
        }
    }
}
