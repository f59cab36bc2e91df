use teloxide::types::{CallbackQuery, ChatId, Message, MessageEntityKind, MessageId};

/// A button press.
#[derive(Debug, Clone, PartialEq)]
pub struct Callback {
    pub id: String,
    pub data: Option<String>,
    /// The bot message that carried the button, when still addressable.
    pub message_id: Option<MessageId>,
}

/// One inbound update, reduced to what the router looks at.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub chat_id: ChatId,
    /// The user's own message, used as the reply target for audio.
    pub message_id: Option<MessageId>,
    pub text: Option<String>,
    pub caption: Option<String>,
    /// Telegram marked the text as starting with a bot command.
    pub is_command: bool,
    pub callback: Option<Callback>,
}

impl Event {
    pub fn from_message(msg: &Message) -> Self {
        let text = msg.text().map(str::to_string);
        let is_command = text.as_deref().is_some_and(|t| t.starts_with('/'))
            && msg.entities().is_some_and(|entities| {
                entities
                    .iter()
                    .any(|e| e.offset == 0 && matches!(e.kind, MessageEntityKind::BotCommand))
            });

        Self {
            chat_id: msg.chat.id,
            message_id: Some(msg.id),
            text,
            caption: msg.caption().map(str::to_string),
            is_command,
            callback: None,
        }
    }

    pub fn from_callback(q: &CallbackQuery) -> Self {
        let chat_id = q
            .message
            .as_ref()
            .map(|m| m.chat().id)
            .unwrap_or_else(|| ChatId::from(q.from.id));

        Self {
            chat_id,
            message_id: None,
            text: None,
            caption: None,
            is_command: false,
            callback: Some(Callback {
                id: q.id.to_string(),
                data: q.data.clone(),
                message_id: q.message.as_ref().map(|m| m.id()),
            }),
        }
    }

    /// Text to read out loud: the message text, or the caption of media.
    pub fn content(&self) -> Option<&str> {
        self.text
            .as_deref()
            .filter(|t| !t.is_empty())
            .or_else(|| self.caption.as_deref().filter(|c| !c.is_empty()))
    }
}
