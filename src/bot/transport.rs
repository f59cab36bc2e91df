use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardMarkup, InputFile, MessageId, ParseMode, ReplyParameters};

/// Outbound side of the chat. Texts are HTML formatted.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send_text(
        &self,
        chat_id: ChatId,
        text: &str,
        keyboard: Option<InlineKeyboardMarkup>,
    ) -> anyhow::Result<()>;

    async fn edit_text(&self, chat_id: ChatId, message_id: MessageId, text: &str)
        -> anyhow::Result<()>;

    async fn edit_keyboard(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        keyboard: InlineKeyboardMarkup,
    ) -> anyhow::Result<()>;

    async fn send_audio_url(
        &self,
        chat_id: ChatId,
        url: &str,
        reply_to: Option<MessageId>,
    ) -> anyhow::Result<()>;

    /// Stop the client's loading indicator on a pressed button.
    async fn answer_callback(&self, callback_id: &str) -> anyhow::Result<()>;
}

pub struct TelegramTransport {
    bot: Bot,
}

impl TelegramTransport {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl ChatTransport for TelegramTransport {
    async fn send_text(
        &self,
        chat_id: ChatId,
        text: &str,
        keyboard: Option<InlineKeyboardMarkup>,
    ) -> anyhow::Result<()> {
        let request = self
            .bot
            .send_message(chat_id, text)
            .parse_mode(ParseMode::Html);
        match keyboard {
            Some(keyboard) => request.reply_markup(keyboard).await?,
            None => request.await?,
        };
        Ok(())
    }

    async fn edit_text(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        text: &str,
    ) -> anyhow::Result<()> {
        self.bot
            .edit_message_text(chat_id, message_id, text)
            .parse_mode(ParseMode::Html)
            .await?;
        Ok(())
    }

    async fn edit_keyboard(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        keyboard: InlineKeyboardMarkup,
    ) -> anyhow::Result<()> {
        self.bot
            .edit_message_reply_markup(chat_id, message_id)
            .reply_markup(keyboard)
            .await?;
        Ok(())
    }

    async fn send_audio_url(
        &self,
        chat_id: ChatId,
        url: &str,
        reply_to: Option<MessageId>,
    ) -> anyhow::Result<()> {
        let audio = InputFile::url(reqwest::Url::parse(url)?);
        let request = self.bot.send_voice(chat_id, audio);
        match reply_to {
            Some(message_id) => {
                request
                    .reply_parameters(ReplyParameters::new(message_id))
                    .await?
            }
            None => request.await?,
        };
        Ok(())
    }

    async fn answer_callback(&self, callback_id: &str) -> anyhow::Result<()> {
        self.bot.answer_callback_query(callback_id.to_string()).await?;
        Ok(())
    }
}
