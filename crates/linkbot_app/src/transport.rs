//! Telegram adapter: long-polls for text messages and delivers replies.

use anyhow::Context as _;
use async_trait::async_trait;
use bot_logging::{bot_debug, bot_warn};
use linkbot_core::{Msg, Origin, Reply, ReplyFormat};
use teloxide::payloads::setters::*;
use teloxide::prelude::*;
use teloxide::types::{KeyboardButton, KeyboardMarkup, LinkPreviewOptions, ParseMode};
use tokio::sync::mpsc;

/// Delivers replies to a chat.
#[async_trait]
pub trait ReplySink: Send + Sync {
    async fn send(&self, reply: &Reply) -> anyhow::Result<()>;
}

#[derive(Clone)]
pub struct TelegramTransport {
    bot: Bot,
}

impl TelegramTransport {
    pub fn new(token: &str) -> Self {
        Self {
            bot: Bot::new(token),
        }
    }

    /// Forward every text message with a known sender to `msg_tx` until the
    /// process is interrupted.
    pub async fn listen(&self, msg_tx: mpsc::UnboundedSender<Msg>) {
        teloxide::repl(self.bot.clone(), move |message: Message| {
            let msg_tx = msg_tx.clone();
            async move {
                if let Some(inbound) = inbound_msg(&message) {
                    if msg_tx.send(inbound).is_err() {
                        bot_warn!("Dispatcher stopped; dropping message {}", message.id.0);
                    }
                }
                respond(())
            }
        })
        .await;
    }

    async fn send_once(&self, reply: &Reply, markdown: bool) -> Result<(), teloxide::RequestError> {
        let mut request = self
            .bot
            .send_message(ChatId(reply.chat_id.0), reply.text.clone());
        if reply.format != ReplyFormat::Plain {
            request = request.link_preview_options(no_preview());
        }
        if markdown {
            request = request.parse_mode(legacy_markdown());
        }
        if let Some(buttons) = &reply.keyboard {
            request = request.reply_markup(one_time_keyboard(buttons));
        }
        request.send().await?;
        Ok(())
    }
}

#[async_trait]
impl ReplySink for TelegramTransport {
    async fn send(&self, reply: &Reply) -> anyhow::Result<()> {
        if reply.format == ReplyFormat::MarkdownNoPreview {
            match self.send_once(reply, true).await {
                Ok(()) => return Ok(()),
                Err(err) => {
                    bot_warn!("Formatted reply rejected ({err}); resending as plain text");
                }
            }
        }
        self.send_once(reply, false)
            .await
            .with_context(|| format!("failed to send reply to chat {}", reply.chat_id.0))?;
        bot_debug!("Reply delivered to chat {}", reply.chat_id.0);
        Ok(())
    }
}

fn inbound_msg(message: &Message) -> Option<Msg> {
    let text = message.text()?;
    let from = message.from.as_ref()?;
    Some(Msg::Inbound {
        origin: Origin::new(from.id.0, message.chat.id.0),
        text: text.to_string(),
    })
}

fn no_preview() -> LinkPreviewOptions {
    LinkPreviewOptions {
        is_disabled: true,
        url: None,
        prefer_small_media: false,
        prefer_large_media: false,
        show_above_text: false,
    }
}

// MarkdownV2 would require escaping every title and URL.
#[allow(deprecated)]
fn legacy_markdown() -> ParseMode {
    ParseMode::Markdown
}

fn one_time_keyboard(buttons: &[String]) -> KeyboardMarkup {
    let rows = buttons
        .iter()
        .map(|label| vec![KeyboardButton::new(label.clone())]);
    KeyboardMarkup::new(rows)
        .one_time_keyboard()
        .resize_keyboard()
}
