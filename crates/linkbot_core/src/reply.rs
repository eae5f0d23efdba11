use crate::{ChatId, RenderMode};

/// Telegram's per-message character limit.
pub const MAX_REPLY_LEN: usize = 4096;

pub const WELCOME_TEXT: &str = "Welcome!\nI am the link collection bot.\nSend me your links to store them.";
pub const HELP_TEXT: &str = "Send me a link.\n\
    \n\
    new collection <name> - start a fresh collection (drops the old one)\n\
    <any message with a link> - fetch its title and pick a category\n\
    generate markdown - get your collection as Markdown source\n\
    generate preview - get your collection formatted";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyFormat {
    Plain,
    /// Plain text with link previews suppressed.
    NoPreview,
    /// Markdown parse mode with link previews suppressed.
    MarkdownNoPreview,
}

impl From<RenderMode> for ReplyFormat {
    fn from(mode: RenderMode) -> Self {
        match mode {
            RenderMode::Markdown => ReplyFormat::NoPreview,
            RenderMode::Preview => ReplyFormat::MarkdownNoPreview,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub chat_id: ChatId,
    pub text: String,
    pub format: ReplyFormat,
    /// One-time, resized quick-reply keyboard, one button per row.
    pub keyboard: Option<Vec<String>>,
}

impl Reply {
    pub fn text(chat_id: ChatId, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            text: text.into(),
            format: ReplyFormat::Plain,
            keyboard: None,
        }
    }

    pub fn with_format(mut self, format: ReplyFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_keyboard(mut self, buttons: Vec<String>) -> Self {
        self.keyboard = Some(buttons);
        self
    }
}
