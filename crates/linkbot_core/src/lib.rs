//! Linkbot core: pure conversation state machine and Markdown rendering.
mod category;
mod command;
mod effect;
mod link;
mod msg;
mod pending;
mod render;
mod reply;
mod state;
mod update;

pub use category::Category;
pub use command::{extract_first_url, parse_command, Command};
pub use effect::Effect;
pub use link::{normalize_title, ChatId, Collection, Link, Origin, UserId};
pub use msg::{IngestFailure, Msg, StoreFailure};
pub use pending::PendingLinks;
pub use render::{render_markdown, split_message, RenderMode};
pub use reply::{Reply, ReplyFormat, HELP_TEXT, MAX_REPLY_LEN, WELCOME_TEXT};
pub use state::AppState;
pub use update::update;
