use crate::{Link, Origin, RenderMode, Reply};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Reply(Reply),
    FetchTitle { origin: Origin, url: String },
    ResetCollection { origin: Origin, name: String },
    AppendLink { origin: Origin, link: Link },
    LoadCollection { origin: Origin, mode: RenderMode },
}
