use crate::{Collection, Link, Origin, RenderMode};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Text message from a chat participant.
    Inbound { origin: Origin, text: String },
    /// Engine finished fetching a page title.
    TitleFetched {
        origin: Origin,
        url: String,
        result: Result<String, IngestFailure>,
    },
    /// Engine finished replacing the user's collection.
    CollectionReset {
        origin: Origin,
        name: String,
        result: Result<(), StoreFailure>,
    },
    /// Engine finished appending a classified link.
    LinkSaved {
        origin: Origin,
        link: Link,
        result: Result<(), StoreFailure>,
    },
    /// Engine finished loading a collection for rendering.
    CollectionLoaded {
        origin: Origin,
        mode: RenderMode,
        result: Result<Collection, StoreFailure>,
    },
    /// Fallback for placeholder wiring.
    NoOp,
}

/// Why a title could not be produced for a URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestFailure {
    Fetch(String),
    MissingTitle,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreFailure {
    NotFound,
    Unavailable(String),
}
