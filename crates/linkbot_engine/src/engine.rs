use std::sync::Arc;

use bot_logging::{bot_debug, bot_info};
use linkbot_core::{Collection, Link, Origin, RenderMode};
use tokio::sync::mpsc;

use crate::{CollectionStore, IngestError, LinkIngestor, StoreError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCommand {
    FetchTitle { origin: Origin, url: String },
    ResetCollection { origin: Origin, name: String },
    AppendLink { origin: Origin, link: Link },
    LoadCollection { origin: Origin, mode: RenderMode },
}

#[derive(Debug)]
pub enum EngineEvent {
    TitleFetched {
        origin: Origin,
        url: String,
        result: Result<String, IngestError>,
    },
    CollectionReset {
        origin: Origin,
        name: String,
        result: Result<(), StoreError>,
    },
    LinkAppended {
        origin: Origin,
        link: Link,
        result: Result<(), StoreError>,
    },
    CollectionLoaded {
        origin: Origin,
        mode: RenderMode,
        result: Result<Collection, StoreError>,
    },
}

/// Runs I/O commands as independent tasks and reports each outcome as an event.
///
/// Must be used from inside a tokio runtime.
#[derive(Clone)]
pub struct EngineHandle {
    ingestor: Arc<LinkIngestor>,
    store: Arc<dyn CollectionStore>,
    event_tx: mpsc::UnboundedSender<EngineEvent>,
}

impl EngineHandle {
    pub fn new(
        ingestor: Arc<LinkIngestor>,
        store: Arc<dyn CollectionStore>,
    ) -> (Self, mpsc::UnboundedReceiver<EngineEvent>) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let handle = Self {
            ingestor,
            store,
            event_tx,
        };
        (handle, event_rx)
    }

    pub fn submit(&self, command: EngineCommand) {
        let engine = self.clone();
        tokio::spawn(async move {
            let event = engine.execute(command).await;
            // Receiver gone means the dispatcher is shutting down.
            let _ = engine.event_tx.send(event);
        });
    }

    async fn execute(&self, command: EngineCommand) -> EngineEvent {
        match command {
            EngineCommand::FetchTitle { origin, url } => {
                bot_debug!("FetchTitle user={} url={}", origin.user_id, url);
                let result = self.ingestor.fetch_title(&url).await;
                EngineEvent::TitleFetched {
                    origin,
                    url,
                    result,
                }
            }
            EngineCommand::ResetCollection { origin, name } => {
                let result = self
                    .store
                    .replace(origin.user_id, &name)
                    .await
                    .map(|_| ());
                if result.is_ok() {
                    bot_info!("Collection reset for user {}", origin.user_id);
                }
                EngineEvent::CollectionReset {
                    origin,
                    name,
                    result,
                }
            }
            EngineCommand::AppendLink { origin, link } => {
                let result = self.store.append_link(origin.user_id, link.clone()).await;
                if result.is_ok() {
                    bot_info!("Link saved for user {}", origin.user_id);
                }
                EngineEvent::LinkAppended {
                    origin,
                    link,
                    result,
                }
            }
            EngineCommand::LoadCollection { origin, mode } => {
                let result = self
                    .store
                    .find(origin.user_id)
                    .await
                    .and_then(|found| found.ok_or(StoreError::CollectionNotFound(origin.user_id)));
                EngineEvent::CollectionLoaded {
                    origin,
                    mode,
                    result,
                }
            }
        }
    }
}
