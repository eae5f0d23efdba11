use std::sync::Arc;

use bot_logging::{bot_error, bot_info, bot_warn};
use linkbot_core::{Effect, IngestFailure, Msg, Reply, StoreFailure};
use linkbot_engine::{EngineCommand, EngineEvent, EngineHandle, IngestError, StoreError};
use tokio::sync::mpsc;

use crate::transport::ReplySink;

/// Turns effects from `update` into engine commands and outgoing replies.
pub struct EffectRunner {
    engine: EngineHandle,
    reply_tx: mpsc::UnboundedSender<Reply>,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle, sink: Arc<dyn ReplySink>) -> Self {
        let reply_tx = spawn_reply_worker(sink);
        Self { engine, reply_tx }
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Reply(reply) => {
                    if self.reply_tx.send(reply).is_err() {
                        bot_error!("Reply worker stopped; dropping reply");
                    }
                }
                Effect::FetchTitle { origin, url } => {
                    bot_info!("FetchTitle user={} url_len={}", origin.user_id, url.len());
                    self.engine
                        .submit(EngineCommand::FetchTitle { origin, url });
                }
                Effect::ResetCollection { origin, name } => {
                    self.engine
                        .submit(EngineCommand::ResetCollection { origin, name });
                }
                Effect::AppendLink { origin, link } => {
                    self.engine
                        .submit(EngineCommand::AppendLink { origin, link });
                }
                Effect::LoadCollection { origin, mode } => {
                    self.engine
                        .submit(EngineCommand::LoadCollection { origin, mode });
                }
            }
        }
    }
}

/// Feed engine outcomes back to the dispatcher until either side goes away.
pub fn spawn_event_bridge(
    mut events: mpsc::UnboundedReceiver<EngineEvent>,
    msg_tx: mpsc::UnboundedSender<Msg>,
) {
    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            if msg_tx.send(event_to_msg(event)).is_err() {
                break;
            }
        }
    });
}

// One worker keeps replies in the order `update` produced them.
fn spawn_reply_worker(sink: Arc<dyn ReplySink>) -> mpsc::UnboundedSender<Reply> {
    let (reply_tx, mut reply_rx) = mpsc::unbounded_channel::<Reply>();
    tokio::spawn(async move {
        while let Some(reply) = reply_rx.recv().await {
            if let Err(err) = sink.send(&reply).await {
                bot_error!("Could not deliver reply to chat {}: {err:#}", reply.chat_id.0);
            }
        }
    });
    reply_tx
}

fn event_to_msg(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::TitleFetched {
            origin,
            url,
            result,
        } => {
            let result = result.map_err(|err| {
                bot_warn!("Ingest of {url} for user {} failed: {err}", origin.user_id);
                match err {
                    IngestError::Fetch(fetch) => IngestFailure::Fetch(fetch.kind.to_string()),
                    IngestError::MissingTitle => IngestFailure::MissingTitle,
                }
            });
            Msg::TitleFetched {
                origin,
                url,
                result,
            }
        }
        EngineEvent::CollectionReset {
            origin,
            name,
            result,
        } => Msg::CollectionReset {
            origin,
            name,
            result: result.map_err(store_failure),
        },
        EngineEvent::LinkAppended {
            origin,
            link,
            result,
        } => Msg::LinkSaved {
            origin,
            link,
            result: result.map_err(store_failure),
        },
        EngineEvent::CollectionLoaded {
            origin,
            mode,
            result,
        } => Msg::CollectionLoaded {
            origin,
            mode,
            result: result.map_err(store_failure),
        },
    }
}

fn store_failure(err: StoreError) -> StoreFailure {
    match err {
        StoreError::CollectionNotFound(user_id) => {
            bot_warn!("No collection for user {user_id}");
            StoreFailure::NotFound
        }
        other => {
            bot_error!("Collection store failed: {other}");
            StoreFailure::Unavailable(other.to_string())
        }
    }
}
