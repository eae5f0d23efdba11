use std::sync::Arc;

use anyhow::Context as _;
use bot_logging::{bot_debug, bot_info};
use linkbot_core::{update, AppState, Msg};
use linkbot_engine::{
    CollectionStore, EngineEvent, EngineHandle, FetchSettings, FileCollectionStore,
    HtmlTitleExtractor, LinkIngestor, MemoryCollectionStore, RegexTitleExtractor,
    ReqwestFetcher, TitleExtractor,
};
use tokio::sync::mpsc;

use crate::config::{BotConfig, StoreKind, TitleParser};
use crate::effects::{spawn_event_bridge, EffectRunner};
use crate::transport::{ReplySink, TelegramTransport};

pub async fn run(config: BotConfig) -> anyhow::Result<()> {
    let (engine, events) = build_engine(&config)?;
    let transport = TelegramTransport::new(&config.token);
    let sink: Arc<dyn ReplySink> = Arc::new(transport.clone());

    let (msg_tx, msg_rx) = mpsc::unbounded_channel::<Msg>();
    let dispatcher = spawn_dispatcher(engine, events, sink, msg_tx.clone(), msg_rx);

    bot_info!("Listening for messages");
    transport.listen(msg_tx).await;

    bot_info!("Shutting down");
    dispatcher.abort();
    Ok(())
}

fn build_engine(
    config: &BotConfig,
) -> anyhow::Result<(EngineHandle, mpsc::UnboundedReceiver<EngineEvent>)> {
    let store: Arc<dyn CollectionStore> = match config.store {
        StoreKind::File => {
            let store = FileCollectionStore::open(&config.data_dir).with_context(|| {
                format!(
                    "failed to open collection store in {}",
                    config.data_dir.display()
                )
            })?;
            bot_info!("Using collection store at {}", store.path().display());
            Arc::new(store)
        }
        StoreKind::Memory => {
            bot_info!("Using in-memory collection store");
            Arc::new(MemoryCollectionStore::new())
        }
    };

    let extractor: Arc<dyn TitleExtractor> = match config.title_parser {
        TitleParser::Regex => Arc::new(RegexTitleExtractor),
        TitleParser::Html => Arc::new(HtmlTitleExtractor),
    };
    let settings = FetchSettings {
        request_timeout: config.fetch_timeout,
        ..FetchSettings::default()
    };
    let ingestor = LinkIngestor::new(Arc::new(ReqwestFetcher::new(settings)), extractor);

    Ok(EngineHandle::new(Arc::new(ingestor), store))
}

/// Wire engine events and replies around a dispatcher task that owns the
/// conversation state. The task ends when every `Msg` sender is dropped.
fn spawn_dispatcher(
    engine: EngineHandle,
    events: mpsc::UnboundedReceiver<EngineEvent>,
    sink: Arc<dyn ReplySink>,
    msg_tx: mpsc::UnboundedSender<Msg>,
    msg_rx: mpsc::UnboundedReceiver<Msg>,
) -> tokio::task::JoinHandle<()> {
    spawn_event_bridge(events, msg_tx);
    let runner = EffectRunner::new(engine, sink);
    tokio::spawn(dispatch_loop(msg_rx, runner))
}

async fn dispatch_loop(mut msg_rx: mpsc::UnboundedReceiver<Msg>, runner: EffectRunner) {
    let mut state = AppState::new();
    while let Some(msg) = msg_rx.recv().await {
        let (next, effects) = update(std::mem::take(&mut state), msg);
        state = next;
        runner.enqueue(effects);
    }
    bot_debug!("Dispatcher stopped with {} pending links", state.pending_count());
}
