//! Linkbot engine: page fetching, title extraction, collection storage and
//! async command execution.
mod decode;
mod engine;
mod fetch;
mod ingest;
mod persist;
mod store;
mod title;
mod types;

pub use decode::{decode_body, DecodedBody};
pub use engine::{EngineCommand, EngineEvent, EngineHandle};
pub use fetch::{FetchSettings, Fetcher, ReqwestFetcher};
pub use ingest::{IngestError, LinkIngestor};
pub use persist::{ensure_data_dir, AtomicFileWriter, FileCollectionStore, PersistError, STORE_FILENAME};
pub use store::{CollectionStore, MemoryCollectionStore, StoreError};
pub use title::{decode_entities, HtmlTitleExtractor, RegexTitleExtractor, TitleExtractor};
pub use types::{FailureKind, FetchError, FetchMetadata, FetchOutput};
