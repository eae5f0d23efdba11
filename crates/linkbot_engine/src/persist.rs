use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bot_logging::{bot_info, bot_warn};
use linkbot_core::{Category, Collection, Link, UserId};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::store::{CollectionStore, Documents, StoreError};

pub const STORE_FILENAME: &str = "collections.ron";

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("data directory missing or not writable: {0}")]
    DataDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Ensure the data directory exists; create it if missing.
pub fn ensure_data_dir(dir: &Path) -> Result<(), PersistError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| PersistError::DataDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(PersistError::DataDir("path is not a directory".into()));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| PersistError::DataDir(e.to_string()))?;
    }
    Ok(())
}

/// Atomically write content to `{dir}/{filename}` by writing a temp file then renaming.
#[derive(Debug, Clone)]
pub struct AtomicFileWriter {
    dir: PathBuf,
}

impl AtomicFileWriter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn write(&self, filename: &str, content: &str) -> Result<PathBuf, PersistError> {
        ensure_data_dir(&self.dir)?;

        let target = self.dir.join(filename);
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;

        // Replaces an existing target in one step.
        tmp.persist(&target).map_err(|e| PersistError::Io(e.error))?;
        Ok(target)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PersistedLink {
    url: String,
    title: String,
    category: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PersistedCollection {
    user_id: u64,
    collection_name: String,
    links: Vec<PersistedLink>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct PersistedState {
    collections: Vec<PersistedCollection>,
}

/// Collections kept in memory and mirrored to `{data_dir}/collections.ron`
/// after every mutation.
pub struct FileCollectionStore {
    writer: AtomicFileWriter,
    path: PathBuf,
    docs: Mutex<Documents>,
}

impl FileCollectionStore {
    /// Load the store from `data_dir`. A missing file is an empty store; a
    /// malformed one is an error.
    pub fn open(data_dir: &Path) -> Result<Self, StoreError> {
        ensure_data_dir(data_dir)?;
        let path = data_dir.join(STORE_FILENAME);
        let docs = match fs::read_to_string(&path) {
            Ok(content) => {
                let state: PersistedState =
                    ron::from_str(&content).map_err(|err| StoreError::Format(err.to_string()))?;
                let docs = Documents::from_collections(
                    state.collections.into_iter().map(from_persisted).collect(),
                );
                bot_info!(
                    "Loaded {} collections from {:?}",
                    docs.collections().len(),
                    path
                );
                docs
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Documents::default(),
            Err(err) => return Err(PersistError::Io(err).into()),
        };

        Ok(Self {
            writer: AtomicFileWriter::new(data_dir.to_path_buf()),
            path,
            docs: Mutex::new(docs),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Serialize on the caller, write and fsync on the blocking pool.
    async fn save(&self, docs: &Documents) -> Result<(), StoreError> {
        let state = PersistedState {
            collections: docs.collections().iter().map(to_persisted).collect(),
        };
        let content = ron::ser::to_string_pretty(&state, ron::ser::PrettyConfig::new())
            .map_err(|err| StoreError::Format(err.to_string()))?;
        let writer = self.writer.clone();
        tokio::task::spawn_blocking(move || writer.write(STORE_FILENAME, &content))
            .await
            .map_err(|err| PersistError::Io(io::Error::other(err)))??;
        Ok(())
    }

    /// Apply `mutate` to a copy, persist it, and only then make it visible.
    async fn commit<T>(
        &self,
        mutate: impl FnOnce(&mut Documents) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut guard = self.docs.lock().await;
        let mut next = guard.clone();
        let value = mutate(&mut next)?;
        self.save(&next).await?;
        *guard = next;
        Ok(value)
    }
}

#[async_trait]
impl CollectionStore for FileCollectionStore {
    async fn find(&self, user_id: UserId) -> Result<Option<Collection>, StoreError> {
        Ok(self.docs.lock().await.find(user_id).cloned())
    }

    async fn replace(&self, user_id: UserId, name: &str) -> Result<Collection, StoreError> {
        self.commit(|docs| Ok(docs.replace(user_id, name))).await
    }

    async fn append_link(&self, user_id: UserId, link: Link) -> Result<(), StoreError> {
        self.commit(|docs| docs.append_link(user_id, link)).await
    }
}

fn to_persisted(collection: &Collection) -> PersistedCollection {
    PersistedCollection {
        user_id: collection.user_id.0,
        collection_name: collection.name.clone(),
        links: collection
            .links
            .iter()
            .map(|link| PersistedLink {
                url: link.url.clone(),
                title: link.title.clone(),
                category: link.category.map(Category::name).unwrap_or_default().to_string(),
            })
            .collect(),
    }
}

fn from_persisted(collection: PersistedCollection) -> Collection {
    let user_id = UserId(collection.user_id);
    let links = collection
        .links
        .into_iter()
        .filter_map(|link| match Category::from_name(&link.category) {
            Some(category) => Some(Link::unclassified(link.url, link.title).classified(category)),
            None => {
                bot_warn!(
                    "Dropping stored link {} of user {} with unknown category {:?}",
                    link.url,
                    user_id,
                    link.category
                );
                None
            }
        })
        .collect();
    Collection {
        user_id,
        name: collection.collection_name,
        links,
    }
}
