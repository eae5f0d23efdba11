use async_trait::async_trait;
use bot_logging::bot_debug;
use linkbot_core::{Collection, Link, UserId};
use tokio::sync::Mutex;

use crate::PersistError;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("no collection for user {0}")]
    CollectionNotFound(UserId),
    #[error("refusing to store unclassified link {url}")]
    Unclassified { url: String },
    #[error("store file is malformed: {0}")]
    Format(String),
    #[error("persist error: {0}")]
    Persist(#[from] PersistError),
}

/// Per-user collection documents.
///
/// Writes for one store are serialized, so `append_link` is atomic from the
/// caller's point of view.
#[async_trait]
pub trait CollectionStore: Send + Sync {
    async fn find(&self, user_id: UserId) -> Result<Option<Collection>, StoreError>;

    /// Remove every collection of `user_id` and insert an empty one named `name`.
    async fn replace(&self, user_id: UserId, name: &str) -> Result<Collection, StoreError>;

    /// Append a classified link to the user's collection.
    async fn append_link(&self, user_id: UserId, link: Link) -> Result<(), StoreError>;
}

/// Document list shared by the store implementations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Documents {
    collections: Vec<Collection>,
}

impl Documents {
    pub(crate) fn from_collections(collections: Vec<Collection>) -> Self {
        Self { collections }
    }

    pub(crate) fn collections(&self) -> &[Collection] {
        &self.collections
    }

    pub(crate) fn find(&self, user_id: UserId) -> Option<&Collection> {
        self.collections.iter().find(|c| c.user_id == user_id)
    }

    pub(crate) fn replace(&mut self, user_id: UserId, name: &str) -> Collection {
        let before = self.collections.len();
        self.collections.retain(|c| c.user_id != user_id);
        bot_debug!(
            "replacing collections for user {}: removed {}",
            user_id.0,
            before - self.collections.len()
        );
        let collection = Collection::new(user_id, name);
        self.collections.push(collection.clone());
        collection
    }

    pub(crate) fn append_link(&mut self, user_id: UserId, link: Link) -> Result<(), StoreError> {
        if !link.is_classified() {
            return Err(StoreError::Unclassified { url: link.url });
        }
        let collection = self
            .collections
            .iter_mut()
            .find(|c| c.user_id == user_id)
            .ok_or(StoreError::CollectionNotFound(user_id))?;
        collection.links.push(link);
        Ok(())
    }
}

/// Volatile store; everything is lost on restart.
#[derive(Debug, Default)]
pub struct MemoryCollectionStore {
    docs: Mutex<Documents>,
}

impl MemoryCollectionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CollectionStore for MemoryCollectionStore {
    async fn find(&self, user_id: UserId) -> Result<Option<Collection>, StoreError> {
        Ok(self.docs.lock().await.find(user_id).cloned())
    }

    async fn replace(&self, user_id: UserId, name: &str) -> Result<Collection, StoreError> {
        Ok(self.docs.lock().await.replace(user_id, name))
    }

    async fn append_link(&self, user_id: UserId, link: Link) -> Result<(), StoreError> {
        self.docs.lock().await.append_link(user_id, link)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linkbot_core::Category;

    fn classified(url: &str) -> Link {
        Link::unclassified(url, url).classified(Category::Releases)
    }

    #[test]
    fn replace_removes_every_document_for_the_user() {
        let mut docs = Documents::from_collections(vec![
            Collection::new(UserId(1), "old"),
            Collection::new(UserId(2), "other"),
            Collection::new(UserId(1), "older"),
        ]);
        docs.replace(UserId(1), "fresh");

        let names: Vec<_> = docs.collections().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["other", "fresh"]);
    }

    #[test]
    fn append_rejects_unclassified_links() {
        let mut docs = Documents::default();
        docs.replace(UserId(1), "c");
        let err = docs
            .append_link(UserId(1), Link::unclassified("https://a", "A"))
            .unwrap_err();
        assert!(matches!(err, StoreError::Unclassified { .. }));
        assert!(docs.find(UserId(1)).unwrap().links.is_empty());
    }

    #[test]
    fn append_without_collection_is_not_found() {
        let mut docs = Documents::default();
        let err = docs.append_link(UserId(3), classified("https://a")).unwrap_err();
        assert!(matches!(err, StoreError::CollectionNotFound(UserId(3))));
    }

    #[tokio::test]
    async fn memory_store_appends_in_order() {
        let store = MemoryCollectionStore::new();
        store.replace(UserId(1), "list").await.unwrap();
        store.append_link(UserId(1), classified("https://a")).await.unwrap();
        store.append_link(UserId(1), classified("https://b")).await.unwrap();

        let collection = store.find(UserId(1)).await.unwrap().unwrap();
        let urls: Vec<_> = collection.links.iter().map(|l| l.url.as_str()).collect();
        assert_eq!(urls, vec!["https://a", "https://b"]);
        assert!(store.find(UserId(2)).await.unwrap().is_none());
    }
}
