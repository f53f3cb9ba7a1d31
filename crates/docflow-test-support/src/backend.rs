//! Test backends — mock `DocumentBackend` implementations for tests.

use std::sync::Mutex;

use async_trait::async_trait;
use docflow_core::backend::{CollectionPath, DocumentBackend, Fields, Snapshot, SnapshotFeed};
use docflow_core::error::DomainError;
use tokio::sync::mpsc;
use uuid::Uuid;

/// A backend that always fails with a sync failure. Useful for testing
/// error-handling paths.
#[derive(Debug)]
pub struct FailingBackend;

#[async_trait]
impl DocumentBackend for FailingBackend {
    async fn add(&self, path: &CollectionPath, _fields: Fields) -> Result<Uuid, DomainError> {
        Err(DomainError::sync(path.collection, "connection refused"))
    }

    async fn fetch(&self, path: &CollectionPath, _id: Uuid) -> Result<Option<Fields>, DomainError> {
        Err(DomainError::sync(path.collection, "connection refused"))
    }

    async fn merge(
        &self,
        path: &CollectionPath,
        _id: Uuid,
        _patch: Fields,
    ) -> Result<(), DomainError> {
        Err(DomainError::sync(path.collection, "connection refused"))
    }

    async fn remove(&self, path: &CollectionPath, _id: Uuid) -> Result<(), DomainError> {
        Err(DomainError::sync(path.collection, "connection refused"))
    }

    async fn listen(&self, path: &CollectionPath) -> Result<SnapshotFeed, DomainError> {
        Err(DomainError::sync(path.collection, "connection refused"))
    }
}

/// A backend whose feeds are driven by hand. Every `listen` call opens a
/// feed that receives whatever is passed to [`ManualFeedBackend::push`];
/// writes are accepted and recorded but never published.
#[derive(Debug, Default)]
pub struct ManualFeedBackend {
    feeds: Mutex<Vec<mpsc::UnboundedSender<Result<Snapshot, DomainError>>>>,
    writes: Mutex<Vec<(CollectionPath, Option<Uuid>, Fields)>>,
}

impl ManualFeedBackend {
    /// Create a backend with no open feeds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Delivers `item` to every open feed.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn push(&self, item: Result<Snapshot, DomainError>) {
        self.feeds
            .lock()
            .unwrap()
            .retain(|feed| feed.send(item.clone()).is_ok());
    }

    /// Returns all writes seen so far as `(path, id, fields)`; `id` is
    /// `None` for adds.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn writes(&self) -> Vec<(CollectionPath, Option<Uuid>, Fields)> {
        self.writes.lock().unwrap().clone()
    }
}

#[async_trait]
impl DocumentBackend for ManualFeedBackend {
    async fn add(&self, path: &CollectionPath, fields: Fields) -> Result<Uuid, DomainError> {
        self.writes.lock().unwrap().push((path.clone(), None, fields));
        Ok(Uuid::new_v4())
    }

    // Writes are never read back.
    async fn fetch(
        &self,
        _path: &CollectionPath,
        _id: Uuid,
    ) -> Result<Option<Fields>, DomainError> {
        Ok(None)
    }

    async fn merge(
        &self,
        path: &CollectionPath,
        id: Uuid,
        patch: Fields,
    ) -> Result<(), DomainError> {
        self.writes
            .lock()
            .unwrap()
            .push((path.clone(), Some(id), patch));
        Ok(())
    }

    async fn remove(&self, _path: &CollectionPath, _id: Uuid) -> Result<(), DomainError> {
        Ok(())
    }

    async fn listen(&self, _path: &CollectionPath) -> Result<SnapshotFeed, DomainError> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.feeds.lock().unwrap().push(tx);
        Ok(rx)
    }
}
