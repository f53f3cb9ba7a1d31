//! In-process realtime backend.
//!
//! Each collection path owns its documents and its listeners behind one
//! lock, so writes to a collection are serialized and every listener sees
//! one snapshot per commit, in commit order.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use docflow_core::backend::{
    CollectionPath, Document, DocumentBackend, Fields, Snapshot, SnapshotFeed,
};
use docflow_core::error::DomainError;
use tokio::sync::mpsc;
use tracing::debug;
use uuid::Uuid;

type Listener = mpsc::UnboundedSender<Result<Snapshot, DomainError>>;

#[derive(Debug, Default)]
struct Partition {
    documents: Vec<Document>,
    listeners: Vec<Listener>,
}

impl Partition {
    fn snapshot(&self) -> Snapshot {
        Snapshot {
            documents: self.documents.clone(),
        }
    }

    fn publish(&mut self) {
        let snapshot = self.snapshot();
        self.listeners
            .retain(|listener| listener.send(Ok(snapshot.clone())).is_ok());
    }
}

/// A realtime document backend held entirely in memory.
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    partitions: Mutex<HashMap<CollectionPath, Partition>>,
}

impl InMemoryBackend {
    /// Creates an empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(
        &self,
        path: &CollectionPath,
    ) -> Result<MutexGuard<'_, HashMap<CollectionPath, Partition>>, DomainError> {
        self.partitions
            .lock()
            .map_err(|_| DomainError::sync(path.collection, "in-memory store lock poisoned"))
    }

    /// Returns the documents currently stored at `path`.
    #[must_use]
    pub fn documents(&self, path: &CollectionPath) -> Vec<Document> {
        self.lock(path)
            .map(|partitions| {
                partitions
                    .get(path)
                    .map(|p| p.documents.clone())
                    .unwrap_or_default()
            })
            .unwrap_or_default()
    }
}

#[async_trait]
impl DocumentBackend for InMemoryBackend {
    async fn add(&self, path: &CollectionPath, fields: Fields) -> Result<Uuid, DomainError> {
        let id = Uuid::new_v4();
        let mut partitions = self.lock(path)?;
        let partition = partitions.entry(path.clone()).or_default();
        partition.documents.push(Document { id, fields });
        partition.publish();
        Ok(id)
    }

    async fn fetch(&self, path: &CollectionPath, id: Uuid) -> Result<Option<Fields>, DomainError> {
        let partitions = self.lock(path)?;
        Ok(partitions
            .get(path)
            .and_then(|p| p.documents.iter().find(|d| d.id == id))
            .map(|d| d.fields.clone()))
    }

    async fn merge(
        &self,
        path: &CollectionPath,
        id: Uuid,
        patch: Fields,
    ) -> Result<(), DomainError> {
        let mut partitions = self.lock(path)?;
        let document = partitions
            .get_mut(path)
            .and_then(|p| p.documents.iter_mut().find(|d| d.id == id))
            .ok_or(DomainError::RecordNotFound {
                collection: path.collection,
                id,
            })?;
        document.fields.extend(patch);
        if let Some(partition) = partitions.get_mut(path) {
            partition.publish();
        }
        Ok(())
    }

    async fn remove(&self, path: &CollectionPath, id: Uuid) -> Result<(), DomainError> {
        let mut partitions = self.lock(path)?;
        let Some(partition) = partitions.get_mut(path) else {
            return Ok(());
        };
        let before = partition.documents.len();
        partition.documents.retain(|d| d.id != id);
        if partition.documents.len() != before {
            partition.publish();
        }
        Ok(())
    }

    async fn listen(&self, path: &CollectionPath) -> Result<SnapshotFeed, DomainError> {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut partitions = self.lock(path)?;
        let partition = partitions.entry(path.clone()).or_default();
        // The initial snapshot is queued under the same lock as later
        // commits, so nothing can slip in between.
        let _ = tx.send(Ok(partition.snapshot()));
        partition.listeners.push(tx);
        debug!(path = %path, listeners = partition.listeners.len(), "listener attached");
        Ok(rx)
    }
}
