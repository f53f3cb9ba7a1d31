//! Document backend abstraction.
//!
//! The backend is the hosted document database: one partition per
//! application and actor, four collections per partition, each document a
//! JSON object keyed by a backend-assigned id. Implementations must commit
//! writes to a collection serially and deliver snapshots to listeners in
//! commit order.

use std::fmt;

use async_trait::async_trait;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::actor::ActorId;
use crate::collection::CollectionName;
use crate::error::DomainError;

/// The field map of a stored document.
pub type Fields = serde_json::Map<String, serde_json::Value>;

/// One stored document.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Backend-assigned identifier.
    pub id: Uuid,
    /// Document fields, excluding the identifier.
    pub fields: Fields,
}

/// The complete contents of a collection at one point in time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    /// Documents in creation order.
    pub documents: Vec<Document>,
}

/// Stream of snapshots for one collection. The first item is the state at
/// the time of listening; each later item follows one committed change.
pub type SnapshotFeed = mpsc::UnboundedReceiver<Result<Snapshot, DomainError>>;

/// Address of one collection inside the backing store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CollectionPath {
    /// Application partition identifier.
    pub app_id: String,
    /// Owning actor.
    pub actor_id: ActorId,
    /// Collection within the actor's partition.
    pub collection: CollectionName,
}

impl CollectionPath {
    /// Builds the path for `collection` owned by `actor_id`.
    #[must_use]
    pub fn new(app_id: impl Into<String>, actor_id: ActorId, collection: CollectionName) -> Self {
        Self {
            app_id: app_id.into(),
            actor_id,
            collection,
        }
    }
}

impl fmt::Display for CollectionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "artifacts/{}/users/{}/{}",
            self.app_id, self.actor_id, self.collection
        )
    }
}

/// Realtime document store contract.
#[async_trait]
pub trait DocumentBackend: Send + Sync {
    /// Adds a document and returns its newly assigned identifier.
    async fn add(&self, path: &CollectionPath, fields: Fields) -> Result<Uuid, DomainError>;

    /// Reads the committed fields of one document, or `None` if it does not
    /// exist.
    async fn fetch(&self, path: &CollectionPath, id: Uuid) -> Result<Option<Fields>, DomainError>;

    /// Merges `patch` into an existing document.
    ///
    /// Fails with `DomainError::RecordNotFound` if the document does not exist.
    async fn merge(&self, path: &CollectionPath, id: Uuid, patch: Fields)
    -> Result<(), DomainError>;

    /// Removes a document. Removing an absent document succeeds.
    async fn remove(&self, path: &CollectionPath, id: Uuid) -> Result<(), DomainError>;

    /// Opens a snapshot feed for the collection. Dropping or closing the
    /// receiver ends delivery.
    async fn listen(&self, path: &CollectionPath) -> Result<SnapshotFeed, DomainError>;
}
