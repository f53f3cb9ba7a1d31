//! Typed record abstraction over stored documents.

use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::collection::CollectionName;
use crate::error::DomainError;

/// Trait that every persisted entity kind implements.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// The collection this record kind lives in.
    const COLLECTION: CollectionName;

    /// Checks record-level invariants before a write reaches the store.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` describing the first violation.
    fn validate(&self) -> Result<(), DomainError>;
}

/// A record together with its store-assigned identifier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stored<R> {
    /// Identifier assigned by the store on creation.
    pub id: Uuid,
    /// The record fields.
    #[serde(flatten)]
    pub record: R,
}

impl<R> Stored<R> {
    /// Pairs `record` with its identifier.
    #[must_use]
    pub fn new(id: Uuid, record: R) -> Self {
        Self { id, record }
    }
}

/// Finds the record with `id` in a snapshot.
#[must_use]
pub fn find<R>(snapshot: &[Stored<R>], id: Uuid) -> Option<&Stored<R>> {
    snapshot.iter().find(|stored| stored.id == id)
}
