//! Typed, actor-scoped access to the four collections.

use std::fmt;
use std::sync::Arc;

use docflow_core::actor::ActorScope;
use docflow_core::backend::{CollectionPath, DocumentBackend, Fields};
use docflow_core::collection::CollectionName;
use docflow_core::error::DomainError;
use docflow_core::record::{Record, Stored};
use tracing::{debug, info};
use uuid::Uuid;

use crate::codec;
use crate::subscription::Subscription;

/// The entity store every workflow operation writes through.
///
/// All operations resolve the current actor from the injected
/// [`ActorScope`] at call time and fail with `DomainError::NotReady` when
/// no actor is established. There is no way to address another actor's
/// partition through this type.
#[derive(Clone)]
pub struct EntityStore {
    backend: Arc<dyn DocumentBackend>,
    app_id: String,
    scope: ActorScope,
}

impl fmt::Debug for EntityStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityStore")
            .field("app_id", &self.app_id)
            .field("actor", &self.scope.current())
            .finish_non_exhaustive()
    }
}

impl EntityStore {
    /// Creates a store over `backend`, partitioned under `app_id`.
    #[must_use]
    pub fn new(
        backend: Arc<dyn DocumentBackend>,
        app_id: impl Into<String>,
        scope: ActorScope,
    ) -> Self {
        Self {
            backend,
            app_id: app_id.into(),
            scope,
        }
    }

    /// Returns the application partition identifier.
    #[must_use]
    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    fn path(&self, collection: CollectionName) -> Result<CollectionPath, DomainError> {
        let actor = self.scope.require()?;
        Ok(CollectionPath::new(self.app_id.clone(), actor, collection))
    }

    /// Validates and persists a new record, returning its assigned id.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotReady` without an actor, `DomainError::Validation`
    /// if the record is malformed, or the backend's `DomainError::SyncFailure`.
    pub async fn create<R: Record>(&self, record: &R) -> Result<Uuid, DomainError> {
        let path = self.path(R::COLLECTION)?;
        record.validate()?;
        let fields = codec::encode(record)?;
        let id = self.backend.add(&path, fields).await?;
        info!(collection = %R::COLLECTION, record_id = %id, "record created");
        Ok(id)
    }

    /// Reads the committed record `id`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotReady` without an actor,
    /// `DomainError::RecordNotFound` if `id` does not exist,
    /// `DomainError::Validation` if the stored document is not a valid `R`,
    /// or the backend's `DomainError::SyncFailure`.
    pub async fn get<R: Record>(&self, id: Uuid) -> Result<Stored<R>, DomainError> {
        let path = self.path(R::COLLECTION)?;
        let fields = self.fetch(&path, id).await?;
        Ok(Stored::new(id, codec::decode(fields)?))
    }

    async fn fetch(&self, path: &CollectionPath, id: Uuid) -> Result<Fields, DomainError> {
        self.backend
            .fetch(path, id)
            .await?
            .ok_or(DomainError::RecordNotFound {
                collection: path.collection,
                id,
            })
    }

    /// Merges `patch` into the record `id`. Presentation-only fields are
    /// dropped from the patch first, and the merged result must still be a
    /// valid `R` or nothing is written.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotReady` without an actor,
    /// `DomainError::RecordNotFound` if `id` does not exist,
    /// `DomainError::Validation` if the merged record is malformed, or the
    /// backend's `DomainError::SyncFailure`.
    pub async fn update<R: Record>(&self, id: Uuid, patch: Fields) -> Result<(), DomainError> {
        let path = self.path(R::COLLECTION)?;
        let patch = codec::strip_transient(patch);
        if patch.is_empty() {
            debug!(collection = %R::COLLECTION, record_id = %id, "empty patch, nothing to write");
            return Ok(());
        }

        let mut merged = self.fetch(&path, id).await?;
        merged.extend(patch.clone());
        codec::decode::<R>(merged)?.validate()?;

        self.backend.merge(&path, id, patch).await?;
        info!(collection = %R::COLLECTION, record_id = %id, "record updated");
        Ok(())
    }

    /// Deletes the record `id`. Records in other collections that refer to
    /// it are left untouched.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotReady` without an actor, or the backend's
    /// `DomainError::SyncFailure`.
    pub async fn delete<R: Record>(&self, id: Uuid) -> Result<(), DomainError> {
        let path = self.path(R::COLLECTION)?;
        self.backend.remove(&path, id).await?;
        info!(collection = %R::COLLECTION, record_id = %id, "record deleted");
        Ok(())
    }

    /// Subscribes to full snapshots of the `R` collection for the current
    /// actor. The subscription ends by itself when the actor changes.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotReady` without an actor, or the backend's
    /// `DomainError::SyncFailure` if the feed cannot be opened.
    pub async fn subscribe<R: Record>(&self) -> Result<Subscription<R>, DomainError> {
        let path = self.path(R::COLLECTION)?;
        let feed = self.backend.listen(&path).await?;
        debug!(collection = %R::COLLECTION, actor = %path.actor_id, "subscribed");
        Ok(Subscription::new(feed, path.actor_id, self.scope.clone()))
    }
}
