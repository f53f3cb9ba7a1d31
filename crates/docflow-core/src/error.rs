//! Domain error types.

use std::fmt::Display;

use thiserror::Error;
use uuid::Uuid;

use crate::collection::CollectionName;

/// Top-level domain error type.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DomainError {
    /// An operation was attempted before an actor identity was established.
    #[error("actor identity is not established")]
    NotReady,

    /// A subscription or write failed at the backing store.
    #[error("sync failure on {collection}: {message}")]
    SyncFailure {
        /// The collection whose sync failed.
        collection: CollectionName,
        /// Backend-reported cause.
        message: String,
    },

    /// A status change violates the lifecycle state machine.
    #[error("invalid transition on {collection}: {from} -> {to}")]
    InvalidTransition {
        /// The collection of the record being transitioned.
        collection: CollectionName,
        /// The current status.
        from: String,
        /// The requested status.
        to: String,
    },

    /// A malformed record or request, rejected before reaching the store.
    #[error("validation error: {0}")]
    Validation(String),

    /// A record was not found in the current snapshot or the store.
    #[error("{collection} record not found: {id}")]
    RecordNotFound {
        /// The collection that was searched.
        collection: CollectionName,
        /// The identifier that was not found.
        id: Uuid,
    },

    /// Establishing an actor identity failed.
    #[error("sign-in failed: {0}")]
    SignInFailed(String),
}

impl DomainError {
    /// Builds a `SyncFailure` for `collection` from any backend error.
    pub fn sync(collection: CollectionName, cause: impl Display) -> Self {
        Self::SyncFailure {
            collection,
            message: cause.to_string(),
        }
    }
}
