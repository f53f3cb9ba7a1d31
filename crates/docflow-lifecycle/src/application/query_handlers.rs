//! Query handlers for the lifecycle engine.

use docflow_core::error::DomainError;
use docflow_core::record::Stored;
use docflow_records::{Ledger, LedgerEntry};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::links::Linked;

/// Outcome of following a record's back-reference.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "source", rename_all = "snake_case")]
pub enum BackReference<S> {
    /// The record was created free-standing.
    Unlinked,
    /// The upstream record is still present.
    Found(Stored<S>),
    /// The upstream record was deleted; only its id remains.
    Dangling(Uuid),
}

/// Returns the record `id` of kind `R` from the ledger.
///
/// # Errors
///
/// Returns `DomainError::RecordNotFound` if the record is not in the
/// ledger.
pub fn get_record<R: LedgerEntry>(ledger: &Ledger, id: Uuid) -> Result<Stored<R>, DomainError> {
    ledger
        .get::<R>(id)
        .cloned()
        .ok_or(DomainError::RecordNotFound {
            collection: R::COLLECTION,
            id,
        })
}

/// Follows the back-reference of record `id`. A deleted upstream record
/// resolves to [`BackReference::Dangling`], never to an error.
///
/// # Errors
///
/// Returns `DomainError::RecordNotFound` only if record `id` itself is not
/// in the ledger.
pub fn resolve_source<R: Linked>(
    ledger: &Ledger,
    id: Uuid,
) -> Result<BackReference<R::Source>, DomainError> {
    let record = get_record::<R>(ledger, id)?;
    let resolved = match record.record.back_reference() {
        None => BackReference::Unlinked,
        Some(source_id) => ledger
            .get::<R::Source>(source_id)
            .cloned()
            .map_or(BackReference::Dangling(source_id), BackReference::Found),
    };
    Ok(resolved)
}
