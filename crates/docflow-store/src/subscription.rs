//! Cancellable snapshot subscription for one collection.

use std::marker::PhantomData;

use docflow_core::actor::{ActorId, ActorScope};
use docflow_core::backend::{Snapshot, SnapshotFeed};
use docflow_core::collection::CollectionName;
use docflow_core::error::DomainError;
use docflow_core::record::{Record, Stored};
use tracing::{debug, warn};

use crate::codec;

enum Step {
    Delivered(Option<Result<Snapshot, DomainError>>),
    ScopeChanged,
}

/// A live view of one collection for one actor.
///
/// [`Subscription::next`] yields the current snapshot first and then one
/// snapshot per committed change, in commit order. A backend failure is
/// yielded as `Err(DomainError::SyncFailure)` without ending the
/// subscription; [`Subscription::latest`] keeps returning the last good
/// snapshot. The sequence ends only on [`Subscription::cancel`], when the
/// actor scope moves away from the subscribing actor, or when the backend
/// closes the feed.
pub struct Subscription<R> {
    feed: Option<SnapshotFeed>,
    actor: ActorId,
    scope: ActorScope,
    latest: Option<Vec<Stored<R>>>,
    _record: PhantomData<fn() -> R>,
}

impl<R: Record> Subscription<R> {
    pub(crate) fn new(feed: SnapshotFeed, actor: ActorId, scope: ActorScope) -> Self {
        Self {
            feed: Some(feed),
            actor,
            scope,
            latest: None,
            _record: PhantomData,
        }
    }

    /// The collection this subscription follows.
    #[must_use]
    pub fn collection(&self) -> CollectionName {
        R::COLLECTION
    }

    /// The actor this subscription was opened for.
    #[must_use]
    pub fn actor(&self) -> ActorId {
        self.actor
    }

    /// Whether more snapshots can still be delivered.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.feed.is_some()
    }

    /// The last successfully delivered snapshot.
    #[must_use]
    pub fn latest(&self) -> Option<&[Stored<R>]> {
        self.latest.as_deref()
    }

    /// Waits for the next snapshot or sync failure. Returns `None` once the
    /// subscription has ended.
    pub async fn next(&mut self) -> Option<Result<Vec<Stored<R>>, DomainError>> {
        loop {
            if self.scope.current() != Some(self.actor) {
                debug!(
                    collection = %R::COLLECTION,
                    actor = %self.actor,
                    "actor scope changed, ending subscription"
                );
                self.cancel();
                return None;
            }
            let feed = self.feed.as_mut()?;
            let step = tokio::select! {
                item = feed.recv() => Step::Delivered(item),
                () = self.scope.changed() => Step::ScopeChanged,
            };
            match step {
                Step::ScopeChanged => {}
                Step::Delivered(None) => {
                    debug!(collection = %R::COLLECTION, "snapshot feed closed by backend");
                    self.feed = None;
                    return None;
                }
                Step::Delivered(Some(Ok(snapshot))) => {
                    let records = codec::decode_snapshot::<R>(snapshot);
                    self.latest = Some(records.clone());
                    return Some(Ok(records));
                }
                Step::Delivered(Some(Err(e))) => {
                    warn!(
                        collection = %R::COLLECTION,
                        error = %e,
                        "snapshot feed reported a failure"
                    );
                    return Some(Err(e));
                }
            }
        }
    }

    /// Stops delivery. Safe to call more than once. Writes already issued
    /// still complete; their effects are simply not observed here.
    pub fn cancel(&mut self) {
        if let Some(mut feed) = self.feed.take() {
            feed.close();
            debug!(collection = %R::COLLECTION, actor = %self.actor, "subscription cancelled");
        }
    }
}
