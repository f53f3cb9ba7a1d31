//! Actor identity and the scope that all data access runs under.

use std::fmt;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use uuid::Uuid;

use crate::error::DomainError;

/// The authenticated (or anonymous) identity that owns a partition of data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActorId(pub Uuid);

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Creates a linked scope controller and reader, starting with no actor.
#[must_use]
pub fn scope_channel() -> (ScopeController, ActorScope) {
    let (tx, rx) = watch::channel(None);
    (ScopeController { tx }, ActorScope { rx })
}

/// Write side of the actor scope, held by whoever owns identity.
#[derive(Debug)]
pub struct ScopeController {
    tx: watch::Sender<Option<ActorId>>,
}

impl ScopeController {
    /// Makes `actor` the current scope.
    pub fn establish(&self, actor: ActorId) {
        self.tx.send_replace(Some(actor));
    }

    /// Clears the current scope. Readers observe the change immediately.
    pub fn clear(&self) {
        self.tx.send_replace(None);
    }

    /// Returns a new reader bound to this controller.
    #[must_use]
    pub fn scope(&self) -> ActorScope {
        ActorScope {
            rx: self.tx.subscribe(),
        }
    }
}

/// Read side of the actor scope. Cheap to clone.
#[derive(Debug, Clone)]
pub struct ActorScope {
    rx: watch::Receiver<Option<ActorId>>,
}

impl ActorScope {
    /// Returns the current actor, if one is established.
    #[must_use]
    pub fn current(&self) -> Option<ActorId> {
        *self.rx.borrow()
    }

    /// Returns the current actor.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotReady` if no actor is established.
    pub fn require(&self) -> Result<ActorId, DomainError> {
        self.current().ok_or(DomainError::NotReady)
    }

    /// Waits until the scope changes. Never completes once the controller
    /// has been dropped, since no further change can arrive.
    pub async fn changed(&mut self) {
        if self.rx.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_returns_not_ready_before_establish() {
        // Arrange
        let (_controller, scope) = scope_channel();

        // Act
        let result = scope.require();

        // Assert
        assert_eq!(result, Err(DomainError::NotReady));
    }

    #[test]
    fn test_establish_and_clear_are_visible_to_existing_readers() {
        // Arrange
        let (controller, scope) = scope_channel();
        let actor = ActorId(Uuid::new_v4());

        // Act
        controller.establish(actor);
        let during = scope.current();
        controller.clear();
        let after = scope.current();

        // Assert
        assert_eq!(during, Some(actor));
        assert_eq!(after, None);
    }
}
