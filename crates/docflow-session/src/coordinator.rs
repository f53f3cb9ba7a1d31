//! Actor identity lifecycle.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use docflow_core::actor::{ActorId, ActorScope, ScopeController, scope_channel};
use docflow_core::error::DomainError;
use docflow_core::identity::{Credential, IdentityProvider};
use serde::Serialize;
use tracing::{info, warn};

/// Where the coordinator is in the identity lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "actorId", rename_all = "snake_case")]
pub enum SessionState {
    /// No identity; every store operation fails with `NotReady`.
    Uninitialized,
    /// A sign-in is in flight.
    Establishing,
    /// Signed in as the given actor.
    Established(ActorId),
}

/// Holds at most one actor identity and publishes it to the actor scope.
///
/// The scope is cleared before a new identity is requested, so
/// subscriptions opened for the previous actor end before any data of the
/// next actor can flow.
pub struct SessionCoordinator {
    identity: Arc<dyn IdentityProvider>,
    controller: ScopeController,
    state: Mutex<SessionState>,
}

impl std::fmt::Debug for SessionCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionCoordinator")
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl SessionCoordinator {
    /// Creates an uninitialized coordinator signing in through `identity`.
    #[must_use]
    pub fn new(identity: Arc<dyn IdentityProvider>) -> Self {
        let (controller, _scope) = scope_channel();
        Self {
            identity,
            controller,
            state: Mutex::new(SessionState::Uninitialized),
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns a reader of the actor scope this coordinator controls.
    #[must_use]
    pub fn scope(&self) -> ActorScope {
        self.controller.scope()
    }

    /// Returns the current lifecycle state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        *self.lock_state()
    }

    /// Returns the established actor, if any.
    #[must_use]
    pub fn actor(&self) -> Option<ActorId> {
        match self.state() {
            SessionState::Established(actor) => Some(actor),
            SessionState::Uninitialized | SessionState::Establishing => None,
        }
    }

    /// Establishes an identity, replacing any current one.
    ///
    /// A refused custom token falls back to an anonymous sign-in. On
    /// failure the coordinator returns to `Uninitialized` and may be asked
    /// again; nothing is retried automatically.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotReady` if another sign-in is in flight, or
    /// the provider's `DomainError::SignInFailed`.
    pub async fn establish(&self, credential: &Credential) -> Result<ActorId, DomainError> {
        {
            let mut state = self.lock_state();
            if *state == SessionState::Establishing {
                return Err(DomainError::NotReady);
            }
            self.controller.clear();
            *state = SessionState::Establishing;
        }

        let result = match self.identity.sign_in(credential).await {
            Err(e) if matches!(credential, Credential::CustomToken(_)) => {
                warn!(error = %e, "custom token refused, signing in anonymously");
                self.identity.sign_in(&Credential::Anonymous).await
            }
            other => other,
        };

        let mut state = self.lock_state();
        match result {
            Ok(actor) => {
                self.controller.establish(actor);
                *state = SessionState::Established(actor);
                info!(%actor, "actor identity established");
                Ok(actor)
            }
            Err(e) => {
                *state = SessionState::Uninitialized;
                warn!(error = %e, "sign-in failed");
                Err(e)
            }
        }
    }

    /// Drops the current identity. Safe to call when signed out.
    pub fn sign_out(&self) {
        let mut state = self.lock_state();
        self.controller.clear();
        if let SessionState::Established(actor) = *state {
            info!(%actor, "actor signed out");
        }
        *state = SessionState::Uninitialized;
    }
}
