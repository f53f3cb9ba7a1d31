//! Test identity providers — mock `IdentityProvider` implementations.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use docflow_core::actor::ActorId;
use docflow_core::error::DomainError;
use docflow_core::identity::{Credential, IdentityProvider};

/// A provider that signs every credential in as the same actor and counts
/// calls.
#[derive(Debug)]
pub struct StaticIdentityProvider {
    actor: ActorId,
    calls: AtomicUsize,
}

impl StaticIdentityProvider {
    /// Create a provider that always returns `actor`.
    #[must_use]
    pub fn new(actor: ActorId) -> Self {
        Self {
            actor,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of sign-in attempts seen.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentityProvider {
    async fn sign_in(&self, _credential: &Credential) -> Result<ActorId, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.actor)
    }
}

/// A provider that always refuses. Useful for testing sign-in failure paths.
#[derive(Debug)]
pub struct FailingIdentityProvider;

#[async_trait]
impl IdentityProvider for FailingIdentityProvider {
    async fn sign_in(&self, _credential: &Credential) -> Result<ActorId, DomainError> {
        Err(DomainError::SignInFailed("identity service unreachable".into()))
    }
}
