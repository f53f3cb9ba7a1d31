//! Identity provider port.
//!
//! Signing in is an external concern; the session coordinator only needs
//! something that turns a credential into an [`ActorId`], asynchronously
//! and fallibly.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::actor::ActorId;
use crate::error::DomainError;

/// How an actor proves who they are.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "token", rename_all = "snake_case")]
pub enum Credential {
    /// No proof; the provider issues a throwaway identity.
    Anonymous,
    /// A token minted by the hosting environment.
    CustomToken(String),
}

/// Abstraction over the authentication service.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Establishes an identity for `credential`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::SignInFailed` when the provider refuses or
    /// cannot be reached.
    async fn sign_in(&self, credential: &Credential) -> Result<ActorId, DomainError>;
}

/// Provider that issues a fresh random identity for anonymous sign-in and
/// refuses custom tokens.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnonymousIdentityProvider;

#[async_trait]
impl IdentityProvider for AnonymousIdentityProvider {
    async fn sign_in(&self, credential: &Credential) -> Result<ActorId, DomainError> {
        match credential {
            Credential::Anonymous => Ok(ActorId(Uuid::new_v4())),
            Credential::CustomToken(_) => Err(DomainError::SignInFailed(
                "custom tokens are not supported by the anonymous provider".to_owned(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_anonymous_sign_in_issues_distinct_identities() {
        let provider = AnonymousIdentityProvider;

        let first = provider.sign_in(&Credential::Anonymous).await.unwrap();
        let second = provider.sign_in(&Credential::Anonymous).await.unwrap();

        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_custom_token_is_refused() {
        let provider = AnonymousIdentityProvider;

        let result = provider
            .sign_in(&Credential::CustomToken("abc".to_owned()))
            .await;

        assert!(matches!(result, Err(DomainError::SignInFailed(_))));
    }

    #[test]
    fn test_credential_wire_format() {
        let json = serde_json::to_value(Credential::CustomToken("abc".to_owned())).unwrap();

        assert_eq!(json, serde_json::json!({ "kind": "custom_token", "token": "abc" }));
        assert_eq!(
            serde_json::from_value::<Credential>(serde_json::json!({ "kind": "anonymous" }))
                .unwrap(),
            Credential::Anonymous
        );
    }
}
