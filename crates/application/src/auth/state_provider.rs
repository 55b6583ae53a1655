//! Authentication state exposed to UI routing.
//!
//! The provider derives a [`Principal`] from the stored access token on
//! demand and publishes a new one to subscribers whenever the session
//! changes, so the UI never has to poll.

use std::sync::Arc;

use tokio::sync::watch;
use warden_domain::{AUTH_TOKEN_KEY, Principal};

use crate::ports::KeyValueStore;

/// Derives and publishes the current principal.
pub struct AuthenticationStateProvider {
    store: Arc<dyn KeyValueStore>,
    sender: watch::Sender<Principal>,
}

impl AuthenticationStateProvider {
    /// Creates a provider reading from the given store.
    ///
    /// Subscribers start out seeing the unauthenticated principal.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        let (sender, _) = watch::channel(Principal::unauthenticated());
        Self { store, sender }
    }

    /// Decodes the principal from the stored access token.
    ///
    /// Never fails: a missing token, an unreadable store or a malformed
    /// token all yield the unauthenticated principal.
    pub async fn current_principal(&self) -> Principal {
        let token = match self.store.get(AUTH_TOKEN_KEY).await {
            Ok(Some(token)) => token,
            Ok(None) => return Principal::unauthenticated(),
            Err(e) => {
                tracing::warn!(error = %e, "could not read access token");
                return Principal::unauthenticated();
            }
        };

        decode_or_unauthenticated(&token)
    }

    /// Publishes an authenticated state for a freshly issued token.
    pub fn notify_user_authentication(&self, token: &str) {
        let principal = decode_or_unauthenticated(token);
        tracing::debug!(
            authenticated = principal.is_authenticated(),
            "publishing authentication state"
        );
        self.sender.send_replace(principal);
    }

    /// Publishes the unauthenticated state.
    pub fn notify_logout(&self) {
        tracing::debug!("publishing logged-out state");
        self.sender.send_replace(Principal::unauthenticated());
    }

    /// Subscribes to principal changes.
    ///
    /// The receiver immediately holds the last published principal.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Principal> {
        self.sender.subscribe()
    }

    /// The last published principal.
    #[must_use]
    pub fn last_published(&self) -> Principal {
        self.sender.borrow().clone()
    }
}

fn decode_or_unauthenticated(token: &str) -> Principal {
    Principal::try_from_token(token).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "malformed access token, treating as unauthenticated");
        Principal::unauthenticated()
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::auth::test_support::{MemoryStore, SCENARIO_TOKEN};
    use pretty_assertions::assert_eq;

    fn provider_with(store: &Arc<MemoryStore>) -> AuthenticationStateProvider {
        AuthenticationStateProvider::new(Arc::clone(store) as Arc<dyn KeyValueStore>)
    }

    #[tokio::test]
    async fn test_absent_token_is_unauthenticated() {
        let store = Arc::new(MemoryStore::default());
        let principal = provider_with(&store).current_principal().await;

        assert!(!principal.is_authenticated());
        assert!(principal.claims().is_empty());
    }

    #[tokio::test]
    async fn test_stored_token_is_decoded_each_call() {
        let store = Arc::new(MemoryStore::default());
        let provider = provider_with(&store);

        store.insert(AUTH_TOKEN_KEY, SCENARIO_TOKEN);
        let principal = provider.current_principal().await;
        assert!(principal.is_authenticated());
        assert_eq!(principal.subject(), Some("a"));

        store.insert(AUTH_TOKEN_KEY, "");
        assert!(!provider.current_principal().await.is_authenticated());
    }

    #[tokio::test]
    async fn test_malformed_stored_token_fails_closed() {
        let store = Arc::new(MemoryStore::default());
        store.insert(AUTH_TOKEN_KEY, "not-a-jwt");

        let principal = provider_with(&store).current_principal().await;
        assert_eq!(principal, Principal::unauthenticated());
    }

    #[tokio::test]
    async fn test_subscribers_see_published_changes() {
        let store = Arc::new(MemoryStore::default());
        let provider = provider_with(&store);
        let mut receiver = provider.subscribe();
        assert!(!receiver.borrow().is_authenticated());

        provider.notify_user_authentication(SCENARIO_TOKEN);
        receiver.changed().await.unwrap();
        assert_eq!(receiver.borrow_and_update().subject(), Some("a"));

        provider.notify_logout();
        receiver.changed().await.unwrap();
        assert!(!receiver.borrow_and_update().is_authenticated());
    }

    #[tokio::test]
    async fn test_notify_with_malformed_token_publishes_unauthenticated() {
        let store = Arc::new(MemoryStore::default());
        let provider = provider_with(&store);

        provider.notify_user_authentication("a.b");
        assert_eq!(provider.last_published(), Principal::unauthenticated());
    }
}
