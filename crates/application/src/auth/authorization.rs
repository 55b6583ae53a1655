//! Shared outgoing-request authorization.

use std::sync::Arc;

use tokio::sync::RwLock;

/// The bearer token every outgoing request is decorated with.
///
/// Clones share the same slot. The lifecycle manager arms it after each
/// successful login or refresh and disarms it on logout; HTTP adapters only
/// read it.
#[derive(Debug, Clone, Default)]
pub struct RequestAuthorization {
    bearer: Arc<RwLock<Option<String>>>,
}

impl RequestAuthorization {
    /// Creates an unarmed authorization slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the bearer token.
    pub async fn arm(&self, access_token: &str) {
        let mut bearer = self.bearer.write().await;
        *bearer = Some(access_token.to_string());
    }

    /// Removes the bearer token.
    pub async fn disarm(&self) {
        let mut bearer = self.bearer.write().await;
        *bearer = None;
    }

    /// The current bearer token, if armed.
    pub async fn token(&self) -> Option<String> {
        self.bearer.read().await.clone()
    }

    /// The `Authorization` header value, if armed.
    pub async fn header_value(&self) -> Option<String> {
        self.token().await.map(|token| format!("Bearer {token}"))
    }
}
