//! Wiring of the session components.

use std::sync::Arc;

use anyhow::Context;
use warden_application::{
    AuthApi, AuthenticationStateProvider, Clock, KeyValueStore, RequestAuthorization,
    TokenLifecycleManager,
};
use warden_domain::ClientSettings;
use warden_infrastructure::{FileStore, HttpAuthApi, SystemClock};

/// Everything a command needs, sharing one store and one authorization slot.
pub struct Session {
    /// Login, refresh and logout.
    pub manager: TokenLifecycleManager,
    /// Claims of the stored token.
    pub provider: Arc<AuthenticationStateProvider>,
    /// Authorized requests against the backend.
    pub api: Arc<HttpAuthApi>,
}

impl Session {
    /// Builds the components and re-arms any stored session.
    pub async fn open(settings: &ClientSettings) -> anyhow::Result<Self> {
        let session_file = settings
            .session_file
            .clone()
            .context("no session file configured")?;
        let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(session_file));
        let authorization = RequestAuthorization::new();
        let api = Arc::new(HttpAuthApi::new(settings, authorization.clone())?);
        let provider = Arc::new(AuthenticationStateProvider::new(Arc::clone(&store)));

        let manager = TokenLifecycleManager::new(
            store,
            Arc::clone(&api) as Arc<dyn AuthApi>,
            Arc::new(SystemClock::new()) as Arc<dyn Clock>,
            authorization,
        )
        .with_state_provider(Arc::clone(&provider));
        manager.restore().await?;

        Ok(Self {
            manager,
            provider,
            api,
        })
    }
}
