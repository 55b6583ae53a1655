//! Token lifecycle: login, refresh on expiry, logout.
//!
//! All mutation of the stored session and of the outgoing authorization
//! header goes through [`TokenLifecycleManager`]. Operations are serialized
//! by an internal mutex, so concurrent callers of
//! [`TokenLifecycleManager::ensure_valid_token`] never race duplicate
//! refresh calls.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use warden_domain::{
    AUTH_TOKEN_KEY, Credentials, REFRESH_TOKEN_KEY, SESSION_KEYS, SessionState, StoredSession,
    TOKEN_EXPIRY_KEY, TokenPair, auth::is_expired, auth::parse_expiry, token_preview,
};

use crate::auth::{AuthenticationStateProvider, RequestAuthorization};
use crate::error::{ApplicationError, ApplicationResult};
use crate::ports::{AuthApi, AuthApiError, Clock, KeyValueStore};

/// Owns the rules for acquiring, persisting, refreshing and discarding the
/// token pair.
pub struct TokenLifecycleManager {
    store: Arc<dyn KeyValueStore>,
    api: Arc<dyn AuthApi>,
    clock: Arc<dyn Clock>,
    authorization: RequestAuthorization,
    state_provider: Option<Arc<AuthenticationStateProvider>>,
    serial: Mutex<()>,
    refresh_rejected: AtomicBool,
}

impl TokenLifecycleManager {
    /// Creates a manager over the given store, backend and clock.
    ///
    /// `authorization` is the slot shared with whatever issues requests.
    #[must_use]
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        api: Arc<dyn AuthApi>,
        clock: Arc<dyn Clock>,
        authorization: RequestAuthorization,
    ) -> Self {
        Self {
            store,
            api,
            clock,
            authorization,
            state_provider: None,
            serial: Mutex::new(()),
            refresh_rejected: AtomicBool::new(false),
        }
    }

    /// Publishes principal changes through the given provider.
    #[must_use]
    pub fn with_state_provider(mut self, provider: Arc<AuthenticationStateProvider>) -> Self {
        self.state_provider = Some(provider);
        self
    }

    /// The authorization slot this manager arms.
    #[must_use]
    pub const fn authorization(&self) -> &RequestAuthorization {
        &self.authorization
    }

    /// Signs in and returns the new access token.
    ///
    /// On any failure the previously stored session is left untouched.
    ///
    /// # Errors
    ///
    /// Returns `Domain` for invalid credentials, `CredentialsRejected` for a
    /// non-success response, `InvalidResponse` for a success without a usable
    /// body, `Transport` when the backend is unreachable and `Storage` when
    /// the new session cannot be written.
    pub async fn login(&self, credentials: &Credentials) -> ApplicationResult<String> {
        credentials.validate()?;
        let _guard = self.serial.lock().await;

        let pair = self.api.login(credentials).await.map_err(|e| match e {
            AuthApiError::Rejected { status, .. } => {
                ApplicationError::CredentialsRejected { status }
            }
            AuthApiError::InvalidResponse(message) => ApplicationError::InvalidResponse(message),
            AuthApiError::Transport(message) => ApplicationError::Transport(message),
        })?;

        self.install(&pair).await?;
        self.refresh_rejected.store(false, Ordering::SeqCst);
        tracing::info!(
            email = %credentials.email,
            token = %token_preview(&pair.access_token),
            "signed in"
        );
        Ok(pair.access_token)
    }

    /// Refreshes the access token if it has expired.
    ///
    /// A missing or unparsable expiry, an unexpired token, or a missing
    /// refresh token all return without touching the network. A rejected
    /// refresh logs out.
    ///
    /// # Errors
    ///
    /// Returns `Transport` if the refresh endpoint is unreachable and
    /// `Storage` if the store cannot be read or written.
    pub async fn ensure_valid_token(&self) -> ApplicationResult<()> {
        let _guard = self.serial.lock().await;

        let Some(raw_expiry) = self.store.get(TOKEN_EXPIRY_KEY).await? else {
            tracing::debug!("no stored expiry, nothing to refresh");
            return Ok(());
        };
        let Ok(expiry) = parse_expiry(&raw_expiry) else {
            tracing::debug!(expiry = %raw_expiry, "unparsable stored expiry, nothing to refresh");
            return Ok(());
        };
        if !is_expired(expiry, self.clock.now()) {
            return Ok(());
        }

        let refresh_token = self
            .store
            .get(REFRESH_TOKEN_KEY)
            .await?
            .filter(|token| !token.trim().is_empty());
        let Some(refresh_token) = refresh_token else {
            tracing::debug!("access token expired but no refresh token is stored");
            return Ok(());
        };

        match self.api.refresh(&refresh_token).await {
            Ok(pair) => {
                self.install(&pair).await?;
                self.refresh_rejected.store(false, Ordering::SeqCst);
                tracing::info!(token = %token_preview(&pair.access_token), "access token refreshed");
                Ok(())
            }
            Err(AuthApiError::Transport(message)) => Err(ApplicationError::Transport(message)),
            Err(e) => {
                tracing::warn!(error = %e, "refresh rejected, logging out");
                self.clear_session().await;
                self.refresh_rejected.store(true, Ordering::SeqCst);
                Ok(())
            }
        }
    }

    /// Ends the session locally, notifying the backend on a best-effort basis.
    pub async fn logout(&self) {
        let _guard = self.serial.lock().await;
        self.clear_session().await;
        self.refresh_rejected.store(false, Ordering::SeqCst);
        tracing::info!("signed out");
    }

    /// The instant expiry checks are made against.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Re-arms the authorization header from a complete stored session.
    ///
    /// Returns the restored access token, if any.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the store cannot be read.
    pub async fn restore(&self) -> ApplicationResult<Option<String>> {
        let _guard = self.serial.lock().await;
        let Some(session) = self.read_session().await? else {
            return Ok(None);
        };

        self.authorization.arm(&session.auth_token).await;
        if let Some(provider) = &self.state_provider {
            provider.notify_user_authentication(&session.auth_token);
        }
        tracing::debug!(token = %token_preview(&session.auth_token), "restored stored session");
        Ok(Some(session.auth_token))
    }

    /// The stored session, if all three values are present.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the store cannot be read.
    pub async fn session(&self) -> ApplicationResult<Option<StoredSession>> {
        self.read_session().await
    }

    /// Current lifecycle state.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the store cannot be read.
    pub async fn state(&self) -> ApplicationResult<SessionState> {
        let session = self.read_session().await?;
        if session.is_none() && self.refresh_rejected.load(Ordering::SeqCst) {
            return Ok(SessionState::RefreshFailed);
        }
        Ok(SessionState::evaluate(session.as_ref(), self.clock.now()))
    }

    async fn read_session(&self) -> ApplicationResult<Option<StoredSession>> {
        let auth_token = self.store.get(AUTH_TOKEN_KEY).await?;
        let refresh_token = self.store.get(REFRESH_TOKEN_KEY).await?;
        let token_expiry = self.store.get(TOKEN_EXPIRY_KEY).await?;
        Ok(StoredSession::from_slots(
            auth_token,
            refresh_token,
            token_expiry,
        ))
    }

    /// Persists a freshly issued pair, arms the header and publishes it.
    async fn install(&self, pair: &TokenPair) -> ApplicationResult<()> {
        let session = StoredSession::from_pair(pair, self.clock.now())?;
        self.store.set_many(&session.to_slots()).await?;
        self.authorization.arm(&session.auth_token).await;
        if let Some(provider) = &self.state_provider {
            provider.notify_user_authentication(&session.auth_token);
        }
        Ok(())
    }

    /// Logout without taking the serial lock. Never fails.
    async fn clear_session(&self) {
        if let Err(e) = self.api.logout().await {
            tracing::warn!(error = %e, "backend logout failed, clearing session anyway");
        }
        if let Err(e) = self.store.remove_many(&SESSION_KEYS).await {
            tracing::warn!(error = %e, "could not clear stored session");
        }
        self.authorization.disarm().await;
        if let Some(provider) = &self.state_provider {
            provider.notify_logout();
        }
    }
}
