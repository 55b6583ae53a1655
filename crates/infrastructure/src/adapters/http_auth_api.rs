//! Token-issuing backend over HTTP using reqwest.
//!
//! Every request goes through [`HttpAuthApi::decorate`], which adds the
//! bearer token currently armed in the shared [`RequestAuthorization`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Url};
use serde::Serialize;
use warden_application::ports::{AuthApi, AuthApiError};
use warden_application::RequestAuthorization;
use warden_domain::{ClientSettings, Credentials, TokenPair};

/// User-Agent sent with every request.
const USER_AGENT: &str = concat!("Warden/", env!("CARGO_PKG_VERSION"));

/// Errors raised while building the adapter.
#[derive(Debug, thiserror::Error)]
pub enum HttpSetupError {
    /// An endpoint URL could not be built from the settings.
    #[error("invalid endpoint URL {url}: {message}")]
    InvalidUrl {
        /// The URL that failed to parse.
        url: String,
        /// Parser message.
        message: String,
    },

    /// The underlying HTTP client could not be created.
    #[error("could not create HTTP client: {0}")]
    Client(String),
}

/// Body of the refresh request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

/// HTTP implementation of the `AuthApi` port.
#[derive(Debug, Clone)]
pub struct HttpAuthApi {
    client: Client,
    base_url: String,
    login_url: Url,
    refresh_url: Url,
    logout_url: Url,
    authorization: RequestAuthorization,
}

impl HttpAuthApi {
    /// Creates an adapter for the backend described by `settings`.
    ///
    /// # Errors
    ///
    /// Returns an error if an endpoint URL is invalid or the client cannot be
    /// created.
    pub fn new(
        settings: &ClientSettings,
        authorization: RequestAuthorization,
    ) -> Result<Self, HttpSetupError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| HttpSetupError::Client(e.to_string()))?;

        Self::with_client(client, settings, authorization)
    }

    /// Creates an adapter around a preconfigured reqwest client.
    ///
    /// # Errors
    ///
    /// Returns an error if an endpoint URL is invalid.
    pub fn with_client(
        client: Client,
        settings: &ClientSettings,
        authorization: RequestAuthorization,
    ) -> Result<Self, HttpSetupError> {
        let base_url = settings.base_url.trim_end_matches('/').to_string();
        Ok(Self {
            login_url: endpoint(&base_url, &settings.login_path)?,
            refresh_url: endpoint(&base_url, &settings.refresh_path)?,
            logout_url: endpoint(&base_url, &settings.logout_path)?,
            base_url,
            client,
            authorization,
        })
    }

    /// Issues an authorized GET against any path of the backend.
    ///
    /// # Errors
    ///
    /// Returns `Transport` if the URL is invalid or no response arrives. The
    /// status is not checked.
    pub async fn get(&self, path: &str) -> Result<reqwest::Response, AuthApiError> {
        let url = endpoint(&self.base_url, path)
            .map_err(|e| AuthApiError::Transport(e.to_string()))?;
        self.decorate(self.client.get(url))
            .await
            .send()
            .await
            .map_err(|e| AuthApiError::Transport(e.to_string()))
    }

    /// Adds the armed bearer token, if any.
    async fn decorate(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.authorization.header_value().await {
            Some(value) => builder.header(reqwest::header::AUTHORIZATION, value),
            None => builder,
        }
    }

    /// Posts a JSON body and reads a token pair back.
    async fn exchange<B: Serialize + Sync>(
        &self,
        url: &Url,
        body: &B,
    ) -> Result<TokenPair, AuthApiError> {
        let response = self
            .decorate(self.client.post(url.clone()).json(body))
            .await
            .send()
            .await
            .map_err(|e| AuthApiError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::debug!(%url, status = status.as_u16(), "token request rejected");
            return Err(AuthApiError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| AuthApiError::Transport(e.to_string()))?;
        parse_token_pair(&bytes)
    }
}

/// Joins the base URL and an endpoint path.
fn endpoint(base_url: &str, path: &str) -> Result<Url, HttpSetupError> {
    let url = if path.starts_with('/') {
        format!("{base_url}{path}")
    } else {
        format!("{base_url}/{path}")
    };
    Url::parse(&url).map_err(|e| HttpSetupError::InvalidUrl {
        url,
        message: e.to_string(),
    })
}

/// Decodes a success body. An empty or `null` body is not a token pair.
fn parse_token_pair(bytes: &[u8]) -> Result<TokenPair, AuthApiError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(AuthApiError::InvalidResponse("empty body".to_string()));
    }
    serde_json::from_slice::<Option<TokenPair>>(bytes)
        .map_err(|e| AuthApiError::InvalidResponse(e.to_string()))?
        .ok_or_else(|| AuthApiError::InvalidResponse("null body".to_string()))
}

#[async_trait]
impl AuthApi for HttpAuthApi {
    async fn login(&self, credentials: &Credentials) -> Result<TokenPair, AuthApiError> {
        self.exchange(&self.login_url, credentials).await
    }

    async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AuthApiError> {
        self.exchange(&self.refresh_url, &RefreshRequest { refresh_token })
            .await
    }

    async fn logout(&self) -> Result<(), AuthApiError> {
        let response = self
            .decorate(self.client.post(self.logout_url.clone()))
            .await
            .send()
            .await
            .map_err(|e| AuthApiError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(AuthApiError::Rejected {
                status: status.as_u16(),
                message: String::new(),
            })
        }
    }
}
