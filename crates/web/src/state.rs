//! Application state shared across handlers.

use std::sync::Arc;

use crate::backend::BackendClient;
use crate::config::WebConfig;
use crate::http::build_client;
use crate::provider::AuthProviderClient;

/// Error creating the application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// configuration and the clients for the remote services.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: WebConfig,
    backend: BackendClient,
    provider: AuthProviderClient,
}

impl AppState {
    /// Create a new application state.
    ///
    /// Both remote clients share one `reqwest` connection pool.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: WebConfig) -> Result<Self, StateError> {
        let http = build_client(config.remote.http_timeout)?;
        let backend = BackendClient::new(http.clone(), config.remote.api_url.clone());
        let provider = AuthProviderClient::new(http, config.remote.auth_url.clone());

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                backend,
                provider,
            }),
        })
    }

    /// Get a reference to the web configuration.
    #[must_use]
    pub fn config(&self) -> &WebConfig {
        &self.inner.config
    }

    /// Get a reference to the content backend client.
    #[must_use]
    pub fn backend(&self) -> &BackendClient {
        &self.inner.backend
    }

    /// Get a reference to the authentication provider client.
    #[must_use]
    pub fn provider(&self) -> &AuthProviderClient {
        &self.inner.provider
    }
}
