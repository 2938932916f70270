//! Authentication provider client.
//!
//! The provider owns credential checking and session token lifecycle. This
//! site only exchanges an email/password pair for an access token and tells
//! the provider when the user signs out.
//!
//! # Endpoints
//!
//! ```text
//! POST /credentials  {email, password} -> {accessToken, expiresAt, user}
//! POST /signout      (bearer token)    -> 2xx
//! ```

use std::sync::Arc;

use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;
use url::Url;

use streamflix_core::Email;

use crate::http::{endpoint, error_message, log_excerpt};
use crate::models::{CurrentSession, User};

/// Message used when the provider rejects credentials without saying why.
const DEFAULT_REJECTION: &str = "Invalid email or password";

/// Errors that can occur when talking to the authentication provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider refused to issue a session.
    #[error("Credentials rejected: {0}")]
    Rejected(String),

    /// The provider answered with an unexpected status.
    #[error("Provider returned {status}")]
    Unexpected {
        /// HTTP status code of the response.
        status: u16,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Endpoint URL could not be built.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// A session issued by the provider.
pub struct IssuedSession {
    pub access_token: SecretString,
    pub expires_at: DateTime<Utc>,
    pub user: User,
}

impl IssuedSession {
    /// Convert into the session-stored identity.
    #[must_use]
    pub fn into_current_session(self) -> CurrentSession {
        CurrentSession::new(
            self.user.id,
            self.user.email,
            self.user.first_name,
            self.user.last_name,
            self.access_token,
            self.expires_at,
        )
    }
}

#[derive(Serialize)]
struct CredentialsRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CredentialsResponse {
    access_token: String,
    expires_at: DateTime<Utc>,
    user: User,
}

/// Client for the credential flow of the authentication provider.
#[derive(Clone)]
pub struct AuthProviderClient {
    inner: Arc<AuthProviderClientInner>,
}

struct AuthProviderClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl AuthProviderClient {
    /// Create a new provider client rooted at `base_url`.
    #[must_use]
    pub fn new(client: reqwest::Client, base_url: Url) -> Self {
        Self {
            inner: Arc::new(AuthProviderClientInner { client, base_url }),
        }
    }

    /// Exchange credentials for a session.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Rejected` when the provider refuses the
    /// credentials, with the provider's message if it sent one.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn sign_in(
        &self,
        email: &Email,
        password: &SecretString,
    ) -> Result<IssuedSession, ProviderError> {
        let url = endpoint(&self.inner.base_url, "credentials")?;
        let body = CredentialsRequest {
            email: email.as_str(),
            password: password.expose_secret(),
        };

        let response = self.inner.client.post(url).json(&body).send().await?;
        let status = response.status();
        let response_text = response.text().await?;

        if status.is_client_error() {
            let message =
                error_message(&response_text).unwrap_or_else(|| DEFAULT_REJECTION.to_string());
            return Err(ProviderError::Rejected(message));
        }

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %log_excerpt(&response_text),
                "Authentication provider returned non-success status"
            );
            return Err(ProviderError::Unexpected {
                status: status.as_u16(),
            });
        }

        let parsed: CredentialsResponse = serde_json::from_str(&response_text)?;

        Ok(IssuedSession {
            access_token: SecretString::from(parsed.access_token),
            expires_at: parsed.expires_at,
            user: parsed.user,
        })
    }

    /// Revoke a session token.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails. A `401` means the token was
    /// already dead and counts as success.
    #[instrument(skip_all)]
    pub async fn sign_out(&self, token: &SecretString) -> Result<(), ProviderError> {
        let url = endpoint(&self.inner.base_url, "signout")?;
        let response = self
            .inner
            .client
            .post(url)
            .bearer_auth(token.expose_secret())
            .send()
            .await?;

        let status = response.status();
        if status.is_success() || status == StatusCode::UNAUTHORIZED {
            Ok(())
        } else {
            Err(ProviderError::Unexpected {
                status: status.as_u16(),
            })
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_response_shape() {
        let parsed: CredentialsResponse = serde_json::from_str(
            r#"{"accessToken":"tok_1","expiresAt":"2030-01-01T00:00:00Z","user":{"id":"u1","email":"ada@example.com","firstName":"Ada","lastName":"Lovelace"}}"#,
        )
        .unwrap();

        let issued = IssuedSession {
            access_token: SecretString::from(parsed.access_token),
            expires_at: parsed.expires_at,
            user: parsed.user,
        };
        let current = issued.into_current_session();

        assert_eq!(current.user_id.as_str(), "u1");
        assert_eq!(current.first_name, "Ada");
        assert_eq!(current.access_token().expose_secret(), "tok_1");
    }

    #[test]
    fn test_provider_error_display() {
        let err = ProviderError::Rejected("Invalid email or password".to_string());
        assert_eq!(
            err.to_string(),
            "Credentials rejected: Invalid email or password"
        );

        let err = ProviderError::Unexpected { status: 503 };
        assert_eq!(err.to_string(), "Provider returned 503");
    }
}
