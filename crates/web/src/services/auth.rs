//! Credential submission flow.
//!
//! Sign-in goes straight to the provider. Sign-up creates the account on the
//! backend first and only asks the provider for a session once that succeeded.

use tracing::instrument;

use crate::backend::{BackendClient, BackendError};
use crate::components::Alert;
use crate::forms::Credentials;
use crate::models::CurrentSession;
use crate::provider::{AuthProviderClient, ProviderError};

/// Title of the alert shown for any failed submission.
pub const FAILURE_TITLE: &str = "Incorrect Credentials";

const UNAVAILABLE: &str = "Service unavailable, please try again";

/// Why a valid submission did not produce a session.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthFailure {
    /// The backend refused to create the account.
    #[error("signup rejected: {0}")]
    Signup(String),
    /// The provider refused to issue a session.
    #[error("sign-in rejected: {0}")]
    Rejected(String),
    /// A remote service could not be reached or misbehaved.
    #[error("authentication service unavailable")]
    Unavailable,
}

impl AuthFailure {
    /// The combined message surfaced to the user.
    #[must_use]
    pub fn alert(&self) -> Alert {
        let description = match self {
            Self::Signup(message) | Self::Rejected(message) => message.as_str(),
            Self::Unavailable => UNAVAILABLE,
        };
        Alert::error(FAILURE_TITLE, description)
    }
}

impl From<ProviderError> for AuthFailure {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Rejected(message) => Self::Rejected(message),
            other => {
                tracing::error!(error = %other, "Session issuance failed");
                Self::Unavailable
            }
        }
    }
}

impl From<BackendError> for AuthFailure {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Api { status, message } if status < 500 => Self::Signup(message),
            rejected @ (BackendError::Unauthorized | BackendError::NotFound(_)) => {
                Self::Signup(rejected.user_message())
            }
            other => {
                tracing::error!(error = %other, "Account creation failed");
                Self::Unavailable
            }
        }
    }
}

/// Run the credential flow for `credentials`.
///
/// # Errors
///
/// Returns an [`AuthFailure`] if account creation or session issuance fails.
/// A failed sign-up never reaches the provider.
#[instrument(skip_all, fields(mode = credentials.mode().as_str(), email = %credentials.email()))]
pub async fn authenticate(
    backend: &BackendClient,
    provider: &AuthProviderClient,
    credentials: &Credentials,
) -> Result<CurrentSession, AuthFailure> {
    if let Credentials::SignUp(new_user) = credentials {
        match backend.signup(new_user).await {
            Ok(user) => tracing::info!(user_id = %user.id, "Account created"),
            Err(err) => {
                tracing::warn!(error = %err, "Signup failed");
                return Err(AuthFailure::from(err));
            }
        }
    }

    let issued = provider
        .sign_in(credentials.email(), credentials.password())
        .await
        .inspect_err(|err| tracing::warn!(error = %err, "Sign-in failed"))?;

    let session = issued.into_current_session();
    tracing::info!(user_id = %session.user_id, "Session issued");
    Ok(session)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::components::AlertKind;

    #[test]
    fn test_alert_combines_title_and_remote_message() {
        let alert = AuthFailure::Signup("Email taken".to_string()).alert();
        assert_eq!(alert.kind, AlertKind::Error);
        assert_eq!(alert.title, "Incorrect Credentials");
        assert_eq!(alert.description, "Email taken");
    }

    #[test]
    fn test_unavailable_alert() {
        let alert = AuthFailure::Unavailable.alert();
        assert_eq!(alert.description, UNAVAILABLE);
    }

    #[test]
    fn test_provider_rejection_keeps_message() {
        let failure = AuthFailure::from(ProviderError::Rejected("Nope".to_string()));
        assert_eq!(failure, AuthFailure::Rejected("Nope".to_string()));

        let failure = AuthFailure::from(ProviderError::Unexpected { status: 500 });
        assert_eq!(failure, AuthFailure::Unavailable);
    }

    #[test]
    fn test_backend_outage_is_not_a_signup_rejection() {
        let failure = AuthFailure::from(BackendError::Api {
            status: 409,
            message: "Email is already in use".to_string(),
        });
        assert_eq!(failure, AuthFailure::Signup("Email is already in use".to_string()));

        let failure = AuthFailure::from(BackendError::Api {
            status: 500,
            message: "Request failed with status 500".to_string(),
        });
        assert_eq!(failure, AuthFailure::Unavailable);

        let failure = AuthFailure::from(BackendError::Parse(
            serde_json::from_str::<u8>("nope").unwrap_err(),
        ));
        assert_eq!(failure, AuthFailure::Unavailable);
    }
}
