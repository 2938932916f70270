//! Session guard extractors.
//!
//! Every page decides before rendering whether it needs a session
//! (`RequireSession`), must not have one (`GuestOnly`), or does not care
//! (`OptionalSession`). Sessions whose provider token has expired are treated
//! as absent and removed on first sight.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use chrono::Utc;
use tower_sessions::Session;

use crate::models::{CurrentSession, session_keys};

/// Where guests are sent when a page needs a session.
pub const AUTH_PATH: &str = "/auth";

/// Where signed-in users are sent when they open a guest-only page.
pub const HOME_PATH: &str = "/";

/// Extractor that requires a live session.
///
/// If there is none, HTML requests are redirected to the auth page and API
/// requests get `401`.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireSession(current): RequireSession,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", current.display_name())
/// }
/// ```
pub struct RequireSession(pub CurrentSession);

/// Error returned when a session is required but missing.
#[derive(Debug)]
pub enum SessionRejection {
    /// Redirect to the auth page (for HTML requests).
    RedirectToAuth,
    /// Unauthorized response (for API requests).
    Unauthorized,
}

impl IntoResponse for SessionRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToAuth => Redirect::to(AUTH_PATH).into_response(),
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for RequireSession
where
    S: Send + Sync,
{
    type Rejection = SessionRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(SessionRejection::Unauthorized)?;

        live_session(session).await.map(Self).ok_or_else(|| {
            if parts.uri.path().starts_with("/api/") {
                SessionRejection::Unauthorized
            } else {
                SessionRejection::RedirectToAuth
            }
        })
    }
}

/// Extractor that only admits requests without a live session.
///
/// Signed-in users are redirected to the home page.
pub struct GuestOnly;

impl<S> FromRequestParts<S> for GuestOnly
where
    S: Send + Sync,
{
    type Rejection = Redirect;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<Session>() {
            Some(session) if live_session(session).await.is_some() => {
                Err(Redirect::to(HOME_PATH))
            }
            _ => Ok(Self),
        }
    }
}

/// Extractor that optionally gets the current session.
pub struct OptionalSession(pub Option<CurrentSession>);

impl<S> FromRequestParts<S> for OptionalSession
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let current = match parts.extensions.get::<Session>() {
            Some(session) => live_session(session).await,
            None => None,
        };

        Ok(Self(current))
    }
}

/// Read the stored session, discarding it if the provider token has expired.
async fn live_session(session: &Session) -> Option<CurrentSession> {
    let current: CurrentSession = match session
        .get(session_keys::CURRENT_SESSION)
        .await
    {
        Ok(current) => current?,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read session");
            return None;
        }
    };

    if current.is_expired_at(Utc::now()) {
        tracing::debug!(user_id = %current.user_id, "Session token expired");
        if let Err(e) = clear_current_session(session).await {
            tracing::warn!(error = %e, "Failed to clear expired session");
        }
        return None;
    }

    Some(current)
}

/// Helper to store the current session after sign-in.
///
/// The session id is cycled first so a pre-login cookie cannot be reused.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_session(
    session: &Session,
    current: &CurrentSession,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(session_keys::CURRENT_SESSION, current).await
}

/// Helper to drop the current session (sign-out or expiry).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_session(
    session: &Session,
) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use axum::http::Request;
    use chrono::Duration;
    use secrecy::SecretString;
    use tower_sessions::MemoryStore;

    use streamflix_core::{Email, UserId};

    use super::*;

    fn current(expires_in: Duration) -> CurrentSession {
        CurrentSession::new(
            UserId::new("u1"),
            Email::parse("ada@example.com").unwrap(),
            "Ada".to_string(),
            "Lovelace".to_string(),
            SecretString::from("tok_1"),
            Utc::now() + expires_in,
        )
    }

    fn parts_with(path: &str, session: Option<Session>) -> Parts {
        let (mut parts, ()) = Request::builder().uri(path).body(()).unwrap().into_parts();
        if let Some(session) = session {
            parts.extensions.insert(session);
        }
        parts
    }

    fn new_session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    #[tokio::test]
    async fn test_require_session_redirects_guests() {
        let mut parts = parts_with("/account", Some(new_session()));
        let rejection = RequireSession::from_request_parts(&mut parts, &())
            .await
            .err()
            .unwrap();
        assert!(matches!(rejection, SessionRejection::RedirectToAuth));
    }

    #[tokio::test]
    async fn test_require_session_rejects_api_with_401() {
        let mut parts = parts_with("/api/anything", Some(new_session()));
        let rejection = RequireSession::from_request_parts(&mut parts, &())
            .await
            .err()
            .unwrap();
        assert!(matches!(rejection, SessionRejection::Unauthorized));
    }

    #[tokio::test]
    async fn test_require_session_accepts_live_session() {
        let session = new_session();
        set_current_session(&session, &current(Duration::hours(1)))
            .await
            .unwrap();

        let mut parts = parts_with("/account", Some(session));
        let RequireSession(found) = RequireSession::from_request_parts(&mut parts, &())
            .await
            .ok()
            .unwrap();
        assert_eq!(found.user_id.as_str(), "u1");
    }

    #[tokio::test]
    async fn test_expired_session_is_cleared() {
        let session = new_session();
        set_current_session(&session, &current(Duration::seconds(-5)))
            .await
            .unwrap();

        let mut parts = parts_with("/favorites", Some(session.clone()));
        assert!(RequireSession::from_request_parts(&mut parts, &()).await.is_err());

        let stored: Option<CurrentSession> =
            session.get(session_keys::CURRENT_SESSION).await.unwrap();
        assert!(stored.is_none());
    }

    #[tokio::test]
    async fn test_guest_only_redirects_signed_in_users_home() {
        let session = new_session();
        set_current_session(&session, &current(Duration::hours(1)))
            .await
            .unwrap();

        let mut parts = parts_with("/auth", Some(session));
        let redirect = GuestOnly::from_request_parts(&mut parts, &())
            .await
            .err()
            .unwrap();
        let response = redirect.into_response();
        assert_eq!(response.headers()["location"], "/");
    }

    #[tokio::test]
    async fn test_guest_only_admits_guests() {
        let mut parts = parts_with("/auth", Some(new_session()));
        assert!(GuestOnly::from_request_parts(&mut parts, &()).await.is_ok());
    }

    #[tokio::test]
    async fn test_optional_session() {
        let mut parts = parts_with("/", None);
        let OptionalSession(found) = OptionalSession::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert!(found.is_none());
    }
}
