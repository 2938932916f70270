//! Session-related types.
//!
//! Types stored in the server-side session once the authentication provider
//! has issued a session for the user.

use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use streamflix_core::{Email, UserId};

/// Session-stored identity of the signed-in user.
///
/// Holds the provider-issued access token used as a bearer credential on
/// every backend call made on the user's behalf.
#[derive(Clone, Serialize, Deserialize)]
pub struct CurrentSession {
    /// Backend user ID.
    pub user_id: UserId,
    /// User's email address.
    pub email: Email,
    /// First name captured at sign-in time (display only).
    pub first_name: String,
    /// Last name captured at sign-in time (display only).
    pub last_name: String,
    #[serde(with = "secret_token")]
    access_token: SecretString,
    /// When the provider-issued token stops being valid.
    pub expires_at: DateTime<Utc>,
}

impl CurrentSession {
    #[must_use]
    pub const fn new(
        user_id: UserId,
        email: Email,
        first_name: String,
        last_name: String,
        access_token: SecretString,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id,
            email,
            first_name,
            last_name,
            access_token,
            expires_at,
        }
    }

    /// Bearer token for backend requests.
    #[must_use]
    pub const fn access_token(&self) -> &SecretString {
        &self.access_token
    }

    /// Whether the provider token has expired at `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// Name shown in the navigation bar and on the profile picker.
    #[must_use]
    pub fn display_name(&self) -> String {
        let first = self.first_name.trim();
        if first.is_empty() {
            self.email.local_part().to_string()
        } else {
            first.to_string()
        }
    }
}

impl std::fmt::Debug for CurrentSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CurrentSession")
            .field("user_id", &self.user_id)
            .field("email", &self.email)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("access_token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// The session store needs the token in clear; everywhere else it stays wrapped.
mod secret_token {
    use secrecy::{ExposeSecret, SecretString};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(token: &SecretString, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(token.expose_secret())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<SecretString, D::Error> {
        String::deserialize(deserializer).map(SecretString::from)
    }
}

/// Session keys for authentication data.
pub mod keys {
    /// Key for storing the current signed-in user.
    pub const CURRENT_SESSION: &str = "current_session";
}
