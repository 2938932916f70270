//! Content backend REST client.
//!
//! # Architecture
//!
//! - The backend is the source of truth for users, movies, and favorites.
//!   Nothing is synced locally; every page render calls it directly.
//! - Requests on behalf of a user carry the provider-issued access token as a
//!   bearer credential.
//! - Movie metadata is shared across users and cached in memory via `moka`
//!   (5 minute TTL). User-specific data (current user, favorites) is never cached.
//!
//! # Endpoints
//!
//! ```text
//! POST   /api/signup        - Create a user  {email, password, firstName, lastName}
//! GET    /api/current       - The user owning the bearer token
//! GET    /api/favorites     - The user's saved movies, in saved order
//! GET    /api/movies        - Catalogue listing
//! GET    /api/movies/{id}   - One movie
//! POST   /api/favorite      - Save a movie     {movieId}
//! DELETE /api/favorite      - Unsave a movie   {movieId}
//! ```

mod cache;
mod client;

pub use client::BackendClient;

use thiserror::Error;

/// Errors that can occur when talking to the content backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The bearer token was missing, expired, or revoked.
    #[error("Unauthorized")]
    Unauthorized,

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The backend rejected the request (e.g. duplicate account on signup).
    #[error("Backend returned {status}: {message}")]
    Api {
        /// HTTP status code of the response.
        status: u16,
        /// Message from the response body, or a generic one if none was given.
        message: String,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Endpoint URL could not be built.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl BackendError {
    /// Message suitable for showing to the user who triggered the request.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Api { message, .. } => message.clone(),
            Self::Unauthorized => "Your session has expired".to_string(),
            Self::NotFound(_) => "Not found".to_string(),
            Self::Http(_) | Self::Parse(_) | Self::InvalidUrl(_) => {
                "Service unavailable, please try again".to_string()
            }
        }
    }
}
