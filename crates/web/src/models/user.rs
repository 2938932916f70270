//! User records as served by the content backend.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use streamflix_core::{Email, MovieId, UserId};

/// A user as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub email: Email,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    /// Saved content references, in the order the user added them.
    #[serde(default)]
    pub favorite_ids: Vec<MovieId>,
}

impl User {
    /// First and last name joined by a space, or the email local part when
    /// the backend has no name on file.
    #[must_use]
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let full = full.trim();
        if full.is_empty() {
            self.email.local_part().to_string()
        } else {
            full.to_string()
        }
    }

    /// Whether `movie_id` is in the user's favorites.
    #[must_use]
    pub fn has_favorite(&self, movie_id: &MovieId) -> bool {
        self.favorite_ids.contains(movie_id)
    }
}

/// A validated sign-up submission on its way to the backend.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: Email,
    pub password: SecretString,
    pub first_name: String,
    pub last_name: String,
}
