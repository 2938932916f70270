//! Pieces shared by the pages that list movies.

use secrecy::SecretString;
use serde::Deserialize;
use tower_sessions::Session;

use streamflix_core::MovieId;

use crate::backend::BackendError;
use crate::error::{Result, recover_unauthorized};
use crate::models::Movie;
use crate::state::AppState;

/// Query string of a movie list page.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// Movie whose detail overlay is open.
    pub info: Option<String>,
}

impl ListQuery {
    /// The requested overlay id, ignoring a blank `?info=`.
    #[must_use]
    pub fn info_id(&self) -> Option<MovieId> {
        self.info
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(MovieId::new)
    }
}

/// Resolve the movie for the detail overlay.
///
/// The movie is looked up in the list already on the page first and only
/// fetched when it is not there. An unknown id renders the page without an
/// overlay.
pub async fn overlay_movie(
    state: &AppState,
    session: &Session,
    token: &SecretString,
    listed: &[Movie],
    id: Option<MovieId>,
) -> Result<Option<Movie>> {
    let Some(id) = id else {
        return Ok(None);
    };

    if let Some(found) = listed.iter().find(|movie| movie.id == id) {
        return Ok(Some(found.clone()));
    }

    match state.backend().movie(token, &id).await {
        Ok(movie) => Ok(Some(movie)),
        Err(BackendError::NotFound(_)) => {
            tracing::debug!(movie_id = %id, "Overlay movie not found");
            Ok(None)
        }
        Err(e) => recover_unauthorized(session, Err(e)).await,
    }
}
