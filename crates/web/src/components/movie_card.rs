//! Movie tiles and the detail overlay.

use streamflix_core::MovieId;

use crate::models::Movie;

/// One tile in a movie list.
#[derive(Debug, Clone)]
pub struct MovieCard {
    pub movie: Movie,
    /// Decides whether the tile offers "add" or "remove".
    pub is_favorite: bool,
}

impl MovieCard {
    /// Tiles for `movies` in the order given, marking those in `favorite_ids`.
    #[must_use]
    pub fn list(movies: Vec<Movie>, favorite_ids: &[MovieId]) -> Vec<Self> {
        movies
            .into_iter()
            .map(|movie| {
                let is_favorite = favorite_ids.contains(&movie.id);
                Self { movie, is_favorite }
            })
            .collect()
    }

    /// Tiles for a list that only contains favorites.
    #[must_use]
    pub fn favorites(movies: Vec<Movie>) -> Vec<Self> {
        movies
            .into_iter()
            .map(|movie| Self {
                movie,
                is_favorite: true,
            })
            .collect()
    }
}

/// A titled movie list with an optional detail overlay.
///
/// `path` is the page the list lives on: info links and favorite toggles
/// return there.
#[derive(Debug, Clone)]
pub struct MovieList {
    pub label: &'static str,
    pub path: &'static str,
    pub cards: Vec<MovieCard>,
    pub overlay: Option<Movie>,
}
