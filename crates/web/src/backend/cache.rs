//! Cache types for backend responses that are the same for every user.

use streamflix_core::MovieId;

use crate::models::Movie;

/// Cache key for shared content metadata.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Movie(MovieId),
    Catalogue,
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Movie(Box<Movie>),
    Catalogue(Vec<Movie>),
}
