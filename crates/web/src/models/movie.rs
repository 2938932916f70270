//! Content references as served by the content backend.

use serde::{Deserialize, Serialize};

use streamflix_core::MovieId;

/// A playable title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub video_url: String,
    #[serde(default)]
    pub thumbnail_url: String,
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    pub duration: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_backend_movie() {
        let movie: Movie = serde_json::from_str(
            r#"{"id":"m1","title":"Big Buck Bunny","description":"A rabbit.","videoUrl":"https://cdn.example.com/bbb.mp4","thumbnailUrl":"https://cdn.example.com/bbb.jpg","genre":"Comedy","duration":"10 minutes"}"#,
        )
        .unwrap();

        assert_eq!(movie.id, MovieId::new("m1"));
        assert_eq!(movie.thumbnail_url, "https://cdn.example.com/bbb.jpg");
        assert_eq!(movie.duration, "10 minutes");
    }
}
