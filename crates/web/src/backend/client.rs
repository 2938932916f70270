//! Backend REST client implementation.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use reqwest::{Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, instrument};
use url::Url;

use streamflix_core::MovieId;

use super::BackendError;
use super::cache::{CacheKey, CacheValue};
use crate::http::{endpoint, error_message, log_excerpt};
use crate::models::{Movie, NewUser, User};

/// Client for the content backend.
///
/// Cheap to clone; all clones share one connection pool and one cache.
#[derive(Clone)]
pub struct BackendClient {
    inner: Arc<BackendClientInner>,
}

struct BackendClientInner {
    client: reqwest::Client,
    base_url: Url,
    cache: Cache<CacheKey, CacheValue>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SignupRequest<'a> {
    email: &'a str,
    password: &'a str,
    first_name: &'a str,
    last_name: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FavoriteRequest<'a> {
    movie_id: &'a MovieId,
}

impl BackendClient {
    /// Create a new backend client rooted at `base_url`.
    #[must_use]
    pub fn new(client: reqwest::Client, base_url: Url) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Self {
            inner: Arc::new(BackendClientInner {
                client,
                base_url,
                cache,
            }),
        }
    }

    /// Send a request and decode a JSON response.
    async fn request<B, T>(
        &self,
        method: Method,
        url: Url,
        token: Option<&SecretString>,
        body: Option<&B>,
    ) -> Result<T, BackendError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let mut request = self.inner.client.request(method.clone(), url.clone());
        if let Some(token) = token {
            request = request.bearer_auth(token.expose_secret());
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let response_text = response.text().await?;

        if !status.is_success() {
            return Err(map_error_status(&method, &url, status, &response_text));
        }

        serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                method = %method,
                path = url.path(),
                body = %log_excerpt(&response_text),
                "Failed to parse backend response"
            );
            BackendError::Parse(e)
        })
    }

    fn url(&self, path: &str) -> Result<Url, BackendError> {
        Ok(endpoint(&self.inner.base_url, path)?)
    }

    /// URL for `/api/movies/{id}` with the id percent-encoded as one segment.
    fn movie_url(&self, id: &MovieId) -> Result<Url, BackendError> {
        let mut url = self.url("api/movies")?;
        url.path_segments_mut()
            .map_err(|()| BackendError::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .push(id.as_str());
        Ok(url)
    }

    // =========================================================================
    // Users
    // =========================================================================

    /// Create a user account.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::Api` with the backend's message when the account
    /// is rejected (e.g. the email is already registered).
    #[instrument(skip(self, new_user), fields(email = %new_user.email))]
    pub async fn signup(&self, new_user: &NewUser) -> Result<User, BackendError> {
        let body = SignupRequest {
            email: new_user.email.as_str(),
            password: new_user.password.expose_secret(),
            first_name: &new_user.first_name,
            last_name: &new_user.last_name,
        };

        self.request(Method::POST, self.url("api/signup")?, None, Some(&body))
            .await
    }

    /// Fetch the user that owns `token`.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::Unauthorized` if the token is no longer accepted.
    #[instrument(skip_all)]
    pub async fn current_user(&self, token: &SecretString) -> Result<User, BackendError> {
        self.request::<(), _>(Method::GET, self.url("api/current")?, Some(token), None)
            .await
    }

    // =========================================================================
    // Favorites
    // =========================================================================

    /// Fetch the saved movies of the user that owns `token`, in saved order.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the token is rejected.
    #[instrument(skip_all)]
    pub async fn favorites(&self, token: &SecretString) -> Result<Vec<Movie>, BackendError> {
        self.request::<(), _>(Method::GET, self.url("api/favorites")?, Some(token), None)
            .await
    }

    /// Save a movie to the user's favorites. Returns the updated user.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the movie does not exist.
    #[instrument(skip(self, token), fields(movie_id = %movie_id))]
    pub async fn add_favorite(
        &self,
        token: &SecretString,
        movie_id: &MovieId,
    ) -> Result<User, BackendError> {
        let body = FavoriteRequest { movie_id };
        self.request(Method::POST, self.url("api/favorite")?, Some(token), Some(&body))
            .await
    }

    /// Remove a movie from the user's favorites. Returns the updated user.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the movie does not exist.
    #[instrument(skip(self, token), fields(movie_id = %movie_id))]
    pub async fn remove_favorite(
        &self,
        token: &SecretString,
        movie_id: &MovieId,
    ) -> Result<User, BackendError> {
        let body = FavoriteRequest { movie_id };
        self.request(
            Method::DELETE,
            self.url("api/favorite")?,
            Some(token),
            Some(&body),
        )
        .await
    }

    // =========================================================================
    // Movies
    // =========================================================================

    /// Fetch the catalogue.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the token is rejected.
    #[instrument(skip_all)]
    pub async fn movies(&self, token: &SecretString) -> Result<Vec<Movie>, BackendError> {
        if let Some(CacheValue::Catalogue(movies)) =
            self.inner.cache.get(&CacheKey::Catalogue).await
        {
            debug!("Cache hit for catalogue");
            return Ok(movies);
        }

        let movies: Vec<Movie> = self
            .request::<(), _>(Method::GET, self.url("api/movies")?, Some(token), None)
            .await?;

        self.inner
            .cache
            .insert(CacheKey::Catalogue, CacheValue::Catalogue(movies.clone()))
            .await;

        Ok(movies)
    }

    /// Fetch a single movie.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::NotFound` if the movie does not exist.
    #[instrument(skip(self, token), fields(movie_id = %movie_id))]
    pub async fn movie(
        &self,
        token: &SecretString,
        movie_id: &MovieId,
    ) -> Result<Movie, BackendError> {
        let cache_key = CacheKey::Movie(movie_id.clone());

        if let Some(CacheValue::Movie(movie)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for movie");
            return Ok(*movie);
        }

        let movie: Movie = self
            .request::<(), _>(Method::GET, self.movie_url(movie_id)?, Some(token), None)
            .await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Movie(Box::new(movie.clone())))
            .await;

        Ok(movie)
    }

    // =========================================================================
    // Health
    // =========================================================================

    /// Whether the backend answers HTTP at all (any status counts).
    pub async fn is_reachable(&self) -> bool {
        match self.inner.client.get(self.inner.base_url.clone()).send().await {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!(error = %e, "Backend unreachable");
                false
            }
        }
    }
}

/// Map a non-success status to a `BackendError`.
fn map_error_status(method: &Method, url: &Url, status: StatusCode, body: &str) -> BackendError {
    match status {
        StatusCode::UNAUTHORIZED => BackendError::Unauthorized,
        StatusCode::NOT_FOUND => BackendError::NotFound(url.path().to_string()),
        _ => {
            if status.is_server_error() {
                tracing::error!(
                    status = %status,
                    method = %method,
                    path = url.path(),
                    body = %log_excerpt(body),
                    "Backend returned server error"
                );
            } else {
                tracing::debug!(status = %status, path = url.path(), "Backend rejected request");
            }
            BackendError::Api {
                status: status.as_u16(),
                message: error_message(body)
                    .unwrap_or_else(|| format!("Request failed with status {}", status.as_u16())),
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn url() -> Url {
        Url::parse("http://backend.internal/api/signup").unwrap()
    }

    #[test]
    fn test_unauthorized_maps_to_dedicated_variant() {
        let err = map_error_status(&Method::GET, &url(), StatusCode::UNAUTHORIZED, "");
        assert!(matches!(err, BackendError::Unauthorized));
    }

    #[test]
    fn test_not_found_keeps_path() {
        let err = map_error_status(&Method::GET, &url(), StatusCode::NOT_FOUND, "");
        assert!(matches!(err, BackendError::NotFound(path) if path == "/api/signup"));
    }

    #[test]
    fn test_conflict_carries_backend_message() {
        let err = map_error_status(
            &Method::POST,
            &url(),
            StatusCode::UNPROCESSABLE_ENTITY,
            r#"{"message":"Email taken"}"#,
        );
        assert!(matches!(
            err,
            BackendError::Api { status: 422, ref message } if message == "Email taken"
        ));
    }

    #[test]
    fn test_unparseable_error_body_gets_generic_message() {
        let err = map_error_status(&Method::POST, &url(), StatusCode::BAD_GATEWAY, "<html>");
        assert!(matches!(
            err,
            BackendError::Api { status: 502, ref message } if message == "Request failed with status 502"
        ));
    }

    #[test]
    fn test_movie_url_encodes_id_as_one_segment() {
        let client = BackendClient::new(
            reqwest::Client::new(),
            Url::parse("http://backend.internal/v1").unwrap(),
        );
        let url = client.movie_url(&MovieId::new("a/b c")).unwrap();
        assert_eq!(url.as_str(), "http://backend.internal/v1/api/movies/a%2Fb%20c");
    }
}
