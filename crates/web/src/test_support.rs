//! In-process stand-ins for the content backend and the authentication
//! provider.
//!
//! [`FakeRemote`] serves both services from one axum server on an ephemeral
//! port: the backend below `/api` and the provider below `/auth`. Every call
//! is counted so tests can assert that a flow did (or did not) reach a
//! remote service.

use std::collections::HashMap;
use std::net::Ipv4Addr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::Utc;
use secrecy::SecretString;
use serde::Deserialize;
use serde_json::json;
use url::Url;

use streamflix_core::{Email, MovieId, UserId};

use crate::config::{RemoteConfig, WebConfig};
use crate::models::{Movie, User};

/// Session secret used by test configurations.
pub const TEST_SESSION_SECRET: &str = "q8Zt3rVm1Lw9Kx2Nb7Hc5Jd4Fg6Sa0Pe";

/// Remote call counters.
#[derive(Debug, Default)]
pub struct Calls {
    pub signup: AtomicUsize,
    pub sign_in: AtomicUsize,
    pub sign_out: AtomicUsize,
    pub api: AtomicUsize,
}

struct Account {
    user: User,
    password: String,
}

#[derive(Default)]
struct Store {
    accounts: Vec<Account>,
    tokens: HashMap<String, UserId>,
    next_id: usize,
    next_token: usize,
}

struct FakeState {
    store: Mutex<Store>,
    catalogue: Vec<Movie>,
    calls: Calls,
    signup_outage: AtomicBool,
}

impl FakeState {
    fn store(&self) -> MutexGuard<'_, Store> {
        // A panicking test handler must not wedge the other tests.
        self.store
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn movie(&self, id: &MovieId) -> Option<Movie> {
        self.catalogue.iter().find(|m| &m.id == id).cloned()
    }
}

/// Fake content backend and authentication provider.
pub struct FakeRemote {
    api_url: Url,
    auth_url: Url,
    state: Arc<FakeState>,
}

impl FakeRemote {
    /// Bind on `127.0.0.1:0` and start serving.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot be bound.
    pub async fn start() -> std::io::Result<Self> {
        let state = Arc::new(FakeState {
            store: Mutex::new(Store::default()),
            catalogue: sample_catalogue(),
            calls: Calls::default(),
            signup_outage: AtomicBool::new(false),
        });

        let app = Router::new()
            .route("/api/signup", post(signup))
            .route("/api/current", get(current))
            .route("/api/favorites", get(favorites))
            .route("/api/favorite", post(add_favorite).delete(remove_favorite))
            .route("/api/movies", get(movies))
            .route("/api/movies/{id}", get(movie))
            .route("/auth/credentials", post(credentials))
            .route("/auth/signout", post(signout))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await?;
        let addr = listener.local_addr()?;
        let api_url = Url::parse(&format!("http://{addr}/")).map_err(std::io::Error::other)?;
        let auth_url = api_url.join("auth").map_err(std::io::Error::other)?;
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!(error = %e, "Fake remote stopped");
            }
        });

        Ok(Self {
            api_url,
            auth_url,
            state,
        })
    }

    /// Base URL of the fake content backend.
    #[must_use]
    pub fn api_url(&self) -> Url {
        self.api_url.clone()
    }

    /// Base URL of the fake authentication provider.
    #[must_use]
    pub fn auth_url(&self) -> Url {
        self.auth_url.clone()
    }

    /// Register an account directly, bypassing the signup endpoint.
    ///
    /// # Panics
    ///
    /// Panics if `email` is not a valid address.
    pub fn add_user(&self, email: &str, password: &str, first_name: &str, last_name: &str) {
        #[allow(clippy::expect_used)]
        let email = Email::parse(email).expect("test user email must be valid");
        let mut store = self.state.store();
        insert_account(&mut store, email, password, first_name, last_name);
    }

    /// Mark `movie_id` as a favorite of the account registered as `email`.
    pub fn add_favorite(&self, email: &str, movie_id: &str) {
        let mut store = self.state.store();
        if let Some(account) = store
            .accounts
            .iter_mut()
            .find(|a| a.user.email.as_str() == email)
        {
            account.user.favorite_ids.push(MovieId::new(movie_id));
        }
    }

    /// Make `/api/signup` answer `500` until switched back.
    pub fn set_signup_outage(&self, down: bool) {
        self.state.signup_outage.store(down, Ordering::SeqCst);
    }

    /// Invalidate every issued token, as if the provider expired them.
    pub fn revoke_all_tokens(&self) {
        self.state.store().tokens.clear();
    }

    /// Number of live tokens.
    #[must_use]
    pub fn live_tokens(&self) -> usize {
        self.state.store().tokens.len()
    }

    /// Call counters.
    #[must_use]
    pub fn calls(&self) -> &Calls {
        &self.state.calls
    }

    /// Total calls to either service.
    #[must_use]
    pub fn total_calls(&self) -> usize {
        let calls = &self.state.calls;
        calls.signup.load(Ordering::SeqCst)
            + calls.sign_in.load(Ordering::SeqCst)
            + calls.sign_out.load(Ordering::SeqCst)
            + calls.api.load(Ordering::SeqCst)
    }

    /// Web configuration pointing at this fake, with rate limiting off.
    #[must_use]
    pub fn web_config(&self) -> WebConfig {
        WebConfig {
            host: Ipv4Addr::LOCALHOST.into(),
            port: 0,
            base_url: "http://localhost:3000".to_string(),
            session_secret: SecretString::from(TEST_SESSION_SECRET),
            remote: RemoteConfig {
                api_url: self.api_url(),
                auth_url: self.auth_url(),
                http_timeout: Duration::from_secs(5),
            },
            auth_rate_limit: false,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 0.0,
            sentry_traces_sample_rate: 0.0,
        }
    }
}

/// Three titles, in a fixed order.
#[must_use]
pub fn sample_catalogue() -> Vec<Movie> {
    [
        ("m1", "Big Buck Bunny", "Animation", "10m"),
        ("m2", "Sintel", "Fantasy", "15m"),
        ("m3", "Tears of Steel", "Science Fiction", "12m"),
    ]
    .into_iter()
    .map(|(id, title, genre, duration)| Movie {
        id: MovieId::new(id),
        title: title.to_string(),
        description: format!("{title} is an open movie."),
        video_url: format!("https://media.example.net/{id}.mp4"),
        thumbnail_url: format!("https://media.example.net/{id}.jpg"),
        genre: genre.to_string(),
        duration: duration.to_string(),
    })
    .collect()
}

fn insert_account(
    store: &mut Store,
    email: Email,
    password: &str,
    first_name: &str,
    last_name: &str,
) -> User {
    store.next_id += 1;
    let user = User {
        id: UserId::new(format!("u{}", store.next_id)),
        email,
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        favorite_ids: Vec::new(),
    };
    store.accounts.push(Account {
        user: user.clone(),
        password: password.to_string(),
    });
    user
}

fn message(status: StatusCode, key: &str, text: &str) -> Response {
    (status, Json(json!({ key: text }))).into_response()
}

/// Resolve the bearer token to an account index.
fn authorized(store: &Store, headers: &HeaderMap) -> Option<usize> {
    let token = headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")?;
    let user_id = store.tokens.get(token)?;
    store.accounts.iter().position(|a| &a.user.id == user_id)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignupBody {
    email: String,
    password: String,
    first_name: String,
    last_name: String,
}

async fn signup(State(state): State<Arc<FakeState>>, Json(body): Json<SignupBody>) -> Response {
    state.calls.signup.fetch_add(1, Ordering::SeqCst);
    if state.signup_outage.load(Ordering::SeqCst) {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    let Ok(email) = Email::parse(&body.email) else {
        return message(StatusCode::BAD_REQUEST, "message", "Invalid email");
    };

    let mut store = state.store();
    if store.accounts.iter().any(|a| a.user.email == email) {
        return message(StatusCode::CONFLICT, "message", "Email is already in use");
    }

    let user = insert_account(
        &mut store,
        email,
        &body.password,
        &body.first_name,
        &body.last_name,
    );
    (StatusCode::CREATED, Json(user)).into_response()
}

async fn current(State(state): State<Arc<FakeState>>, headers: HeaderMap) -> Response {
    state.calls.api.fetch_add(1, Ordering::SeqCst);
    let store = state.store();
    match authorized(&store, &headers) {
        Some(index) => Json(store.accounts[index].user.clone()).into_response(),
        None => StatusCode::UNAUTHORIZED.into_response(),
    }
}

async fn favorites(State(state): State<Arc<FakeState>>, headers: HeaderMap) -> Response {
    state.calls.api.fetch_add(1, Ordering::SeqCst);
    let store = state.store();
    let Some(index) = authorized(&store, &headers) else {
        return StatusCode::UNAUTHORIZED.into_response();
    };

    let movies: Vec<Movie> = store.accounts[index]
        .user
        .favorite_ids
        .iter()
        .filter_map(|id| state.movie(id))
        .collect();
    Json(movies).into_response()
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FavoriteBody {
    movie_id: MovieId,
}

async fn add_favorite(
    State(state): State<Arc<FakeState>>,
    headers: HeaderMap,
    Json(body): Json<FavoriteBody>,
) -> Response {
    toggle_favorite(&state, &headers, body.movie_id, true)
}

async fn remove_favorite(
    State(state): State<Arc<FakeState>>,
    headers: HeaderMap,
    Json(body): Json<FavoriteBody>,
) -> Response {
    toggle_favorite(&state, &headers, body.movie_id, false)
}

fn toggle_favorite(state: &FakeState, headers: &HeaderMap, movie_id: MovieId, add: bool) -> Response {
    state.calls.api.fetch_add(1, Ordering::SeqCst);
    if state.movie(&movie_id).is_none() {
        return message(StatusCode::NOT_FOUND, "message", "Movie not found");
    }

    let mut store = state.store();
    let Some(index) = authorized(&store, headers) else {
        return StatusCode::UNAUTHORIZED.into_response();
    };

    let user = &mut store.accounts[index].user;
    user.favorite_ids.retain(|id| id != &movie_id);
    if add {
        user.favorite_ids.push(movie_id);
    }
    Json(user.clone()).into_response()
}

async fn movies(State(state): State<Arc<FakeState>>, headers: HeaderMap) -> Response {
    state.calls.api.fetch_add(1, Ordering::SeqCst);
    if authorized(&state.store(), &headers).is_none() {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    Json(state.catalogue.clone()).into_response()
}

async fn movie(
    State(state): State<Arc<FakeState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    state.calls.api.fetch_add(1, Ordering::SeqCst);
    if authorized(&state.store(), &headers).is_none() {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    match state.movie(&MovieId::new(id)) {
        Some(movie) => Json(movie).into_response(),
        None => message(StatusCode::NOT_FOUND, "message", "Movie not found"),
    }
}

#[derive(Deserialize)]
struct CredentialsBody {
    email: String,
    password: String,
}

async fn credentials(
    State(state): State<Arc<FakeState>>,
    Json(body): Json<CredentialsBody>,
) -> Response {
    state.calls.sign_in.fetch_add(1, Ordering::SeqCst);
    let mut store = state.store();

    let Some(user) = store
        .accounts
        .iter()
        .find(|a| a.user.email.as_str() == body.email && a.password == body.password)
        .map(|a| a.user.clone())
    else {
        return message(
            StatusCode::UNAUTHORIZED,
            "error",
            "Invalid email or password",
        );
    };

    store.next_token += 1;
    let token = format!("tok_{}_{}", user.id, store.next_token);
    store.tokens.insert(token.clone(), user.id.clone());

    Json(json!({
        "accessToken": token,
        "expiresAt": Utc::now() + chrono::Duration::hours(1),
        "user": user,
    }))
    .into_response()
}

async fn signout(State(state): State<Arc<FakeState>>, headers: HeaderMap) -> StatusCode {
    state.calls.sign_out.fetch_add(1, Ordering::SeqCst);
    let token = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string);

    match token {
        Some(token) if state.store().tokens.remove(&token).is_some() => StatusCode::NO_CONTENT,
        _ => StatusCode::UNAUTHORIZED,
    }
}
