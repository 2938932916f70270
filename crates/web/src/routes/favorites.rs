//! Favorites route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect},
};
use serde::Deserialize;
use tower_sessions::Session;

use streamflix_core::MovieId;

use super::movies::{ListQuery, overlay_movie};
use super::safe_return_path;
use crate::components::{MovieCard, MovieList, NavBar};
use crate::error::{Result, recover_unauthorized};
use crate::filters;
use crate::middleware::RequireSession;
use crate::state::AppState;

const FAVORITES_PATH: &str = "/favorites";

/// Favorites page template.
#[derive(Template, WebTemplate)]
#[template(path = "favorites.html")]
pub struct FavoritesTemplate {
    pub nav: NavBar,
    pub list: MovieList,
}

/// Form posted by the favorite toggles.
#[derive(Debug, Default, Deserialize)]
pub struct ToggleForm {
    /// Page to go back to, defaults to the favorites list.
    pub return_to: Option<String>,
}

/// Display the user's favorites in backend order.
pub async fn index(
    State(state): State<AppState>,
    RequireSession(current): RequireSession,
    session: Session,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse> {
    let token = current.access_token();
    let movies = recover_unauthorized(&session, state.backend().favorites(token).await).await?;
    let overlay = overlay_movie(&state, &session, token, &movies, query.info_id()).await?;

    Ok(FavoritesTemplate {
        nav: NavBar::dashboard(&current).scrolling(),
        list: MovieList {
            label: "Favorites",
            path: FAVORITES_PATH,
            cards: MovieCard::favorites(movies),
            overlay,
        },
    })
}

/// Save a movie to the user's favorites.
pub async fn add(
    State(state): State<AppState>,
    RequireSession(current): RequireSession,
    session: Session,
    Path(movie_id): Path<String>,
    Form(form): Form<ToggleForm>,
) -> Result<Redirect> {
    let movie_id = MovieId::new(movie_id);
    let user = recover_unauthorized(
        &session,
        state
            .backend()
            .add_favorite(current.access_token(), &movie_id)
            .await,
    )
    .await?;

    tracing::info!(user_id = %user.id, movie_id = %movie_id, "Favorite added");
    Ok(Redirect::to(&safe_return_path(
        form.return_to.as_deref(),
        FAVORITES_PATH,
    )))
}

/// Remove a movie from the user's favorites.
pub async fn remove(
    State(state): State<AppState>,
    RequireSession(current): RequireSession,
    session: Session,
    Path(movie_id): Path<String>,
    Form(form): Form<ToggleForm>,
) -> Result<Redirect> {
    let movie_id = MovieId::new(movie_id);
    let user = recover_unauthorized(
        &session,
        state
            .backend()
            .remove_favorite(current.access_token(), &movie_id)
            .await,
    )
    .await?;

    tracing::info!(user_id = %user.id, movie_id = %movie_id, "Favorite removed");
    Ok(Redirect::to(&safe_return_path(
        form.return_to.as_deref(),
        FAVORITES_PATH,
    )))
}
