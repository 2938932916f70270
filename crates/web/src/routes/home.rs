//! Catalogue page handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use tower_sessions::Session;

use super::movies::{ListQuery, overlay_movie};
use crate::components::{MovieCard, MovieList, NavBar};
use crate::error::{Result, recover_unauthorized};
use crate::filters;
use crate::middleware::RequireSession;
use crate::state::AppState;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub nav: NavBar,
    pub greeting: String,
    pub list: MovieList,
}

/// Display the catalogue, marking the user's favorites.
pub async fn index(
    State(state): State<AppState>,
    RequireSession(current): RequireSession,
    session: Session,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse> {
    let token = current.access_token();
    let (movies, user) = tokio::join!(
        state.backend().movies(token),
        state.backend().current_user(token)
    );
    let movies = recover_unauthorized(&session, movies).await?;
    let user = recover_unauthorized(&session, user).await?;
    let overlay = overlay_movie(&state, &session, token, &movies, query.info_id()).await?;

    Ok(HomeTemplate {
        nav: NavBar::dashboard(&current),
        greeting: user.display_name(),
        list: MovieList {
            label: "Trending Now",
            path: "/",
            cards: MovieCard::list(movies, &user.favorite_ids),
            overlay,
        },
    })
}
