//! Account route handlers.
//!
//! These routes require authentication.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tower_sessions::Session;

use crate::components::NavBar;
use crate::error::{Result, recover_unauthorized};
use crate::filters;
use crate::middleware::RequireSession;
use crate::models::User;
use crate::state::AppState;

/// Account overview page template.
#[derive(Template, WebTemplate)]
#[template(path = "account.html")]
pub struct AccountTemplate {
    pub nav: NavBar,
    pub user: User,
}

/// Display the account overview.
///
/// The user is fetched fresh from the backend rather than read from the
/// session, so profile changes made elsewhere show up immediately.
pub async fn index(
    State(state): State<AppState>,
    RequireSession(current): RequireSession,
    session: Session,
) -> Result<impl IntoResponse> {
    let user = recover_unauthorized(
        &session,
        state.backend().current_user(current.access_token()).await,
    )
    .await?;

    Ok(AccountTemplate {
        nav: NavBar::dashboard(&current),
        user,
    })
}
