//! Profile picker handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::IntoResponse;

use crate::components::NavBar;
use crate::filters;
use crate::middleware::RequireSession;

/// Profile picker template.
#[derive(Template, WebTemplate)]
#[template(path = "profiles.html")]
pub struct ProfilesTemplate {
    pub nav: NavBar,
    pub name: String,
}

/// Ask who is watching. There is one profile per account.
pub async fn index(RequireSession(current): RequireSession) -> impl IntoResponse {
    ProfilesTemplate {
        nav: NavBar::guest().scrolling(),
        name: current.display_name(),
    }
}
