//! Authentication route handlers.
//!
//! One page serves both sign-in and sign-up; the `mode` field picks the
//! rendered inputs and the validation schema together.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;

use crate::components::{Alert, NavBar};
use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::forms::{AuthForm, AuthMode, FieldErrors};
use crate::middleware::auth::AUTH_PATH;
use crate::middleware::{GuestOnly, OptionalSession, clear_current_session, set_current_session};
use crate::services::auth::{AuthFailure, authenticate};
use crate::state::AppState;

/// Where a fresh session lands.
pub const PROFILES_PATH: &str = "/profiles";

const HELP_TITLE: &str = "Yeah?";
const HELP_DESCRIPTION: &str = "Well too bad!";

/// Query parameters of the auth page.
#[derive(Debug, Default, Deserialize)]
pub struct AuthQuery {
    #[serde(default)]
    pub mode: AuthMode,
    /// Any value opens the help alert.
    pub help: Option<String>,
}

/// Values echoed back into the form after a failed submission.
///
/// The password is deliberately absent.
#[derive(Debug, Clone, Default)]
pub struct FormValues {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl From<&AuthForm> for FormValues {
    fn from(form: &AuthForm) -> Self {
        Self {
            email: form.email.clone(),
            first_name: form.first_name.clone(),
            last_name: form.last_name.clone(),
        }
    }
}

/// Auth page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth.html")]
pub struct AuthTemplate {
    pub nav: NavBar,
    pub mode: AuthMode,
    pub values: FormValues,
    pub errors: FieldErrors,
    pub alert: Option<Alert>,
}

impl AuthTemplate {
    fn blank(mode: AuthMode) -> Self {
        Self {
            nav: NavBar::guest(),
            mode,
            values: FormValues::default(),
            errors: FieldErrors::default(),
            alert: None,
        }
    }

    fn resubmit(form: &AuthForm, errors: FieldErrors, alert: Option<Alert>) -> Self {
        Self {
            nav: NavBar::guest(),
            mode: form.mode,
            values: FormValues::from(form),
            errors,
            alert,
        }
    }
}

/// Display the credential form.
pub async fn page(_guest: GuestOnly, Query(query): Query<AuthQuery>) -> impl IntoResponse {
    let mut template = AuthTemplate::blank(query.mode);
    if query.help.is_some() {
        template.alert = Some(Alert::info(HELP_TITLE, HELP_DESCRIPTION));
    }
    template
}

/// Handle a credential submission.
///
/// Invalid input is re-rendered with inline messages and never leaves this
/// server. A remote failure is re-rendered with a single alert.
pub async fn submit(
    _guest: GuestOnly,
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AuthForm>,
) -> Result<Response> {
    let credentials = match form.validate() {
        Ok(credentials) => credentials,
        Err(errors) => {
            tracing::debug!(mode = form.mode.as_str(), ?errors, "Credential form rejected");
            let template = AuthTemplate::resubmit(&form, errors, None);
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, template).into_response());
        }
    };

    match authenticate(state.backend(), state.provider(), &credentials).await {
        Ok(current) => {
            set_current_session(&session, &current).await?;
            set_sentry_user(&current.user_id, Some(current.email.as_str()));
            Ok(Redirect::to(PROFILES_PATH).into_response())
        }
        Err(failure) => {
            let status = match failure {
                AuthFailure::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
                AuthFailure::Signup(_) | AuthFailure::Rejected(_) => StatusCode::UNAUTHORIZED,
            };
            let template =
                AuthTemplate::resubmit(&form, FieldErrors::default(), Some(failure.alert()));
            Ok((status, template).into_response())
        }
    }
}

/// Sign out: drop the local session, then revoke the token upstream.
///
/// Revocation is best effort; the user is signed out locally either way.
pub async fn logout(
    State(state): State<AppState>,
    OptionalSession(current): OptionalSession,
    session: Session,
) -> Result<Redirect> {
    clear_current_session(&session).await?;
    clear_sentry_user();

    if let Some(current) = current {
        tracing::info!(user_id = %current.user_id, "Signing out");
        if let Err(e) = state.provider().sign_out(current.access_token()).await {
            tracing::warn!(error = %e, "Token revocation failed");
        }
    }

    Ok(Redirect::to(AUTH_PATH))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn form(mode: AuthMode, email: &str, password: &str) -> AuthForm {
        AuthForm {
            mode,
            email: email.to_string(),
            password: password.to_string(),
            ..AuthForm::default()
        }
    }

    #[test]
    fn test_sign_in_form_has_no_name_fields() {
        let html = AuthTemplate::blank(AuthMode::SignIn).render().unwrap();
        assert!(html.contains(r#"name="email""#));
        assert!(html.contains(r#"name="password""#));
        assert!(!html.contains(r#"name="firstName""#));
        assert!(!html.contains(r#"name="lastName""#));
        assert!(html.contains(r#"href="/auth?mode=signup""#));
    }

    #[test]
    fn test_sign_up_form_has_name_fields() {
        let html = AuthTemplate::blank(AuthMode::SignUp).render().unwrap();
        assert!(html.contains(r#"name="firstName""#));
        assert!(html.contains(r#"name="lastName""#));
        assert!(html.contains(r#"value="signup""#));
        assert!(html.contains(r#"href="/auth?mode=signin""#));
    }

    #[test]
    fn test_resubmit_keeps_email_but_not_password() {
        let submitted = form(AuthMode::SignIn, "ada@example.com", "hunter22-secret");
        let template = AuthTemplate::resubmit(
            &submitted,
            FieldErrors::default(),
            Some(Alert::error("Incorrect Credentials", "Nope")),
        );
        let html = template.render().unwrap();

        assert!(html.contains("ada@example.com"));
        assert!(!html.contains("hunter22-secret"));
        assert!(html.contains("Incorrect Credentials"));
    }

    #[test]
    fn test_inline_errors_render_per_field() {
        let submitted = form(AuthMode::SignIn, "nope", "123");
        let errors = submitted.validate().unwrap_err();
        let html = AuthTemplate::resubmit(&submitted, errors, None)
            .render()
            .unwrap();

        assert!(html.contains("Invalid email address"));
        assert!(html.contains("Password must be 6 or more characters"));
    }
}
