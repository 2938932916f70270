//! End-to-end tests for the Streamflix web pages.
//!
//! Each [`TestContext`] starts the real router on an ephemeral port together
//! with a [`FakeRemote`] standing in for the content backend and the
//! authentication provider. Tests drive it with a cookie-aware `reqwest`
//! client that does not follow redirects, so every hop can be asserted.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p streamflix-integration-tests
//! ```

use std::net::{Ipv4Addr, SocketAddr};

use reqwest::{Client, Response, redirect::Policy};

pub use streamflix_web::test_support::FakeRemote;
use streamflix_web::{routes, state::AppState};

/// Email of the account every context starts with.
pub const EMAIL: &str = "ada@example.com";
/// Password of the account every context starts with.
pub const PASSWORD: &str = "analytical";

/// A running site plus the fakes behind it.
pub struct TestContext {
    pub client: Client,
    pub base_url: String,
    pub remote: FakeRemote,
}

impl TestContext {
    /// Start the fakes and the site.
    ///
    /// # Panics
    ///
    /// Panics if a listener cannot be bound or the client cannot be built.
    #[allow(clippy::expect_used)]
    pub async fn new() -> Self {
        let remote = FakeRemote::start()
            .await
            .expect("Failed to start fake remote");
        remote.add_user(EMAIL, PASSWORD, "Ada", "Lovelace");

        let state = AppState::new(remote.web_config()).expect("Failed to build state");
        let app = routes::app(state);

        let listener = tokio::net::TcpListener::bind((Ipv4Addr::LOCALHOST, 0))
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Listener has no address");
        tokio::spawn(async move {
            let _ = axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await;
        });

        let client = Client::builder()
            .cookie_store(true)
            .redirect(Policy::none())
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: format!("http://{addr}"),
            remote,
        }
    }

    /// Absolute URL for `path` on the site.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// `GET path`.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    #[allow(clippy::expect_used)]
    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("GET failed")
    }

    /// `POST path` with a form body.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    #[allow(clippy::expect_used)]
    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> Response {
        self.client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .expect("POST failed")
    }

    /// Sign in as the seeded account, keeping the session cookie.
    ///
    /// # Panics
    ///
    /// Panics if sign-in does not redirect to the profile picker.
    pub async fn sign_in(&self) {
        let response = self
            .post_form(
                "/auth",
                &[("mode", "signin"), ("email", EMAIL), ("password", PASSWORD)],
            )
            .await;
        assert_eq!(response.status(), reqwest::StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/profiles");
    }
}

/// The `Location` header of a redirect, or `""`.
#[must_use]
pub fn location(response: &Response) -> &str {
    response
        .headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}
