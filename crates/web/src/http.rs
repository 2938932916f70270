//! Outbound HTTP plumbing shared by the backend and provider clients.

use std::time::Duration;

use serde::Deserialize;
use url::Url;

/// Longest slice of a remote body that ends up in logs.
const LOG_BODY_CHARS: usize = 500;

/// Build the `reqwest` client shared by all remote calls.
///
/// # Errors
///
/// Returns an error if the TLS backend cannot be initialized.
pub fn build_client(timeout: Duration) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("streamflix-web/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// Resolve `path` below `base`, keeping any path prefix `base` already has.
///
/// `Url::join` replaces the last segment unless the base ends with `/`, so
/// `http://host/auth` + `credentials` would otherwise become
/// `http://host/credentials`.
///
/// # Errors
///
/// Returns an error if the joined URL is not valid.
pub fn endpoint(base: &Url, path: &str) -> Result<Url, url::ParseError> {
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let with_slash = format!("{}/", base.path());
        base.set_path(&with_slash);
    }
    base.join(path.trim_start_matches('/'))
}

/// Error payload shapes used by the remote services.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

/// Pull a human-readable message out of an error response body.
///
/// Accepts `{"message": ...}` and `{"error": ...}`; anything else yields `None`.
#[must_use]
pub fn error_message(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    parsed
        .message
        .or(parsed.error)
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
}

/// Truncate a response body for logging.
#[must_use]
pub fn log_excerpt(body: &str) -> String {
    body.chars().take(LOG_BODY_CHARS).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_keeps_base_path() {
        let base = Url::parse("http://127.0.0.1:4000/auth").unwrap();
        assert_eq!(
            endpoint(&base, "credentials").unwrap().as_str(),
            "http://127.0.0.1:4000/auth/credentials"
        );

        let base = Url::parse("http://127.0.0.1:4000/auth/").unwrap();
        assert_eq!(
            endpoint(&base, "/credentials").unwrap().as_str(),
            "http://127.0.0.1:4000/auth/credentials"
        );
    }

    #[test]
    fn test_endpoint_at_root() {
        let base = Url::parse("http://api.internal").unwrap();
        assert_eq!(
            endpoint(&base, "api/movies/m1").unwrap().as_str(),
            "http://api.internal/api/movies/m1"
        );
    }

    #[test]
    fn test_error_message_shapes() {
        assert_eq!(
            error_message(r#"{"message":"Email taken"}"#).as_deref(),
            Some("Email taken")
        );
        assert_eq!(
            error_message(r#"{"error":"Invalid credentials"}"#).as_deref(),
            Some("Invalid credentials")
        );
        assert_eq!(error_message(r#"{"message":"  "}"#), None);
        assert_eq!(error_message("<html>502</html>"), None);
    }

    #[test]
    fn test_log_excerpt_truncates() {
        let body = "x".repeat(2000);
        assert_eq!(log_excerpt(&body).len(), LOG_BODY_CHARS);
    }
}
