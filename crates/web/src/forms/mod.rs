//! Submitted form types and their validation schemas.

pub mod auth;

pub use auth::{AuthForm, AuthMode, Credentials, FieldErrors};
