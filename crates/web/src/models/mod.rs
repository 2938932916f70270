//! Domain models for the web crate.
//!
//! Everything here is a request-scoped view of data owned by the remote
//! backend or the authentication provider. Nothing is persisted locally.

mod movie;
mod session;
mod user;

pub use movie::Movie;
pub use session::{CurrentSession, keys as session_keys};
pub use user::{NewUser, User};
