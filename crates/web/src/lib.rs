//! Streamflix web library.
//!
//! Server-rendered account, authentication, and favorites pages on top of a
//! remote content backend and a credential-based authentication provider.
//! Exposed as a library so the router can be driven from tests.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod backend;
pub mod components;
pub mod config;
pub mod error;
pub mod filters;
pub mod forms;
pub mod http;
pub mod middleware;
pub mod models;
pub mod provider;
pub mod routes;
pub mod services;
pub mod state;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
