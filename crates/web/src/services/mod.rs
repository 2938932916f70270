//! Business logic services for the web crate.
//!
//! # Services
//!
//! - `auth` - Credential submission (account creation, then session issuance)

pub mod auth;
