//! Streamflix Core - Shared types library.
//!
//! This crate provides common types used across Streamflix components:
//! - `web` - Server-rendered account, authentication, and favorites pages
//! - `integration-tests` - End-to-end tests against a running web server
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. Users and
//! content are owned by the remote backend; these types describe the values
//! that cross the wire and get validated locally.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs and email addresses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
