//! Request middleware and extractors.
//!
//! [`auth`] provides the `AuthUser` extractor that validates the bearer token
//! and exposes the authenticated teacher's claims to handlers.

pub mod auth;
