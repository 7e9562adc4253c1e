//! Shared error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant where configuration problems can surface.  The only thing
//! `rr-core` itself rejects is an invalid [`RouteConfig`](crate::RouteConfig).

use thiserror::Error;

/// The base error type for `rr-core`.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `rr-core`.
pub type CoreResult<T> = Result<T, CoreError>;
