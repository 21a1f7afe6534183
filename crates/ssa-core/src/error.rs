//! Core error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant via `#[from]` where they need to surface it.

use thiserror::Error;

/// Errors raised by `ssa-core` constructors and validators.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CoreError {
    #[error("invalid simulation time {0}: must be finite")]
    InvalidTime(f64),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `ssa-core`.
pub type CoreResult<T> = Result<T, CoreError>;
