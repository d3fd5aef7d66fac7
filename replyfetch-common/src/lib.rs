//! Common types and utilities shared across replyfetch crates.
//!
//! This crate defines the shared error type and observability helpers used
//! throughout the replyfetch workspace. It stays dependency-light so every
//! crate can depend on it.
//!
//! # Overview
//!
//! - [`observability`]: Centralised tracing/logging initialisation
//! - [`ReplyFetchError`] and [`Result`]: Shared error handling
//!
//! # Examples
//!
//! ```rust
//! use replyfetch_common::ReplyFetchError;
//!
//! let err = ReplyFetchError::MalformedReply {
//!     index: 2,
//!     message: "missing field `id`".into(),
//! };
//! assert_eq!(err.to_string(), "Malformed reply at index 2: missing field `id`");
//! assert!(!err.is_io());
//! ```
use std::path::PathBuf;

pub mod observability;

/// Error types used across the replyfetch system.
///
/// Transport failures never reach this type: the fetcher recovers them
/// locally and reports an empty result instead.
#[derive(thiserror::Error, Debug)]
pub enum ReplyFetchError {
    /// The caller passed an empty post id.
    #[error("Invalid post id: post id must not be empty")]
    InvalidPostId,

    /// The upstream body could not be decoded as JSON.
    #[error("Content error: {0}")]
    Content(String),

    /// One element of the `tweets` array lacked a required field or had the wrong shape.
    #[error("Malformed reply at index {index}: {message}")]
    MalformedReply { index: usize, message: String },

    /// Writing the output file failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Encoding a result as JSON failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration was incomplete or invalid.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ReplyFetchError {
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }
}

/// Convenient alias for results that use [`ReplyFetchError`].
pub type Result<T> = std::result::Result<T, ReplyFetchError>;
