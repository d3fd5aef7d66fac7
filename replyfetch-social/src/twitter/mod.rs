//! Twitter/X replies integration.
//!
//! Submodules provide the HTTP client wrapper, the pure JSON extraction
//! transform, and the wire and output models.
pub mod client;
pub mod extract;
pub mod types;

pub use client::{DEFAULT_MAX_REPLIES, RepliesApi};
pub use extract::extract_replies;
pub use types::{FetchResult, ReplyMetrics, ReplyRecord};
