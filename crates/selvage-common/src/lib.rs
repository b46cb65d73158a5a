//! Common types for the selvage post-thread core
//!
//! Validated AT Protocol string types (DIDs, handles, at:// URIs, language tags and
//! datetimes). Everything here is owned and cheap to clone, backed by [`SmolStr`], so
//! values can live in long-lived caches without borrowing from a response buffer.

#![warn(missing_docs)]
pub use smol_str;
pub use smol_str::SmolStr;

/// Baseline AT Protocol string types.
pub mod types;

pub use types::string::{AtStrError, AtUri, Datetime, Did, Handle, Language, StrParseKind};
