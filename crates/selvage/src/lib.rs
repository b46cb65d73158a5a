//! # selvage
//!
//! The logic behind a post thread screen in an AT Protocol client, minus the pixels.
//!
//! - [`shadow`]: optimistic local overrides ("shadows") layered over server data, with a
//!   tombstone for local deletes and per-post change subscriptions.
//! - [`moderation`]: label-based moderation decisions, projected onto the UI surfaces
//!   (avatar, content list, content view, ...) a renderer asks about.
//! - [`thread`]: flattening a fetched thread tree and deciding the layout treatment of
//!   every post in it (reply lines, threaded indentation, line limiting, translation).
//! - [`menu`]: which entries the post options menu offers and what each one does.
//!
//! Everything here is plain data in, plain data out. Side effects (network, clipboard,
//! navigation) belong to the caller.
//!
//! ## Example
//!
//! ```
//! # use selvage::post::PostView;
//! # use selvage::shadow::{PostShadow, PostShadowStore, Shadowed};
//! # fn example(post: &PostView) {
//! let store = PostShadowStore::new();
//! store.set(
//!     post.uri.clone(),
//!     PostShadow {
//!         like_count: Some(post.like_count.unwrap_or(0) + 1),
//!         ..Default::default()
//!     },
//! );
//! match store.view(post) {
//!     Shadowed::Normal(merged) => println!("{} likes", merged.like_count.unwrap_or(0)),
//!     Shadowed::Tombstoned => println!("deleted"),
//! }
//! # }
//! ```

#![warn(missing_docs)]

pub use selvage_common as common;
pub use selvage_common::types;

/// Crate error type
pub mod error;
/// Shareable links and translator URLs
pub mod links;
/// Post options menu model
pub mod menu;
/// Label-based moderation
pub mod moderation;
/// Post, profile and label views as served by the AppView
pub mod post;
/// Viewer preferences and session identity
pub mod prefs;
/// Optimistic shadows over server records
pub mod shadow;
/// Thread flattening and render policy
pub mod thread;
/// Translation affordance
pub mod translate;
/// Feed feedback ("show more/less like this") interactions
pub mod feedback;

pub use error::{Error, Result};

#[cfg(test)]
pub(crate) mod testing;
