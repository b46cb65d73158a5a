//! Optimistic local overrides ("shadows") for server-held records
//!
//! When the viewer likes, reposts, replies to or deletes a post, the change is known
//! locally long before a refetch confirms it. Rather than mutating cached responses,
//! the change is recorded as a [`Shadow`] keyed by the record's at:// URI and merged
//! onto whatever canonical copy a screen is about to render.
//!
//! # Core Concepts
//!
//! - **Patch**: a partial set of field overrides ([`PostShadow`] for posts). Later patches
//!   for the same record win field by field.
//! - **Tombstone**: the record was deleted locally. Dominates every patch until cleared.
//! - **Merge**: [`merge`] applies a shadow to a canonical record and yields a
//!   [`Shadowed`] value, which is either the merged record or [`Shadowed::Tombstoned`].
//! - **Store**: [`ShadowStore`] holds at most one shadow per URI and notifies
//!   subscribers synchronously when it changes.

mod action;
mod merge;
mod store;


pub use action::PostAction;
pub use merge::merge;
pub use store::{ShadowStore, Subscription};

use crate::post::{PostView, ViewerState};
use selvage_common::AtUri;

/// Patch type that can be layered over a record
pub trait ShadowPatch: Clone + Default + PartialEq + Send + Sync + 'static {
    /// Fold a newer patch into this one, newer fields winning
    fn merge_from(&mut self, newer: Self);
}

/// A record that can carry a shadow
pub trait Shadowable: Clone {
    /// The patch type for this record
    type Patch: ShadowPatch;

    /// The identity shadows are keyed by
    fn shadow_key(&self) -> &AtUri;

    /// Overwrite every field the patch sets
    fn apply_patch(&mut self, patch: &Self::Patch);
}

/// A pending local override for one record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shadow<P> {
    /// Field overrides
    Patch(P),
    /// Deleted locally
    Tombstone,
}

impl<P> Shadow<P> {
    /// Whether this is the tombstone marker
    pub fn is_tombstone(&self) -> bool {
        matches!(self, Shadow::Tombstone)
    }
}

/// The result of merging a shadow onto a canonical record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shadowed<T> {
    /// The merged record
    Normal(T),
    /// The record was deleted locally; none of its fields may be shown
    Tombstoned,
}

impl<T> Shadowed<T> {
    /// Whether the record is tombstoned
    pub fn is_tombstoned(&self) -> bool {
        matches!(self, Shadowed::Tombstoned)
    }

    /// The merged record, unless tombstoned
    pub fn as_normal(&self) -> Option<&T> {
        match self {
            Shadowed::Normal(t) => Some(t),
            Shadowed::Tombstoned => None,
        }
    }

    /// Consume into the merged record, unless tombstoned
    pub fn into_normal(self) -> Option<T> {
        match self {
            Shadowed::Normal(t) => Some(t),
            Shadowed::Tombstoned => None,
        }
    }
}

/// Overridable post fields.
///
/// Viewer refs are doubly optional: `None` leaves the canonical value alone,
/// `Some(None)` overrides it to absent (an unlike), `Some(Some(uri))` sets it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostShadow {
    /// Overrides `like_count`
    pub like_count: Option<i64>,
    /// Overrides `repost_count`
    pub repost_count: Option<i64>,
    /// Overrides `reply_count`
    pub reply_count: Option<i64>,
    /// Overrides `quote_count`
    pub quote_count: Option<i64>,
    /// Overrides the viewer's like record
    pub like_uri: Option<Option<AtUri>>,
    /// Overrides the viewer's repost record
    pub repost_uri: Option<Option<AtUri>>,
}

impl PostShadow {
    /// Whether the patch overrides nothing
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl ShadowPatch for PostShadow {
    fn merge_from(&mut self, newer: Self) {
        fn take<T>(slot: &mut Option<T>, newer: Option<T>) {
            if newer.is_some() {
                *slot = newer;
            }
        }
        take(&mut self.like_count, newer.like_count);
        take(&mut self.repost_count, newer.repost_count);
        take(&mut self.reply_count, newer.reply_count);
        take(&mut self.quote_count, newer.quote_count);
        take(&mut self.like_uri, newer.like_uri);
        take(&mut self.repost_uri, newer.repost_uri);
    }
}

impl Shadowable for PostView {
    type Patch = PostShadow;

    fn shadow_key(&self) -> &AtUri {
        &self.uri
    }

    fn apply_patch(&mut self, patch: &PostShadow) {
        if let Some(n) = patch.like_count {
            self.like_count = Some(n);
        }
        if let Some(n) = patch.repost_count {
            self.repost_count = Some(n);
        }
        if let Some(n) = patch.reply_count {
            self.reply_count = Some(n);
        }
        if let Some(n) = patch.quote_count {
            self.quote_count = Some(n);
        }
        if patch.like_uri.is_some() || patch.repost_uri.is_some() {
            let viewer = self.viewer.get_or_insert_with(ViewerState::default);
            if let Some(like) = &patch.like_uri {
                viewer.like = like.clone();
            }
            if let Some(repost) = &patch.repost_uri {
                viewer.repost = repost.clone();
            }
        }
    }
}

/// Shadow store for posts
pub type PostShadowStore = ShadowStore<PostShadow>;
