use super::{PostShadow, PostShadowStore, Shadow, Shadowed};
use crate::post::PostView;
use selvage_common::AtUri;

/// A local action on a post that is reflected before the server confirms it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostAction {
    /// The viewer liked the post, creating the like record `uri`
    Like {
        /// The new like record
        uri: AtUri,
    },
    /// The viewer removed their like
    Unlike,
    /// The viewer reposted the post, creating the repost record `uri`
    Repost {
        /// The new repost record
        uri: AtUri,
    },
    /// The viewer removed their repost
    Unrepost,
    /// The viewer replied to the post
    Reply,
    /// The viewer deleted the post
    Delete,
}

impl PostAction {
    /// The shadow write this action amounts to, relative to the currently visible post.
    ///
    /// Counters move by one and never drop below zero. Liking an already liked post
    /// only swaps the like reference; unliking a post that isn't liked is an empty
    /// patch.
    pub fn shadow_for(&self, current: &PostView) -> Shadow<PostShadow> {
        let count = |n: Option<i64>| n.unwrap_or(0);
        let patch = match self {
            PostAction::Like { uri } => PostShadow {
                like_count: current
                    .viewer_like()
                    .is_none()
                    .then(|| count(current.like_count) + 1),
                like_uri: Some(Some(uri.clone())),
                ..Default::default()
            },
            PostAction::Unlike if current.viewer_like().is_some() => PostShadow {
                like_count: Some((count(current.like_count) - 1).max(0)),
                like_uri: Some(None),
                ..Default::default()
            },
            PostAction::Repost { uri } => PostShadow {
                repost_count: current
                    .viewer_repost()
                    .is_none()
                    .then(|| count(current.repost_count) + 1),
                repost_uri: Some(Some(uri.clone())),
                ..Default::default()
            },
            PostAction::Unrepost if current.viewer_repost().is_some() => PostShadow {
                repost_count: Some((count(current.repost_count) - 1).max(0)),
                repost_uri: Some(None),
                ..Default::default()
            },
            PostAction::Unlike | PostAction::Unrepost => PostShadow::default(),
            PostAction::Reply => PostShadow {
                reply_count: Some(count(current.reply_count) + 1),
                ..Default::default()
            },
            PostAction::Delete => return Shadow::Tombstone,
        };
        Shadow::Patch(patch)
    }
}

impl PostShadowStore {
    /// Record `action` against `post` (the canonical copy).
    ///
    /// The action is applied relative to the merged view, so repeated likes and unlikes
    /// stack the way the viewer saw them. Actions on a tombstoned post are ignored.
    /// Rolling back a failed write is up to the caller: [`clear`](Self::clear) or apply
    /// the inverse action.
    pub fn apply(&self, post: &PostView, action: PostAction) {
        let Shadowed::Normal(current) = self.view(post) else {
            return;
        };
        match action.shadow_for(&current) {
            Shadow::Tombstone => self.tombstone(post.uri.clone()),
            Shadow::Patch(patch) if patch.is_empty() => {}
            Shadow::Patch(patch) => self.set(post.uri.clone(), patch),
        }
    }
}
