use super::plan::{LineLimit, ThreadItemPlan};
use super::policy::{ThreadItemInput, ThreadRenderPolicy};
use super::tree::FlatItem;
use super::ThreadPosition;
use crate::moderation::{ModerationDecision, ModerationPrefs, ModerationService};
use crate::post::PostView;
use crate::shadow::{PostShadowStore, Shadowed};
use selvage_common::AtUri;
use std::collections::HashMap;

/// Render state of one mounted thread screen.
///
/// Remembers each post's truncation state from the first time it was planned. Once the
/// viewer expands a post with [`show_more`](Self::show_more) it stays expanded until the
/// post is [unmounted](Self::unmount) or the session is dropped.
#[derive(Debug, Clone, Default)]
pub struct ThreadSession {
    line_limits: HashMap<AtUri, LineLimit>,
}

impl ThreadSession {
    /// Fresh session with nothing mounted
    pub fn new() -> Self {
        Self::default()
    }

    /// Plan a post, mounting its truncation state on first sight
    pub fn plan(
        &mut self,
        policy: &ThreadRenderPolicy,
        post: &Shadowed<PostView>,
        position: &ThreadPosition,
        moderation: &ModerationDecision,
    ) -> ThreadItemPlan {
        let uri = post.as_normal().map(|post| post.uri.clone());
        let plan = policy.plan(&ThreadItemInput {
            post,
            position,
            moderation,
            line_limit: uri.as_ref().and_then(|uri| self.line_limit(uri)),
        });
        if let (Some(uri), ThreadItemPlan::Row(row)) = (uri, &plan) {
            self.line_limits.entry(uri).or_insert(row.text.line_limit);
        }
        plan
    }

    /// Plan every row of a flattened thread.
    ///
    /// Each post is merged with its shadow from `store` and moderated with `moderator`
    /// before planning.
    pub fn plan_thread<M: ModerationService + ?Sized>(
        &mut self,
        policy: &ThreadRenderPolicy,
        items: &[FlatItem],
        store: &PostShadowStore,
        moderator: &M,
        moderation_prefs: &ModerationPrefs,
    ) -> Vec<ThreadItemPlan> {
        items
            .iter()
            .map(|item| match item {
                FlatItem::Post { post, position } => {
                    let merged = store.view(post);
                    let decision = match &merged {
                        Shadowed::Normal(post) => moderator.decide(post, moderation_prefs),
                        Shadowed::Tombstoned => ModerationDecision::none(),
                    };
                    self.plan(policy, &merged, position, &decision)
                }
                FlatItem::NotFound { uri, .. } => ThreadItemPlan::NotFound { uri: uri.clone() },
                FlatItem::Blocked { uri, .. } => ThreadItemPlan::Blocked { uri: uri.clone() },
            })
            .collect()
    }

    /// Truncation state of a mounted post
    pub fn line_limit(&self, uri: &AtUri) -> Option<LineLimit> {
        self.line_limits.get(uri).copied()
    }

    /// Expand a post for the rest of the session
    pub fn show_more(&mut self, uri: &AtUri) {
        self.line_limits.insert(uri.clone(), LineLimit::Full);
    }

    /// Forget a post's state, as when its row leaves the screen for good
    pub fn unmount(&mut self, uri: &AtUri) {
        self.line_limits.remove(uri);
    }
}
