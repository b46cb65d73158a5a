use super::{LabelerDefs, ModerationDecision, ModerationPrefs, moderate_post};
use crate::post::PostView;
use selvage_common::Did;

/// Source of moderation decisions for posts
///
/// The thread policy only consumes decisions; anything that can produce one for a post
/// (a remote service, a cached table, a test double) can stand in here.
pub trait ModerationService {
    /// Decide how `post` should be moderated for a viewer with `prefs`
    fn decide(&self, post: &PostView, prefs: &ModerationPrefs) -> ModerationDecision;
}

/// Label-based moderation over a fixed set of labeler definitions
#[derive(Debug, Clone, Default)]
pub struct LabelModerator {
    /// Published definitions of the labelers the viewer subscribes to
    pub defs: LabelerDefs,
    /// Labelers whose labels are honoured; empty honours every labeler
    pub accepted_labelers: Vec<Did>,
}

impl LabelModerator {
    /// Moderator trusting the given labelers
    pub fn new(defs: LabelerDefs, accepted_labelers: Vec<Did>) -> Self {
        Self {
            defs,
            accepted_labelers,
        }
    }
}

impl ModerationService for LabelModerator {
    fn decide(&self, post: &PostView, prefs: &ModerationPrefs) -> ModerationDecision {
        moderate_post(post, prefs, &self.defs, &self.accepted_labelers)
    }
}

impl<F> ModerationService for F
where
    F: Fn(&PostView, &ModerationPrefs) -> ModerationDecision,
{
    fn decide(&self, post: &PostView, prefs: &ModerationPrefs) -> ModerationDecision {
        self(post, prefs)
    }
}
