use selvage_common::AtUri;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::collections::HashSet;

/// Kind of feedback sent to a custom feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InteractionEvent {
    /// "Show more like this"
    #[serde(rename = "app.bsky.feed.defs#requestMore")]
    RequestMore,
    /// "Show less like this"
    #[serde(rename = "app.bsky.feed.defs#requestLess")]
    RequestLess,
}

/// One piece of feedback about a feed item (`app.bsky.feed.defs#interaction`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interaction {
    /// The feed item the feedback is about
    pub item: AtUri,
    /// What the viewer asked for
    pub event: InteractionEvent,
    /// Opaque context the feed attached to the item
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feed_context: Option<SmolStr>,
}

/// Buffer of interactions waiting to be sent to the feed generator.
///
/// Identical interactions are kept once until the next [`drain`](Self::drain).
#[derive(Debug, Clone, Default)]
pub struct FeedFeedback {
    enabled: bool,
    pending: Vec<Interaction>,
    seen: HashSet<Interaction>,
}

impl FeedFeedback {
    /// Feedback buffer for a feed that does (or doesn't) accept interactions
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            ..Default::default()
        }
    }

    /// Whether the current feed accepts feedback
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Queue an interaction. Returns whether it was queued.
    #[cfg_attr(feature = "tracing", tracing::instrument(level = "debug", skip(self), fields(item = %interaction.item)))]
    pub fn send(&mut self, interaction: Interaction) -> bool {
        if !self.enabled || !self.seen.insert(interaction.clone()) {
            return false;
        }
        self.pending.push(interaction);
        true
    }

    /// Take everything queued so far, in the order it was sent
    pub fn drain(&mut self) -> Vec<Interaction> {
        self.seen.clear();
        std::mem::take(&mut self.pending)
    }

    /// Number of queued interactions
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether nothing is queued
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
