//! Moderation decision making for posts in a thread
//!
//! Takes labels from labeler services, self-labels written by authors, and the viewer's
//! mute list, combines them with the viewer's preferences, and produces a
//! [`ModerationDecision`]. Renderers don't read the decision directly: they ask it what
//! to do for one UI [`Surface`] at a time via [`ModerationDecision::ui`].
//!
//! # Core Concepts
//!
//! - **Labels**: Metadata tags applied to content or accounts by labelers or authors
//! - **Preferences**: Viewer-configured responses to specific label values (hide, warn, ignore)
//! - **Definitions**: Labeler-provided metadata about what labels mean and how they should be displayed
//! - **Causes**: Every label (or mute) that affected the decision, with its target and effect
//! - **Surfaces**: Where something is displayed; the same cause blurs an avatar but not a post body
//!
//! # Example
//!
//! ```
//! # use selvage::moderation::*;
//! # use selvage::post::PostView;
//! # fn example(post: &PostView, prefs: &ModerationPrefs) {
//! let moderator = LabelModerator::default();
//! let decision = moderator.decide(post, prefs);
//! let list = decision.ui(Surface::ContentList);
//! if list.filter {
//!     // drop the post from the list
//! } else if list.blur {
//!     // show behind a content warning
//! }
//! # }
//! ```

mod decision;
mod labeled;
mod service;
mod surface;
mod types;

#[cfg(test)]
mod tests;

pub use decision::{moderate, moderate_post};
pub use labeled::Labeled;
pub use service::{LabelModerator, ModerationService};
pub use surface::{ModerationUi, Surface};
pub use types::{
    Blur, CauseKind, LabelPref, LabelTarget, LabelValueDefinition, LabelerDefs, ModerationCause,
    ModerationDecision, ModerationPrefs, Severity,
};
