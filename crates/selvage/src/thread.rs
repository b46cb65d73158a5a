//! Thread flattening and per-post render plans
//!
//! A fetched thread is a tree around one highlighted post: its ancestors above, its
//! replies below. [`flatten`] turns the tree into the rows a list renders, each with a
//! [`ThreadPosition`]. [`ThreadRenderPolicy`] then decides how every row is drawn
//! (reply connector lines, threaded indentation, spacing, line limiting, moderation
//! covers) and returns a [`ThreadItemPlan`] describing it.
//!
//! Line limiting is stateful: a long reply starts collapsed and stays expanded once the
//! viewer asks for more. That state lives in a [`ThreadSession`], one per mounted
//! thread screen.
//!
//! ```
//! # use selvage::moderation::{LabelModerator, ModerationPrefs};
//! # use selvage::prefs::{Viewer, ViewerPrefs};
//! # use selvage::shadow::PostShadowStore;
//! # use selvage::thread::*;
//! # fn example(root: &ThreadNode) {
//! let policy = ThreadRenderPolicy::new(ViewerPrefs::default(), Viewer::anonymous());
//! let mut session = ThreadSession::new();
//! let plans = session.plan_thread(
//!     &policy,
//!     &flatten(root, ThreadMode::Tree),
//!     &PostShadowStore::new(),
//!     &LabelModerator::default(),
//!     &ModerationPrefs::default(),
//! );
//! # }
//! ```

mod plan;
mod policy;
mod session;
mod tree;


pub use plan::{
    AvatarPlacement, Engagement, EngagementEntry, HighlightedLayout, LineLimit, PostLinks,
    RowLayout, Spacing, TextPlan, ThreadItemPlan,
};
pub use policy::{ThreadItemInput, ThreadRenderPolicy, count_lines};
pub use session::ThreadSession;
pub use tree::{BlockedPost, FlatItem, NotFoundPost, ThreadNode, ThreadViewPost, flatten};

use serde::{Deserialize, Serialize};

/// How replies are laid out
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ThreadMode {
    /// Flat list with connector lines between a post and its replies
    #[default]
    Linear,
    /// Indented tree, one guide per level of nesting
    Tree,
}

/// Where a post sits in the flattened thread
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadPosition {
    /// Negative for ancestors of the highlighted post, 0 for it, positive for replies
    pub depth: i32,
    /// The focused post
    pub is_highlighted: bool,
    /// The post has replies that weren't loaded
    pub has_more: bool,
    /// Draw a connector up to the post above
    pub show_parent_reply_line: bool,
    /// Draw a connector down to the reply below
    pub show_child_reply_line: bool,
    /// Something is drawn directly above this post
    pub has_preceding_item: bool,
    /// Depth of the previous post in the list, if the previous row is a post
    pub prev_depth: Option<i32>,
    /// Depth of the next post in the list, if the next row is a post
    pub next_depth: Option<i32>,
    /// Layout mode of the whole thread
    pub mode: ThreadMode,
}
