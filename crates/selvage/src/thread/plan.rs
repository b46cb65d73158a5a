use crate::moderation::ModerationUi;
use crate::translate::TranslateAction;
use selvage_common::AtUri;

/// How one flattened thread item should be drawn
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThreadItemPlan {
    /// Deleted locally; render the deleted-post placeholder
    Deleted,
    /// The record couldn't be decoded; render an error row
    InvalidRecord {
        /// The offending post
        uri: AtUri,
        /// What went wrong
        message: String,
    },
    /// The post could not be found on the server
    NotFound {
        /// The missing post
        uri: AtUri,
    },
    /// The viewer can't see the post because of a block
    Blocked {
        /// The blocked post
        uri: AtUri,
    },
    /// The focused post of the thread
    Highlighted(Box<HighlightedLayout>),
    /// Any other post
    Row(Box<RowLayout>),
}

impl ThreadItemPlan {
    /// The row layout, if this is an ordinary row
    pub fn as_row(&self) -> Option<&RowLayout> {
        match self {
            ThreadItemPlan::Row(row) => Some(row),
            _ => None,
        }
    }

    /// The highlighted layout, if this is the focused post
    pub fn as_highlighted(&self) -> Option<&HighlightedLayout> {
        match self {
            ThreadItemPlan::Highlighted(layout) => Some(layout),
            _ => None,
        }
    }
}

/// Layout of the focused post
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightedLayout {
    /// Draw a connector up to the parent (the post is a reply)
    pub top_reply_line: bool,
    /// Avatar moderation
    pub avatar: ModerationUi,
    /// Display name moderation
    pub display_name: ModerationUi,
    /// The author runs a labeler; show the labeler avatar shape
    pub is_labeler: bool,
    /// Offer to follow the author (the viewer isn't the author)
    pub follow_button: bool,
    /// Cover for text and embeds. Ignores mutes: the viewer opened this post on purpose.
    pub content_hider: ModerationUi,
    /// Alerts shown above the text, mutes included
    pub alerts: ModerationUi,
    /// Full post text, never line-limited
    pub text: String,
    /// Repost and like counts; `None` only when both are known to be zero
    pub engagement: Option<Engagement>,
    /// Translation affordance when the post is in another language
    pub translate: Option<TranslateAction>,
    /// Links to the post and its author
    pub links: PostLinks,
}

/// The engagement row under the focused post
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Engagement {
    /// Repost count, linking to the reposters
    pub reposts: Option<EngagementEntry>,
    /// Like count, linking to the likers
    pub likes: Option<EngagementEntry>,
}

/// One count in the engagement row, linking to who did it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngagementEntry {
    /// The count shown
    pub count: i64,
    /// App path listing who did it
    pub href: String,
}

/// App paths related to a post
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostLinks {
    /// The post itself
    pub post: String,
    /// The author's profile
    pub author: String,
    /// Accounts that liked the post
    pub liked_by: String,
    /// Accounts that reposted the post
    pub reposted_by: String,
}

/// Layout of a non-focused post
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowLayout {
    /// Indented reply in tree mode
    pub threaded_child: bool,
    /// Directly below a sibling at the same depth
    pub adjacent_top: bool,
    /// Directly above a sibling at the same depth
    pub adjacent_bottom: bool,
    /// Connector above the avatar
    pub parent_line: bool,
    /// Connector below the avatar
    pub child_line: bool,
    /// Avatar placement
    pub avatar: AvatarPlacement,
    /// Space above the row
    pub top_spacer: Spacing,
    /// Space below the row
    pub bottom_padding: Spacing,
    /// Number of indentation guides left of the post
    pub indent_guides: u32,
    /// Draw a separator above the row
    pub top_border: bool,
    /// Body text and truncation
    pub text: TextPlan,
    /// Link to the post to see replies that weren't loaded
    pub load_more: bool,
    /// Cover for the whole row (`contentList`)
    pub hider: ModerationUi,
    /// Cover for the author's avatar
    pub avatar_moderation: ModerationUi,
    /// The author carries labels; show a warning next to their name
    pub author_has_warning: bool,
    /// The author runs a labeler
    pub is_labeler: bool,
    /// App path of the post
    pub href: String,
}

/// Where the author's avatar goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvatarPlacement {
    /// Own column left of the post, large
    Standalone,
    /// Small, inline with the author's name
    Inline,
}

/// Vertical spacing step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Spacing {
    /// No gap
    None,
    /// Small gap between siblings
    Tight,
    /// Default gap
    Regular,
}

/// Body text and its truncation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextPlan {
    /// Post text
    pub text: String,
    /// Whether the text is cut off
    pub line_limit: LineLimit,
    /// Lines to show while collapsed
    pub max_lines: usize,
}

impl TextPlan {
    /// Whether the text is cut off with a "show more" affordance
    pub fn show_more(&self) -> bool {
        self.line_limit == LineLimit::Collapsed
    }
}

/// Truncation state of a post's text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineLimit {
    /// Shown in full
    Full,
    /// Cut off after the configured number of lines
    Collapsed,
}
