use super::plan::{
    AvatarPlacement, Engagement, EngagementEntry, HighlightedLayout, LineLimit, PostLinks,
    RowLayout, Spacing, TextPlan, ThreadItemPlan,
};
use super::{ThreadMode, ThreadPosition};
use crate::links::{PostSuffix, profile_link};
use crate::moderation::{ModerationDecision, Surface};
use crate::post::{PostRecord, PostView};
use crate::prefs::{Viewer, ViewerPrefs};
use crate::shadow::Shadowed;
use crate::translate::{needs_translation, translate_action};

/// Everything needed to plan one thread item
#[derive(Debug, Clone, Copy)]
pub struct ThreadItemInput<'a> {
    /// The post after merging its shadow
    pub post: &'a Shadowed<PostView>,
    /// Where the post sits in the flattened thread
    pub position: &'a ThreadPosition,
    /// Moderation decision for the post
    pub moderation: &'a ModerationDecision,
    /// Truncation state remembered from an earlier render, if any
    pub line_limit: Option<LineLimit>,
}

/// Decides how each post of a thread is laid out for one viewer
#[derive(Debug, Clone, Default)]
pub struct ThreadRenderPolicy {
    /// The viewer's preferences
    pub prefs: ViewerPrefs,
    /// Who is looking
    pub viewer: Viewer,
}

impl ThreadRenderPolicy {
    /// Policy for `viewer` with `prefs`
    pub fn new(prefs: ViewerPrefs, viewer: Viewer) -> Self {
        Self { prefs, viewer }
    }

    /// Plan one thread item.
    ///
    /// A locally deleted post is always [`ThreadItemPlan::Deleted`], whatever its
    /// moderation says. An undecodable record is [`ThreadItemPlan::InvalidRecord`].
    #[cfg_attr(feature = "tracing", tracing::instrument(level = "trace", skip_all, fields(depth = input.position.depth)))]
    pub fn plan(&self, input: &ThreadItemInput<'_>) -> ThreadItemPlan {
        let Shadowed::Normal(post) = input.post else {
            return ThreadItemPlan::Deleted;
        };
        let record = match post.post_record() {
            Ok(record) => record,
            Err(err) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(uri = %post.uri, error = %err, "invalid post record in thread");
                return ThreadItemPlan::InvalidRecord {
                    uri: post.uri.clone(),
                    message: err.to_string(),
                };
            }
        };

        if input.position.is_highlighted {
            ThreadItemPlan::Highlighted(Box::new(self.highlighted(post, &record, input)))
        } else {
            ThreadItemPlan::Row(Box::new(self.row(post, record, input)))
        }
    }

    fn highlighted(
        &self,
        post: &PostView,
        record: &PostRecord,
        input: &ThreadItemInput<'_>,
    ) -> HighlightedLayout {
        let moderation = input.moderation;
        let links = post_links(post);

        // hidden only when both counts are known to be zero
        let engagement = (post.repost_count != Some(0) || post.like_count != Some(0)).then(|| {
            let entry = |count: Option<i64>, href: &str| {
                count.filter(|n| *n != 0).map(|count| EngagementEntry {
                    count,
                    href: href.to_owned(),
                })
            };
            Engagement {
                reposts: entry(post.repost_count, &links.reposted_by),
                likes: entry(post.like_count, &links.liked_by),
            }
        });

        let translate = needs_translation(record, &self.prefs)
            .then(|| translate_action(&record.text, &self.prefs))
            .flatten();

        HighlightedLayout {
            top_reply_line: record.root_uri(&post.uri) != &post.uri,
            avatar: moderation.ui(Surface::Avatar),
            display_name: moderation.ui(Surface::DisplayName),
            is_labeler: post.author.is_labeler(),
            follow_button: !self.viewer.is(&post.author.did),
            content_hider: moderation.ui_with(Surface::ContentView, true),
            alerts: moderation.ui(Surface::ContentView),
            text: record.text.clone(),
            engagement,
            translate,
            links,
        }
    }

    fn row(&self, post: &PostView, record: PostRecord, input: &ThreadItemInput<'_>) -> RowLayout {
        let pos = input.position;
        let depth = pos.depth;

        let threaded_child = pos.mode == ThreadMode::Tree && depth > 0;
        let adjacent_top = threaded_child && pos.prev_depth == Some(depth) && depth != 1;
        let adjacent_bottom = threaded_child && pos.next_depth == Some(depth);
        let parent_line = !threaded_child && pos.show_parent_reply_line && !record.is_root();
        let child_line = !threaded_child && pos.show_child_reply_line;

        let bottom_padding = if child_line {
            Spacing::None
        } else if adjacent_bottom {
            Spacing::Tight
        } else {
            Spacing::Regular
        };
        let top_border = if threaded_child {
            depth == 1
        } else {
            !(pos.show_parent_reply_line && pos.has_preceding_item)
        };

        let max_lines = self.prefs.max_post_lines;
        let line_limit = input.line_limit.unwrap_or_else(|| {
            if count_lines(&record.text) > max_lines {
                LineLimit::Collapsed
            } else {
                LineLimit::Full
            }
        });

        RowLayout {
            threaded_child,
            adjacent_top,
            adjacent_bottom,
            parent_line,
            child_line,
            avatar: if threaded_child {
                AvatarPlacement::Inline
            } else {
                AvatarPlacement::Standalone
            },
            top_spacer: if adjacent_top {
                Spacing::Tight
            } else {
                Spacing::Regular
            },
            bottom_padding,
            indent_guides: if threaded_child { (depth - 1) as u32 } else { 0 },
            top_border,
            text: TextPlan {
                text: record.text,
                line_limit,
                max_lines,
            },
            load_more: pos.has_more,
            hider: input.moderation.ui(Surface::ContentList),
            avatar_moderation: input.moderation.ui(Surface::Avatar),
            author_has_warning: post.author.labels.as_ref().is_some_and(|l| !l.is_empty()),
            is_labeler: post.author.is_labeler(),
            href: post_href(post),
        }
    }
}

/// Number of lines `text` renders as; empty text has none
pub fn count_lines(text: &str) -> usize {
    if text.is_empty() {
        0
    } else {
        text.split('\n').count()
    }
}

fn post_href(post: &PostView) -> String {
    profile_link(&post.author, post.uri.rkey(), None)
}

fn post_links(post: &PostView) -> PostLinks {
    let rkey = post.uri.rkey();
    PostLinks {
        post: profile_link(&post.author, rkey, None),
        author: profile_link(&post.author, None, None),
        liked_by: profile_link(&post.author, rkey, Some(PostSuffix::LikedBy)),
        reposted_by: profile_link(&post.author, rkey, Some(PostSuffix::RepostedBy)),
    }
}
