//! The post options ("...") menu
//!
//! [`PostOptions::build`] lists what the menu offers for a post, grouped the way it is
//! displayed. [`PostOptions::select`] turns a picked entry into a [`MenuEffect`] for the
//! caller to carry out; the local state those effects touch (muted threads, hidden
//! posts, queued feed feedback, the shadow store) is updated through the helpers here.

use crate::feedback::{FeedFeedback, Interaction, InteractionEvent};
use crate::links::{profile_link, share_url};
use crate::post::PostView;
use crate::prefs::{Viewer, ViewerPrefs};
use crate::shadow::{PostAction, PostShadowStore};
use crate::translate::{TranslateAction, translate_action};
use selvage_common::AtUri;
use smol_str::SmolStr;
use std::collections::HashSet;

/// Account label asking not to be shown to logged-out visitors
pub const NO_UNAUTHENTICATED: &str = "!no-unauthenticated";

/// One entry of the menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuItem {
    /// Translate the post
    Translate,
    /// Copy the post text
    CopyText,
    /// Native share sheet, or copying the link on web
    Share {
        /// Shown as "Copy link to post" rather than "Share"
        copy_link: bool,
        /// Warn that logged-out visitors won't be able to see the post
        requires_logged_out_warning: bool,
    },
    /// Get embed code for the post
    Embed,
    /// Ask the feed for more posts like this
    ShowMore,
    /// Ask the feed for fewer posts like this
    ShowLess,
    /// Mute notifications for the thread
    MuteThread,
    /// Unmute the thread
    UnmuteThread,
    /// Open the muted words and tags dialog
    MuteWords,
    /// Hide the post for the viewer
    Hide,
    /// Report the post to moderators
    Report,
    /// Delete the viewer's own post
    Delete,
}

/// Entries shown together between dividers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuGroup {
    /// Entries in display order
    pub items: Vec<MenuItem>,
}

impl MenuGroup {
    fn of(items: Vec<MenuItem>) -> Option<Self> {
        (!items.is_empty()).then_some(Self { items })
    }
}

/// Threads the viewer muted, by root post
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MutedThreads(HashSet<AtUri>);

impl MutedThreads {
    /// No muted threads
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the thread rooted at `root` is muted
    pub fn is_muted(&self, root: &AtUri) -> bool {
        self.0.contains(root)
    }

    /// Mute or unmute the thread rooted at `root`. Returns whether it is now muted.
    pub fn toggle(&mut self, root: &AtUri) -> bool {
        if self.0.remove(root) {
            false
        } else {
            self.0.insert(root.clone());
            true
        }
    }
}

/// Posts the viewer hid from their feeds
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HiddenPosts(HashSet<AtUri>);

impl HiddenPosts {
    /// Nothing hidden
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the viewer hid `uri`
    pub fn is_hidden(&self, uri: &AtUri) -> bool {
        self.0.contains(uri)
    }

    /// Hide `uri`
    pub fn hide(&mut self, uri: AtUri) {
        self.0.insert(uri);
    }

    /// Show `uri` again
    pub fn unhide(&mut self, uri: &AtUri) {
        self.0.remove(uri);
    }
}

/// What the menu needs to know about the post and the viewer
#[derive(Debug, Clone, Copy)]
pub struct MenuContext<'a> {
    /// The post the menu is for
    pub post: &'a PostView,
    /// Who opened the menu
    pub viewer: &'a Viewer,
    /// The viewer's preferences
    pub prefs: &'a ViewerPrefs,
    /// Threads the viewer muted
    pub muted_threads: &'a MutedThreads,
    /// Posts the viewer hid
    pub hidden_posts: &'a HiddenPosts,
    /// Whether the feed the post was shown in accepts feedback
    pub feed_feedback: bool,
    /// Context the feed attached to the post
    pub feed_context: Option<&'a str>,
}

/// Something the caller should do after an entry was picked
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuEffect {
    /// Show or open a translation
    Translate(TranslateAction),
    /// Put the text on the clipboard
    CopyText(String),
    /// Share or copy the post link
    Share {
        /// Absolute link to the post
        url: String,
    },
    /// Ask before sharing a post logged-out visitors can't open
    LoggedOutWarning {
        /// Absolute link to the post
        url: String,
    },
    /// Show the embed code dialog
    OpenEmbedDialog {
        /// Post to embed
        uri: AtUri,
        /// Version of the post to embed
        cid: SmolStr,
    },
    /// Queue feedback for the feed
    SendFeedback(Interaction),
    /// Flip the mute of the thread rooted at `root`
    ToggleThreadMute {
        /// First post of the thread
        root: AtUri,
    },
    /// Open the muted words dialog
    OpenMutedWords,
    /// Ask before hiding; then [`HiddenPosts::hide`]
    ConfirmHide {
        /// Post to hide
        uri: AtUri,
    },
    /// Open the report flow
    OpenReport {
        /// Reported post
        uri: AtUri,
        /// Reported version of the post
        cid: SmolStr,
    },
    /// Ask before deleting; then [`PostOptions::confirm_delete`]
    ConfirmDelete {
        /// Post to delete
        uri: AtUri,
    },
}

/// Builder of the post options menu
pub struct PostOptions;

impl PostOptions {
    /// The menu for a post, as groups of entries
    pub fn build(ctx: &MenuContext<'_>) -> Vec<MenuGroup> {
        let post = ctx.post;
        let has_session = ctx.viewer.has_session();
        let is_author = ctx.viewer.is(&post.author.did);
        let hide_in_pwi = post.author.has_label(NO_UNAUTHENTICATED);

        let mut general = Vec::new();
        if !hide_in_pwi || has_session {
            general.extend([MenuItem::Translate, MenuItem::CopyText]);
        }
        general.push(MenuItem::Share {
            copy_link: ctx.prefs.platform.is_web(),
            requires_logged_out_warning: hide_in_pwi,
        });
        if ctx.prefs.platform.is_web() && ctx.prefs.wide_layout && !hide_in_pwi {
            general.push(MenuItem::Embed);
        }

        let mut feedback = Vec::new();
        if has_session && ctx.feed_feedback {
            feedback.extend([MenuItem::ShowMore, MenuItem::ShowLess]);
        }

        let mut muting = Vec::new();
        let mut ownership = Vec::new();
        if has_session {
            let root = root_uri(post);
            muting.push(if ctx.muted_threads.is_muted(&root) {
                MenuItem::UnmuteThread
            } else {
                MenuItem::MuteThread
            });
            muting.push(MenuItem::MuteWords);
            if !is_author && !ctx.hidden_posts.is_hidden(&post.uri) {
                muting.push(MenuItem::Hide);
            }
            ownership.push(if is_author {
                MenuItem::Delete
            } else {
                MenuItem::Report
            });
        }

        [general, feedback, muting, ownership]
            .into_iter()
            .filter_map(MenuGroup::of)
            .collect()
    }

    /// What picking `item` should do. `None` when it has nothing to act on (translating
    /// without a primary language).
    #[cfg_attr(feature = "tracing", tracing::instrument(level = "debug", skip(ctx), fields(uri = %ctx.post.uri)))]
    pub fn select(ctx: &MenuContext<'_>, item: MenuItem) -> Option<MenuEffect> {
        let post = ctx.post;
        let text = || {
            post.post_record()
                .map(|record| record.text)
                .unwrap_or_default()
        };
        let url = || share_url(&profile_link(&post.author, post.uri.rkey(), None));
        let feedback = |event| {
            MenuEffect::SendFeedback(Interaction {
                item: post.uri.clone(),
                event,
                feed_context: ctx.feed_context.map(SmolStr::new),
            })
        };

        Some(match item {
            MenuItem::Translate => MenuEffect::Translate(translate_action(&text(), ctx.prefs)?),
            MenuItem::CopyText => MenuEffect::CopyText(text()),
            MenuItem::Share {
                requires_logged_out_warning: true,
                ..
            } => MenuEffect::LoggedOutWarning { url: url() },
            MenuItem::Share { .. } => MenuEffect::Share { url: url() },
            MenuItem::Embed => MenuEffect::OpenEmbedDialog {
                uri: post.uri.clone(),
                cid: post.cid.clone(),
            },
            MenuItem::ShowMore => feedback(InteractionEvent::RequestMore),
            MenuItem::ShowLess => feedback(InteractionEvent::RequestLess),
            MenuItem::MuteThread | MenuItem::UnmuteThread => MenuEffect::ToggleThreadMute {
                root: root_uri(post),
            },
            MenuItem::MuteWords => MenuEffect::OpenMutedWords,
            MenuItem::Hide => MenuEffect::ConfirmHide {
                uri: post.uri.clone(),
            },
            MenuItem::Report => MenuEffect::OpenReport {
                uri: post.uri.clone(),
                cid: post.cid.clone(),
            },
            MenuItem::Delete => MenuEffect::ConfirmDelete {
                uri: post.uri.clone(),
            },
        })
    }

    /// Carry out the effects that only touch local state.
    ///
    /// Returns the effect back when it needs the caller (a dialog, the clipboard, a
    /// share sheet, a translator).
    pub fn apply_local(
        effect: MenuEffect,
        muted_threads: &mut MutedThreads,
        feedback: &mut FeedFeedback,
    ) -> Option<MenuEffect> {
        match effect {
            MenuEffect::ToggleThreadMute { root } => {
                muted_threads.toggle(&root);
                None
            }
            MenuEffect::SendFeedback(interaction) => {
                feedback.send(interaction);
                None
            }
            other => Some(other),
        }
    }

    /// The viewer confirmed deleting `post`: it disappears locally right away
    pub fn confirm_delete(store: &PostShadowStore, post: &PostView) {
        store.apply(post, PostAction::Delete);
    }

    /// The viewer confirmed hiding `post`
    pub fn confirm_hide(hidden: &mut HiddenPosts, post: &PostView) {
        hidden.hide(post.uri.clone());
    }
}

fn root_uri(post: &PostView) -> AtUri {
    match post.post_record() {
        Ok(record) => record.root_uri(&post.uri).clone(),
        Err(_) => post.uri.clone(),
    }
}
