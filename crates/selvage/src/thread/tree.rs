use super::{ThreadMode, ThreadPosition};
use crate::error::{Error, Result};
use crate::post::PostView;
use selvage_common::AtUri;
use serde::{Deserialize, Serialize};

/// A node of a fetched thread (`app.bsky.feed.getPostThread`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "$type")]
pub enum ThreadNode {
    /// A loaded post
    #[serde(rename = "app.bsky.feed.defs#threadViewPost")]
    Post(ThreadViewPost),
    /// A deleted or missing post
    #[serde(rename = "app.bsky.feed.defs#notFoundPost")]
    NotFound(NotFoundPost),
    /// A post hidden by a block
    #[serde(rename = "app.bsky.feed.defs#blockedPost")]
    Blocked(BlockedPost),
}

impl ThreadNode {
    /// Parse a `getPostThread` response body or its `thread` member
    pub fn from_json(json: &str) -> Result<Self> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Body {
            Output { thread: ThreadNode },
            Node(ThreadNode),
        }
        match serde_json::from_str(json).map_err(|e| Error::parse("thread", e))? {
            Body::Output { thread } | Body::Node(thread) => Ok(thread),
        }
    }

    /// URI of the post this node stands for
    pub fn uri(&self) -> &AtUri {
        match self {
            ThreadNode::Post(node) => &node.post.uri,
            ThreadNode::NotFound(node) => &node.uri,
            ThreadNode::Blocked(node) => &node.uri,
        }
    }
}

/// A loaded post with its context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadViewPost {
    /// The post
    pub post: PostView,
    /// The post it replies to, when loaded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<Box<ThreadNode>>,
    /// Loaded replies; `None` when the server didn't include them
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replies: Option<Vec<ThreadNode>>,
}

/// A post that no longer exists
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotFoundPost {
    /// URI of the missing post
    pub uri: AtUri,
    /// Always `true` on the wire
    #[serde(default)]
    pub not_found: bool,
}

/// A post hidden from the viewer by a block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockedPost {
    /// URI of the blocked post
    pub uri: AtUri,
    /// Always `true` on the wire
    #[serde(default)]
    pub blocked: bool,
}

/// One row of a flattened thread
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlatItem {
    /// A loaded post
    Post {
        /// The post
        post: PostView,
        /// Where it sits in the thread
        position: ThreadPosition,
    },
    /// Placeholder for a missing post
    NotFound {
        /// URI of the missing post
        uri: AtUri,
        /// Depth of the row
        depth: i32,
    },
    /// Placeholder for a blocked post
    Blocked {
        /// URI of the blocked post
        uri: AtUri,
        /// Depth of the row
        depth: i32,
    },
}

impl FlatItem {
    /// Depth of the row relative to the highlighted post
    pub fn depth(&self) -> i32 {
        match self {
            FlatItem::Post { position, .. } => position.depth,
            FlatItem::NotFound { depth, .. } | FlatItem::Blocked { depth, .. } => *depth,
        }
    }

    /// The post, if this row has one
    pub fn post(&self) -> Option<(&PostView, &ThreadPosition)> {
        match self {
            FlatItem::Post { post, position } => Some((post, position)),
            _ => None,
        }
    }
}

struct Pending<'a> {
    node: &'a ThreadNode,
    depth: i32,
    has_parent: bool,
}

/// Flatten a thread around its highlighted post.
///
/// Ancestors come first (root at the top, negative depths), then the highlighted post at
/// depth 0, then replies depth-first, each one level deeper than its parent.
#[cfg_attr(feature = "tracing", tracing::instrument(level = "debug", skip(highlighted), fields(uri = %highlighted.uri())))]
pub fn flatten(highlighted: &ThreadNode, mode: ThreadMode) -> Vec<FlatItem> {
    let mut pending = Vec::new();

    let mut ancestors = Vec::new();
    let mut cursor = highlighted;
    while let ThreadNode::Post(ThreadViewPost {
        parent: Some(parent),
        ..
    }) = cursor
    {
        ancestors.push(parent.as_ref());
        cursor = parent.as_ref();
    }
    let ancestor_count = ancestors.len() as i32;
    for (i, node) in ancestors.into_iter().rev().enumerate() {
        pending.push(Pending {
            node,
            depth: i as i32 - ancestor_count,
            has_parent: has_parent(node),
        });
    }

    pending.push(Pending {
        node: highlighted,
        depth: 0,
        has_parent: has_parent(highlighted),
    });
    if let ThreadNode::Post(view) = highlighted {
        push_replies(view, 1, &mut pending);
    }

    let depth_of_post = |i: usize| {
        pending
            .get(i)
            .filter(|p| matches!(p.node, ThreadNode::Post(_)))
            .map(|p| p.depth)
    };

    let items: Vec<FlatItem> = pending
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let depth = item.depth;
            let view = match item.node {
                ThreadNode::Post(view) => view,
                ThreadNode::NotFound(node) => {
                    return FlatItem::NotFound {
                        uri: node.uri.clone(),
                        depth,
                    };
                }
                ThreadNode::Blocked(node) => {
                    return FlatItem::Blocked {
                        uri: node.uri.clone(),
                        depth,
                    };
                }
            };

            let prev_depth = index.checked_sub(1).and_then(depth_of_post);
            let next_depth = depth_of_post(index + 1);
            let show_parent_reply_line = (depth < 0 && item.has_parent) || depth > 1;
            // a reply whose parent wasn't part of the response still hangs off something
            let orphaned_reply = index == 0
                && !item.has_parent
                && view
                    .post
                    .post_record()
                    .is_ok_and(|record| record.reply.is_some());

            FlatItem::Post {
                post: view.post.clone(),
                position: ThreadPosition {
                    depth,
                    is_highlighted: depth == 0,
                    has_more: depth > 0
                        && view.replies.as_ref().is_none_or(Vec::is_empty)
                        && view.post.reply_count.unwrap_or(0) > 0,
                    show_parent_reply_line,
                    show_child_reply_line: next_depth.is_some_and(|next| next > depth),
                    has_preceding_item: show_parent_reply_line || orphaned_reply,
                    prev_depth,
                    next_depth,
                    mode,
                },
            }
        })
        .collect();

    #[cfg(feature = "tracing")]
    tracing::debug!(items = items.len(), "flattened thread");
    items
}

fn has_parent(node: &ThreadNode) -> bool {
    matches!(node, ThreadNode::Post(ThreadViewPost { parent: Some(_), .. }))
}

fn push_replies<'a>(view: &'a ThreadViewPost, depth: i32, pending: &mut Vec<Pending<'a>>) {
    for reply in view.replies.iter().flatten() {
        pending.push(Pending {
            node: reply,
            depth,
            has_parent: true,
        });
        if let ThreadNode::Post(child) = reply {
            push_replies(child, depth + 1, pending);
        }
    }
}
