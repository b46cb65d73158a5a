use crate::error::{Error, Result};
use selvage_common::{AtUri, Datetime, Did, Handle, Language};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use smol_str::SmolStr;

/// NSID of post records
pub const POST_NSID: &str = "app.bsky.feed.post";

/// A post as served by the AppView (`app.bsky.feed.defs#postView`).
///
/// This is the canonical, server-confirmed snapshot. It is never mutated in place;
/// local changes live in a [`Shadow`](crate::shadow::Shadow) and are merged on read.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    /// The post's at:// URI
    pub uri: AtUri,
    /// CID of the record version this view was built from
    pub cid: SmolStr,
    /// Who wrote it
    pub author: ProfileViewBasic,
    /// The raw post record. Decode with [`PostView::post_record`].
    pub record: Value,
    /// Hydrated embed view, left undecoded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embed: Option<Value>,
    /// Number of likes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub like_count: Option<i64>,
    /// Number of reposts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repost_count: Option<i64>,
    /// Number of direct replies
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_count: Option<i64>,
    /// Number of quote posts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote_count: Option<i64>,
    /// When the AppView indexed the post
    pub indexed_at: Datetime,
    /// Labels applied to the post by labelers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<Label>>,
    /// The viewer's own relationship to the post
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewer: Option<ViewerState>,
    /// Reply restrictions, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threadgate: Option<Value>,
}

impl PostView {
    /// Decode the embedded record as an `app.bsky.feed.post`.
    ///
    /// Fails with [`Error::InvalidRecord`] when the record is missing required fields
    /// or declares a different `$type`.
    pub fn post_record(&self) -> Result<PostRecord> {
        let invalid = |source| Error::InvalidRecord {
            uri: self.uri.clone(),
            source,
        };
        if let Some(ty) = self.record.get("$type").and_then(Value::as_str) {
            if ty != POST_NSID {
                return Err(invalid(<serde_json::Error as serde::de::Error>::custom(
                    format_args!("expected `{POST_NSID}`, found `{ty}`"),
                )));
            }
        }
        PostRecord::deserialize(&self.record).map_err(invalid)
    }

    /// Whether the post was written by `did`
    pub fn is_by(&self, did: &Did) -> bool {
        &self.author.did == did
    }

    /// The viewer's like record, if they have liked this post
    pub fn viewer_like(&self) -> Option<&AtUri> {
        self.viewer.as_ref().and_then(|v| v.like.as_ref())
    }

    /// The viewer's repost record, if they have reposted this post
    pub fn viewer_repost(&self) -> Option<&AtUri> {
        self.viewer.as_ref().and_then(|v| v.repost.as_ref())
    }
}

/// The viewer's relationship to a post
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ViewerState {
    /// The viewer's like record
    #[serde(skip_serializing_if = "Option::is_none")]
    pub like: Option<AtUri>,
    /// The viewer's repost record
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repost: Option<AtUri>,
    /// The viewer muted the thread this post is in
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread_muted: Option<bool>,
    /// Replies are closed to the viewer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_disabled: Option<bool>,
    /// The author disallowed quoting
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embedding_disabled: Option<bool>,
    /// Pinned to the viewer's profile
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pinned: Option<bool>,
}

/// Decoded `app.bsky.feed.post` record
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PostRecord {
    /// Post body
    #[serde(default)]
    pub text: String,
    /// Languages the author declared
    #[serde(skip_serializing_if = "Option::is_none")]
    pub langs: Option<Vec<Language>>,
    /// Set when the post is a reply
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply: Option<ReplyRef>,
    /// Labels the author applied to their own post
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<SelfLabels>,
    /// Rich text annotations, left undecoded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facets: Option<Value>,
    /// Client-declared creation time
    pub created_at: Datetime,
}

impl PostRecord {
    /// The thread root this post belongs to, or `own` when it is itself a root
    pub fn root_uri<'a>(&'a self, own: &'a AtUri) -> &'a AtUri {
        self.reply.as_ref().map(|r| &r.root.uri).unwrap_or(own)
    }

    /// Whether this post starts a thread
    pub fn is_root(&self) -> bool {
        self.reply.is_none()
    }
}

/// Reply references of a post record
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ReplyRef {
    /// First post of the thread
    pub root: StrongRef,
    /// Post being replied to
    pub parent: StrongRef,
}

/// `com.atproto.repo.strongRef`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct StrongRef {
    /// Record URI
    pub uri: AtUri,
    /// Record version
    pub cid: SmolStr,
}

/// Basic profile view of a post author (`app.bsky.actor.defs#profileViewBasic`)
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProfileViewBasic {
    /// Account DID
    pub did: Did,
    /// Current handle, `handle.invalid` when it failed verification
    pub handle: Handle,
    /// Display name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<SmolStr>,
    /// Avatar image URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<SmolStr>,
    /// Services the account runs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub associated: Option<ProfileAssociated>,
    /// The viewer's relationship to the account
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewer: Option<ProfileViewerState>,
    /// Labels applied to the account
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<Label>>,
    /// Account creation time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Datetime>,
}

impl ProfileViewBasic {
    /// Whether this account runs a labeler service
    pub fn is_labeler(&self) -> bool {
        self.associated
            .as_ref()
            .and_then(|a| a.labeler)
            .unwrap_or(false)
    }

    /// Whether any label (from any source) with value `val` is applied to the account
    pub fn has_label(&self, val: &str) -> bool {
        self.labels
            .as_deref()
            .unwrap_or_default()
            .iter()
            .any(|l| l.val == val && !l.neg.unwrap_or(false))
    }

    /// Whether the viewer has muted this account
    pub fn is_muted(&self) -> bool {
        self.viewer
            .as_ref()
            .and_then(|v| v.muted)
            .unwrap_or(false)
    }
}

/// Extra account metadata
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileAssociated {
    /// The account runs a labeler
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labeler: Option<bool>,
}

/// The viewer's relationship to an account
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProfileViewerState {
    /// The viewer muted the account
    #[serde(skip_serializing_if = "Option::is_none")]
    pub muted: Option<bool>,
    /// The account blocks the viewer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocked_by: Option<bool>,
    /// The viewer's block record, if they block the account
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocking: Option<AtUri>,
    /// The viewer's follow record
    #[serde(skip_serializing_if = "Option::is_none")]
    pub following: Option<AtUri>,
}

/// Metadata tag on an atproto resource (`com.atproto.label.defs#label`)
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Label {
    /// The labeler that emitted this label
    pub src: Did,
    /// Subject: a bare DID for account labels, an at:// URI for records
    pub uri: SmolStr,
    /// Version of the subject record the label applies to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cid: Option<SmolStr>,
    /// Label value, e.g. `porn` or `!hide`
    pub val: SmolStr,
    /// Withdraws an earlier label with the same value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub neg: Option<bool>,
    /// When the label was created
    pub cts: Datetime,
    /// When the label stops applying
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<Datetime>,
    /// Label format version
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ver: Option<i64>,
}

/// Labels the author applied to their own record
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct SelfLabels {
    /// The applied values
    pub values: Vec<SelfLabel>,
}

/// A single self-applied label value
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SelfLabel {
    /// Label value
    pub val: SmolStr,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn post(record: Value) -> PostView {
        serde_json::from_value(json!({
            "uri": "at://did:plc:alice/app.bsky.feed.post/3kabc",
            "cid": "bafyreiabc",
            "author": { "did": "did:plc:alice", "handle": "alice.test" },
            "record": record,
            "indexedAt": "2024-05-01T12:00:00.000Z",
        }))
        .unwrap()
    }

    #[test]
    fn decodes_post_record() {
        let view = post(json!({
            "$type": "app.bsky.feed.post",
            "text": "hello",
            "langs": ["en"],
            "createdAt": "2024-05-01T12:00:00.000Z",
        }));
        let record = view.post_record().unwrap();
        assert_eq!(record.text, "hello");
        assert!(record.is_root());
        assert_eq!(record.root_uri(&view.uri), &view.uri);
    }

    #[test]
    fn rejects_foreign_record_type() {
        let view = post(json!({
            "$type": "app.bsky.feed.like",
            "createdAt": "2024-05-01T12:00:00.000Z",
        }));
        assert!(matches!(
            view.post_record(),
            Err(Error::InvalidRecord { .. })
        ));
    }

    #[test]
    fn rejects_record_without_timestamp() {
        let view = post(json!({ "text": "no date" }));
        assert!(view.post_record().is_err());
    }

    #[test]
    fn negated_labels_do_not_count() {
        let mut view = post(json!({}));
        view.author.labels = Some(vec![Label {
            src: Did::new("did:plc:labeler").unwrap(),
            uri: "did:plc:alice".into(),
            cid: None,
            val: "!no-unauthenticated".into(),
            neg: Some(true),
            cts: "2024-05-01T12:00:00.000Z".parse().unwrap(),
            exp: None,
            ver: None,
        }]);
        assert!(!view.author.has_label("!no-unauthenticated"));
    }
}
