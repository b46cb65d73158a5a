use crate::post::PostView;
use serde_json::{Value, json};

pub(crate) const ALICE: &str = "did:plc:alice";
pub(crate) const BOB: &str = "did:plc:bob";

pub(crate) fn post_uri(did: &str, rkey: &str) -> String {
    format!("at://{did}/app.bsky.feed.post/{rkey}")
}

pub(crate) fn record(text: &str) -> Value {
    json!({
        "$type": "app.bsky.feed.post",
        "text": text,
        "createdAt": "2024-05-01T12:00:00.000Z",
    })
}

pub(crate) fn reply_record(text: &str, root: &str, parent: &str) -> Value {
    json!({
        "$type": "app.bsky.feed.post",
        "text": text,
        "reply": {
            "root": { "uri": root, "cid": "bafyroot" },
            "parent": { "uri": parent, "cid": "bafyparent" },
        },
        "createdAt": "2024-05-01T12:00:00.000Z",
    })
}

pub(crate) fn post_with(did: &str, rkey: &str, record: Value) -> PostView {
    let handle = format!("{}.test", did.rsplit(':').next().unwrap());
    serde_json::from_value(json!({
        "uri": post_uri(did, rkey),
        "cid": format!("bafy{rkey}"),
        "author": { "did": did, "handle": handle },
        "record": record,
        "likeCount": 5,
        "repostCount": 1,
        "replyCount": 0,
        "indexedAt": "2024-05-01T12:00:00.000Z",
    }))
    .unwrap()
}

pub(crate) fn post(did: &str, rkey: &str, text: &str) -> PostView {
    post_with(did, rkey, record(text))
}
