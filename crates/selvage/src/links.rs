use crate::post::ProfileViewBasic;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use selvage_common::Language;

/// Public web origin that shared links point at
pub const SHARE_ORIGIN: &str = "https://bsky.app";

/// Characters `encodeURIComponent` leaves alone
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Sub-pages of a post
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostSuffix {
    /// Who liked the post
    LikedBy,
    /// Who reposted the post
    RepostedBy,
    /// Posts quoting the post
    Quotes,
}

impl PostSuffix {
    fn as_str(self) -> &'static str {
        match self {
            PostSuffix::LikedBy => "liked-by",
            PostSuffix::RepostedBy => "reposted-by",
            PostSuffix::Quotes => "quotes",
        }
    }
}

/// App path of a profile, or of one of its posts when `rkey` is given.
///
/// Uses the handle, falling back to the DID when the handle failed verification.
pub fn profile_link(
    author: &ProfileViewBasic,
    rkey: Option<&str>,
    suffix: Option<PostSuffix>,
) -> String {
    let actor = if author.handle.is_invalid() {
        author.did.as_str()
    } else {
        author.handle.as_str()
    };
    let mut path = format!("/profile/{actor}");
    if let Some(rkey) = rkey {
        path.push_str("/post/");
        path.push_str(rkey);
        if let Some(suffix) = suffix {
            path.push('/');
            path.push_str(suffix.as_str());
        }
    }
    path
}

/// Absolute URL for sharing an app path
pub fn share_url(path: &str) -> String {
    format!("{SHARE_ORIGIN}{path}")
}

/// External translator URL for `text` into `lang`
pub fn translator_link(text: &str, lang: &Language) -> String {
    format!(
        "https://translate.google.com/?sl=auto&tl={}&text={}",
        encode_component(lang.as_str()),
        encode_component(text)
    )
}

/// Percent-encode the way `encodeURIComponent` does
pub fn encode_component(s: &str) -> String {
    utf8_percent_encode(s, URI_COMPONENT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ALICE, post};
    use selvage_common::Handle;

    #[test]
    fn post_links_use_handle() {
        let author = post(ALICE, "3kone", "hi").author;
        assert_eq!(profile_link(&author, None, None), "/profile/alice.test");
        assert_eq!(
            profile_link(&author, Some("3kone"), Some(PostSuffix::LikedBy)),
            "/profile/alice.test/post/3kone/liked-by"
        );
        assert_eq!(
            profile_link(&author, Some("3kone"), Some(PostSuffix::RepostedBy)),
            "/profile/alice.test/post/3kone/reposted-by"
        );
    }

    #[test]
    fn invalid_handle_falls_back_to_did() {
        let mut author = post(ALICE, "3kone", "hi").author;
        author.handle = Handle::new_static("handle.invalid").unwrap();
        assert_eq!(
            profile_link(&author, Some("3kone"), None),
            "/profile/did:plc:alice/post/3kone"
        );
    }

    #[test]
    fn share_url_prefixes_origin() {
        assert_eq!(
            share_url("/profile/alice.test/post/3kone"),
            "https://bsky.app/profile/alice.test/post/3kone"
        );
    }

    #[test]
    fn translator_link_encodes_like_uri_component() {
        let lang = Language::new("en").unwrap();
        assert_eq!(
            translator_link("¿Qué tal? a&b=c (ok)!", &lang),
            "https://translate.google.com/?sl=auto&tl=en&text=%C2%BFQu%C3%A9%20tal%3F%20a%26b%3Dc%20(ok)!"
        );
    }
}
