use crate::types::string::{AtStrError, Did, Handle};
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de::Error};
use smol_str::{SmolStr, format_smolstr};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::LazyLock;

/// An `at://` URI naming a repo, a collection, or a single record.
///
/// ```text
/// at://did:plc:abc123/app.bsky.feed.post/3k2a4b
///      |-authority---| |-collection-----| |rkey|
/// ```
///
/// Components are split once at construction, lookups are free afterwards.
/// Equality and hashing use the full string.
#[derive(Clone)]
pub struct AtUri {
    uri: SmolStr,
    authority: SmolStr,
    collection: Option<SmolStr>,
    rkey: Option<SmolStr>,
}

static NSID_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z]([a-zA-Z0-9-]{0,62})?(\.[a-zA-Z0-9]([a-zA-Z0-9-]{0,62})?)+$").unwrap()
});

static RKEY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9.\-_:~]{1,512}$").unwrap());

impl AtUri {
    /// Fallible constructor, validates and splits the components
    pub fn new(uri: impl AsRef<str>) -> Result<Self, AtStrError> {
        let uri = uri.as_ref();
        if uri.len() > 8192 {
            return Err(AtStrError::too_long("at-uri-scheme", uri, 8192, uri.len()));
        }
        let Some(rest) = uri.strip_prefix("at://") else {
            return Err(AtStrError::missing("at-uri-scheme", uri, "at://"));
        };
        let rest = rest.split(['?', '#']).next().unwrap_or_default();
        let mut parts = rest.splitn(3, '/');

        let authority = parts.next().unwrap_or_default();
        if Did::new(authority).is_err() && Handle::new(authority).is_err() {
            return Err(AtStrError::invalid_component(
                "at-uri-scheme",
                uri,
                "authority",
                (5, authority.len()),
            ));
        }
        let offset = 5 + authority.len() + 1;

        let collection = match parts.next().filter(|c| !c.is_empty()) {
            Some(c) if NSID_REGEX.is_match(c) => Some(SmolStr::new(c)),
            Some(c) => {
                return Err(AtStrError::invalid_component(
                    "at-uri-scheme",
                    uri,
                    "collection",
                    (offset, c.len()),
                ));
            }
            None => None,
        };

        let rkey = match parts.next().filter(|r| !r.is_empty()) {
            Some(r) if RKEY_REGEX.is_match(r) && r != "." && r != ".." => Some(SmolStr::new(r)),
            Some(r) => {
                let at = offset + collection.as_ref().map(|c| c.len() + 1).unwrap_or(0);
                return Err(AtStrError::invalid_component(
                    "at-uri-scheme",
                    uri,
                    "record key",
                    (at, r.len()),
                ));
            }
            None => None,
        };

        Ok(Self {
            uri: SmolStr::new(uri),
            authority: SmolStr::new(authority),
            collection,
            rkey,
        })
    }

    /// Build a record URI from its parts
    pub fn from_parts(authority: &Did, collection: &str, rkey: &str) -> Result<Self, AtStrError> {
        Self::new(format_smolstr!("at://{authority}/{collection}/{rkey}"))
    }

    /// The repo authority (a DID or a handle)
    pub fn authority(&self) -> &str {
        &self.authority
    }

    /// The authority as a DID, if it is one
    pub fn did(&self) -> Option<Did> {
        Did::new(&self.authority).ok()
    }

    /// The collection NSID, if present
    pub fn collection(&self) -> Option<&str> {
        self.collection.as_deref()
    }

    /// The record key, if present
    pub fn rkey(&self) -> Option<&str> {
        self.rkey.as_deref()
    }

    /// Borrow the full URI
    pub fn as_str(&self) -> &str {
        &self.uri
    }
}

impl PartialEq for AtUri {
    fn eq(&self, other: &Self) -> bool {
        self.uri == other.uri
    }
}

impl Eq for AtUri {}

impl Hash for AtUri {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.uri.hash(state)
    }
}

impl PartialOrd for AtUri {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for AtUri {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.uri.cmp(&other.uri)
    }
}

impl FromStr for AtUri {
    type Err = AtStrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Serialize for AtUri {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.uri)
    }
}

impl<'de> Deserialize<'de> for AtUri {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value: SmolStr = Deserialize::deserialize(deserializer)?;
        Self::new(value).map_err(D::Error::custom)
    }
}

impl fmt::Display for AtUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.uri)
    }
}

impl fmt::Debug for AtUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.uri)
    }
}

impl AsRef<str> for AtUri {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_record_uri() {
        let uri = AtUri::new("at://did:plc:abc123/app.bsky.feed.post/3k2a4b").unwrap();
        assert_eq!(uri.authority(), "did:plc:abc123");
        assert_eq!(uri.collection(), Some("app.bsky.feed.post"));
        assert_eq!(uri.rkey(), Some("3k2a4b"));
        assert_eq!(uri.did().unwrap().as_str(), "did:plc:abc123");
    }

    #[test]
    fn authority_only() {
        let uri = AtUri::new("at://alice.bsky.social").unwrap();
        assert_eq!(uri.authority(), "alice.bsky.social");
        assert!(uri.collection().is_none());
        assert!(uri.rkey().is_none());
        assert!(uri.did().is_none());
    }

    #[test]
    fn rejects_bad_uris() {
        assert!(AtUri::new("https://example.com").is_err());
        assert!(AtUri::new("at://").is_err());
        assert!(AtUri::new("at://did:plc:abc/not a collection").is_err());
        assert!(AtUri::new("at://did:plc:abc/app.bsky.feed.post/..").is_err());
    }

    #[test]
    fn from_parts_round_trips() {
        let did = Did::new("did:plc:abc123").unwrap();
        let uri = AtUri::from_parts(&did, "app.bsky.feed.like", "3kxyz").unwrap();
        assert_eq!(uri.as_str(), "at://did:plc:abc123/app.bsky.feed.like/3kxyz");
    }
}
