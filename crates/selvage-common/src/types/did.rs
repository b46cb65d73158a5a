use crate::types::string::AtStrError;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, de::Error};
use smol_str::SmolStr;
use std::fmt;
use std::sync::LazyLock;
use std::{ops::Deref, str::FromStr};

/// A decentralized identifier (`did:plc:...`, `did:web:...`).
///
/// Accepts (and strips) a leading `at://`, since account-level label targets
/// and profile URIs are frequently written that way.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Hash)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Did(SmolStr);

/// Regex for DID validation per AT Protocol spec.
///
/// Allows `%` in the identifier but prevents DIDs from ending with `:` or `%`.
pub static DID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^did:[a-z]+:[a-zA-Z0-9._:%-]*[a-zA-Z0-9._-]$").unwrap());

impl Did {
    /// Fallible constructor, validates
    pub fn new(did: impl AsRef<str>) -> Result<Self, AtStrError> {
        let did = did.as_ref();
        let did = did.strip_prefix("at://").unwrap_or(did);
        if did.len() > 2048 {
            Err(AtStrError::too_long("did", did, 2048, did.len()))
        } else if !DID_REGEX.is_match(did) {
            Err(AtStrError::regex("did", did, SmolStr::new_static("invalid")))
        } else {
            Ok(Self(SmolStr::new(did)))
        }
    }

    /// Fallible constructor, validates, doesn't allocate
    pub fn new_static(did: &'static str) -> Result<Self, AtStrError> {
        let did = did.strip_prefix("at://").unwrap_or(did);
        if did.len() > 2048 {
            Err(AtStrError::too_long("did", did, 2048, did.len()))
        } else if !DID_REGEX.is_match(did) {
            Err(AtStrError::regex("did", did, SmolStr::new_static("invalid")))
        } else {
            Ok(Self(SmolStr::new_static(did)))
        }
    }

    /// The DID method (`plc`, `web`, ...)
    pub fn method(&self) -> &str {
        self.0.split(':').nth(1).unwrap_or_default()
    }

    /// Borrow as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Did {
    type Err = AtStrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl<'de> Deserialize<'de> for Did {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value: SmolStr = Deserialize::deserialize(deserializer)?;
        Self::new(value).map_err(D::Error::custom)
    }
}

impl fmt::Display for Did {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Did {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "at://{}", self.0)
    }
}

impl From<Did> for SmolStr {
    fn from(value: Did) -> Self {
        value.0
    }
}

impl AsRef<str> for Did {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Deref for Did {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_dids() {
        assert!(Did::new("did:plc:z72i7hdynmk6r22z27h6tvur").is_ok());
        assert!(Did::new("did:web:example.com").is_ok());
        assert_eq!(Did::new("did:web:example.com").unwrap().method(), "web");
    }

    #[test]
    fn strips_at_prefix() {
        let did = Did::new("at://did:plc:abc123").unwrap();
        assert_eq!(did.as_str(), "did:plc:abc123");
    }

    #[test]
    fn invalid_dids() {
        assert!(Did::new("").is_err());
        assert!(Did::new("plc:abc").is_err());
        assert!(Did::new("did:plc:abc:").is_err());
        assert!(Did::new("did:PLC:abc").is_err());
    }

    #[test]
    fn deserializes_from_owned_value() {
        let value = serde_json::json!("did:plc:abc123");
        let did: Did = serde_json::from_value(value).unwrap();
        assert_eq!(did.as_str(), "did:plc:abc123");
    }
}
