use crate::types::string::AtStrError;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, de::Error};
use smol_str::SmolStr;
use std::fmt;
use std::sync::LazyLock;
use std::{ops::Deref, str::FromStr};

/// A domain-name handle (`alice.bsky.social`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Hash)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Handle(SmolStr);

/// Regex for handle validation per AT Protocol spec
pub static HANDLE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([a-zA-Z0-9]([a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?\.)+[a-zA-Z]([a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?$").unwrap()
});

/// The handle the AppView reports when bidirectional verification fails
pub const INVALID_HANDLE: &str = "handle.invalid";

impl Handle {
    /// Fallible constructor, validates
    ///
    /// Accepts (and strips) preceding '@' if present
    pub fn new(handle: impl AsRef<str>) -> Result<Self, AtStrError> {
        let handle = handle.as_ref();
        let handle = handle.strip_prefix('@').unwrap_or(handle);
        if handle.len() > 253 {
            Err(AtStrError::too_long("handle", handle, 253, handle.len()))
        } else if !HANDLE_REGEX.is_match(handle) {
            Err(AtStrError::regex(
                "handle",
                handle,
                SmolStr::new_static("invalid"),
            ))
        } else {
            Ok(Self(SmolStr::new(handle)))
        }
    }

    /// Fallible constructor, validates, doesn't allocate
    pub fn new_static(handle: &'static str) -> Result<Self, AtStrError> {
        let handle = handle.strip_prefix('@').unwrap_or(handle);
        if !HANDLE_REGEX.is_match(handle) {
            Err(AtStrError::regex(
                "handle",
                handle,
                SmolStr::new_static("invalid"),
            ))
        } else {
            Ok(Self(SmolStr::new_static(handle)))
        }
    }

    /// Whether this is the `handle.invalid` placeholder
    pub fn is_invalid(&self) -> bool {
        self.0.eq_ignore_ascii_case(INVALID_HANDLE)
    }

    /// Borrow as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Handle {
    type Err = AtStrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl<'de> Deserialize<'de> for Handle {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value: SmolStr = Deserialize::deserialize(deserializer)?;
        Self::new(value).map_err(D::Error::custom)
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Handle {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Deref for Handle {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_at_sign() {
        let handle = Handle::new("@alice.bsky.social").unwrap();
        assert_eq!(handle.as_str(), "alice.bsky.social");
    }

    #[test]
    fn rejects_bare_words() {
        assert!(Handle::new("alice").is_err());
        assert!(Handle::new("-alice.com").is_err());
    }

    #[test]
    fn detects_invalid_placeholder() {
        assert!(Handle::new("handle.invalid").unwrap().is_invalid());
        assert!(!Handle::new("bob.test").unwrap().is_invalid());
    }
}
