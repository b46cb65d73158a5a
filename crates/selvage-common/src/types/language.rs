use crate::types::string::{AtStrError, StrParseKind};
use serde::{Deserialize, Deserializer, Serialize, de::Error};
use smol_str::SmolStr;
use std::fmt;
use std::{ops::Deref, str::FromStr};

/// An IETF language tag.
///
/// Uses langtag crate for validation, but is stored as a SmolStr for size/avoiding allocations
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Hash)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Language(SmolStr);

impl Language {
    /// Parses an IETF language tag from the given string.
    pub fn new<T>(lang: &T) -> Result<Self, AtStrError>
    where
        T: AsRef<str> + ?Sized,
    {
        let tag = langtag::LangTag::new(lang)
            .map_err(|_| AtStrError::new("lang", lang.as_ref(), StrParseKind::Language))?;
        Ok(Language(SmolStr::new(tag.as_str())))
    }

    /// The primary language subtag, lowercased (`"pt"` for `"pt-BR"`)
    pub fn primary(&self) -> SmolStr {
        let primary = self.0.split('-').next().unwrap_or_default();
        SmolStr::new(primary.to_ascii_lowercase())
    }

    /// Whether two tags name the same primary language, ignoring region and script
    pub fn same_primary(&self, other: &Language) -> bool {
        self.primary() == other.primary()
    }

    /// Returns the tag as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Language {
    type Err = AtStrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl<'de> Deserialize<'de> for Language {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value: SmolStr = Deserialize::deserialize(deserializer)?;
        Self::new(&value).map_err(D::Error::custom)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Language {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Deref for Language {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_language_tags() {
        assert!(Language::new("en").is_ok());
        assert!(Language::new("en-US").is_ok());
        assert!(Language::new("zh-Hans").is_ok());
    }

    #[test]
    fn invalid_tags() {
        assert!(Language::new("").is_err());
        assert!(Language::new("not_a_tag").is_err());
    }

    #[test]
    fn primary_subtag_matching() {
        let us = Language::new("en-US").unwrap();
        let gb = Language::new("en-GB").unwrap();
        let ja = Language::new("ja").unwrap();
        assert_eq!(us.primary(), "en");
        assert!(us.same_primary(&gb));
        assert!(!us.same_primary(&ja));
    }
}
