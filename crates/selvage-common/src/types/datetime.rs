use crate::types::string::{AtStrError, StrParseKind};
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de::Error};
use smol_str::{SmolStr, ToSmolStr};
use std::hash::{Hash, Hasher};
use std::sync::LazyLock;
use std::{cmp, fmt, str::FromStr};

/// Regex for ISO 8601 datetime validation per AT Protocol spec
pub static ISO8601_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}T[0-9]{2}:[0-9]{2}:[0-9]{2}(\.[0-9]+)?(Z|[+-][0-9]{2}:[0-9]{2})$").unwrap()
});

/// AT Protocol datetime (ISO 8601 with a mandatory timezone).
///
/// The serialized form is preserved during parsing so values round-trip exactly;
/// comparisons use the parsed instant.
#[derive(Clone, Debug, Eq)]
pub struct Datetime {
    serialized: SmolStr,
    dt: chrono::DateTime<chrono::FixedOffset>,
}

impl PartialEq for Datetime {
    fn eq(&self, other: &Self) -> bool {
        self.dt == other.dt
    }
}

impl Hash for Datetime {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.dt.hash(state)
    }
}

impl Ord for Datetime {
    fn cmp(&self, other: &Self) -> cmp::Ordering {
        self.dt.cmp(&other.dt)
    }
}

impl PartialOrd for Datetime {
    fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Datetime {
    /// The current time in UTC
    pub fn now() -> Self {
        Self::new(chrono::Utc::now().fixed_offset())
    }

    /// Wrap a chrono datetime, serializing with microsecond precision
    pub fn new(dt: chrono::DateTime<chrono::FixedOffset>) -> Self {
        let serialized = dt
            .to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
            .to_smolstr();
        Self { serialized, dt }
    }

    /// The parsed value
    pub fn as_chrono(&self) -> &chrono::DateTime<chrono::FixedOffset> {
        &self.dt
    }

    /// The serialized form
    pub fn as_str(&self) -> &str {
        &self.serialized
    }
}

impl FromStr for Datetime {
    type Err = AtStrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // `-00:00` means "offset unknown", which lexicon datetimes disallow
        if !ISO8601_REGEX.is_match(s) || s.ends_with("-00:00") {
            return Err(AtStrError::regex(
                "lexicon#datetime",
                s,
                SmolStr::new_static("not an ISO 8601 datetime with timezone"),
            ));
        }
        let dt = chrono::DateTime::parse_from_rfc3339(s).map_err(|e| {
            AtStrError::new(
                "lexicon#datetime",
                s,
                StrParseKind::Datetime(e.to_smolstr()),
            )
        })?;
        Ok(Self {
            serialized: SmolStr::new(s),
            dt,
        })
    }
}

impl Serialize for Datetime {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.serialized)
    }
}

impl<'de> Deserialize<'de> for Datetime {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value: SmolStr = Deserialize::deserialize(deserializer)?;
        Self::from_str(&value).map_err(D::Error::custom)
    }
}

impl fmt::Display for Datetime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialized)
    }
}
