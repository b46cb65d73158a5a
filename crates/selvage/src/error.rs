use selvage_common::AtUri;
use smol_str::SmolStr;

/// Result alias for fallible selvage operations
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors surfaced by selvage.
///
/// All of these are recoverable: callers degrade to a placeholder or to "no
/// restriction" rather than aborting the render.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum Error {
    /// The post's record could not be decoded as an `app.bsky.feed.post`
    #[error("invalid or unsupported post record at {uri}")]
    #[diagnostic(code(selvage::post::invalid_record))]
    InvalidRecord {
        /// The post whose record failed
        uri: AtUri,
        /// Decoding failure
        #[source]
        source: serde_json::Error,
    },

    /// A moderation lookup named a surface that doesn't exist
    #[error("unknown moderation surface `{0}`")]
    #[diagnostic(
        code(selvage::moderation::unknown_surface),
        help(
            "known surfaces: profileList, profileView, avatar, banner, displayName, contentList, contentView, contentMedia"
        )
    )]
    UnknownSurface(SmolStr),

    /// Preferences or thread input could not be parsed
    #[error("failed to parse {what}")]
    #[diagnostic(code(selvage::config::parse))]
    Parse {
        /// What was being parsed
        what: &'static str,
        /// Underlying JSON error
        #[source]
        source: serde_json::Error,
    },
}

impl Error {
    /// Wrap a JSON failure for the given input kind
    pub fn parse(what: &'static str, source: serde_json::Error) -> Self {
        Self::Parse { what, source }
    }
}
