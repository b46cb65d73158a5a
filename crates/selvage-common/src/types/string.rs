use miette::SourceSpan;
use smol_str::SmolStr;

pub use crate::types::{
    aturi::AtUri, datetime::Datetime, did::Did, handle::Handle, language::Language,
};

/// Parsing error for atproto string types.
///
/// `spec` refers to the final url path segment on atproto.com/specs,
/// detailing the specification for the type
/// `source` is the source string, or part of it
/// `kind` is the type of parsing error: `[StrParseKind]`
#[derive(Debug, Clone, thiserror::Error, miette::Diagnostic)]
#[error("error in `{source}`: {kind}")]
#[diagnostic(url("https://atproto.com/specs/{spec}"))]
pub struct AtStrError {
    /// Spec page the value violates
    pub spec: SmolStr,
    /// The offending input
    #[source_code]
    pub source: String,
    /// What went wrong
    #[source]
    #[diagnostic_source]
    pub kind: StrParseKind,
}

impl AtStrError {
    /// Wrap an arbitrary parse failure
    pub fn new(spec: &'static str, source: impl Into<String>, kind: StrParseKind) -> Self {
        Self {
            spec: SmolStr::new_static(spec),
            source: source.into(),
            kind,
        }
    }

    /// Input exceeded the maximum length for the type
    pub fn too_long(spec: &'static str, source: &str, max: usize, actual: usize) -> Self {
        Self::new(spec, source, StrParseKind::TooLong { max, actual })
    }

    /// Missing component, with what was expected to be found
    pub fn missing(spec: &'static str, source: &str, expected: &str) -> Self {
        Self::new(
            spec,
            source,
            StrParseKind::MissingComponent {
                span: None,
                message: SmolStr::new(expected),
            },
        )
    }

    /// A component failed validation; `at` is the byte span of the component
    pub fn invalid_component(
        spec: &'static str,
        source: &str,
        component: &str,
        at: (usize, usize),
    ) -> Self {
        Self::new(
            spec,
            source,
            StrParseKind::InvalidComponent {
                span: Some(at.into()),
                message: smol_str::format_smolstr!("invalid {component}"),
            },
        )
    }

    /// Input didn't match the validation pattern
    pub fn regex(spec: &'static str, source: &str, message: SmolStr) -> Self {
        Self::new(
            spec,
            source,
            StrParseKind::RegexFail {
                span: None,
                message,
            },
        )
    }
}

/// Kind of failure behind an [`AtStrError`]
#[derive(Debug, Clone, thiserror::Error, miette::Diagnostic)]
pub enum StrParseKind {
    /// Input did not match the validation regex
    #[error("regex failure - {message}")]
    #[diagnostic(code(selvage::types::string::regex_fail))]
    RegexFail {
        /// Where the failure was detected, if known
        #[label]
        span: Option<SourceSpan>,
        /// Human readable detail
        #[help]
        message: SmolStr,
    },
    /// Input was too long
    #[error("string too long (allowed: {max}, actual: {actual})")]
    #[diagnostic(code(selvage::types::string::wrong_length))]
    TooLong {
        /// Maximum allowed length
        max: usize,
        /// Actual length
        actual: usize,
    },
    /// A required component was absent
    #[error("missing - {message}")]
    #[diagnostic(code(selvage::types::string::missing_component))]
    MissingComponent {
        /// Where the component was expected
        #[label]
        span: Option<SourceSpan>,
        /// What was expected
        #[help]
        message: SmolStr,
    },
    /// A component was present but malformed
    #[error("{message}")]
    #[diagnostic(code(selvage::types::string::invalid_component))]
    InvalidComponent {
        /// The malformed component
        #[label]
        span: Option<SourceSpan>,
        /// Which component
        message: SmolStr,
    },
    /// Not a valid IETF language tag
    #[error("invalid language tag")]
    #[diagnostic(code(selvage::types::string::language))]
    Language,
    /// Not a valid datetime
    #[error("invalid datetime: {0}")]
    #[diagnostic(code(selvage::types::string::datetime))]
    Datetime(SmolStr),
}
