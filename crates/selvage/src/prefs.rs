use crate::error::{Error, Result};
use selvage_common::{Did, Handle, Language};
use serde::{Deserialize, Serialize};

/// Default number of lines a thread reply shows before "show more"
pub const DEFAULT_MAX_POST_LINES: usize = 25;

/// How a post should be translated when the viewer asks for it
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TranslationMode {
    /// Hand the text to the platform's own translator
    #[default]
    NativeOverlay,
    /// Open an external translator in the browser
    ExternalLink,
}

/// What the client is running on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Platform {
    /// Browser client
    Web,
    /// iOS or Android app
    #[default]
    Native,
}

impl Platform {
    /// Whether this is the browser client
    pub fn is_web(self) -> bool {
        self == Platform::Web
    }
}

/// Viewer-level settings that affect how threads are laid out
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, bon::Builder)]
#[serde(rename_all = "camelCase", default)]
#[builder(start_fn = new)]
pub struct ViewerPrefs {
    /// The viewer's primary content language; posts in other languages offer translation
    pub primary_language: Option<Language>,
    /// Replies longer than this many lines start collapsed
    #[builder(default = DEFAULT_MAX_POST_LINES)]
    pub max_post_lines: usize,
    /// How translations are offered
    #[builder(default)]
    pub translation_mode: TranslationMode,
    /// Platform the client runs on
    #[builder(default)]
    pub platform: Platform,
    /// Wide (desktop-width) layout
    #[builder(default)]
    pub wide_layout: bool,
    /// Whether feeds accept "show more/less like this" feedback
    #[builder(default)]
    pub feed_feedback: bool,
}

impl Default for ViewerPrefs {
    fn default() -> Self {
        Self {
            primary_language: None,
            max_post_lines: DEFAULT_MAX_POST_LINES,
            translation_mode: TranslationMode::default(),
            platform: Platform::default(),
            wide_layout: false,
            feed_feedback: false,
        }
    }
}

impl ViewerPrefs {
    /// Parse preferences from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::parse("viewer preferences", e))
    }
}

/// The signed-in account, if any
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewer {
    /// Account DID, `None` when logged out
    #[serde(skip_serializing_if = "Option::is_none")]
    pub did: Option<Did>,
    /// Account handle, if known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handle: Option<Handle>,
}

impl Viewer {
    /// A logged-out viewer
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// A signed-in viewer
    pub fn signed_in(did: Did, handle: Option<Handle>) -> Self {
        Self {
            did: Some(did),
            handle,
        }
    }

    /// Whether there is a session
    pub fn has_session(&self) -> bool {
        self.did.is_some()
    }

    /// Whether the viewer is `did`
    pub fn is(&self, did: &Did) -> bool {
        self.did.as_ref() == Some(did)
    }
}
