use crate::error::{Error, Result};
use selvage_common::Did;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::collections::HashMap;

/// Viewer's moderation preferences
///
/// Specifies how the viewer wants to respond to different label values,
/// both globally and per-labeler.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ModerationPrefs {
    /// Whether adult content is enabled for this viewer
    pub adult_content_enabled: bool,
    /// Global label preferences (label value -> preference)
    pub labels: HashMap<SmolStr, LabelPref>,
    /// Per-labeler overrides (labeler DID -> label value -> preference)
    pub labelers: HashMap<Did, HashMap<SmolStr, LabelPref>>,
}

impl ModerationPrefs {
    /// The viewer's preference for `val` from `labeler`, falling back to the global one
    pub fn pref_for(&self, labeler: Option<&Did>, val: &str) -> Option<LabelPref> {
        labeler
            .and_then(|did| self.labelers.get(did))
            .and_then(|prefs| prefs.get(val))
            .or_else(|| self.labels.get(val))
            .copied()
    }

    /// Parse preferences from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::parse("moderation preferences", e))
    }
}

/// Viewer's preference for how to handle a specific label value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelPref {
    /// Hide the content completely
    Hide,
    /// Show with warning/blur
    Warn,
    /// Show normally (no filtering)
    Ignore,
}

/// A labeler's description of one of its label values
/// (`com.atproto.label.defs#labelValueDefinition`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelValueDefinition {
    /// The label value this defines
    pub identifier: SmolStr,
    /// `inform`, `alert` or `none`
    pub severity: SmolStr,
    /// `content`, `media` or `none`
    pub blurs: SmolStr,
    /// `ignore`, `warn` or `hide`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_setting: Option<SmolStr>,
    /// Only shown to viewers with adult content enabled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adult_only: Option<bool>,
    /// Localized names and descriptions, left undecoded
    #[serde(default)]
    pub locales: Vec<serde_json::Value>,
}

/// Collection of labeler definitions
///
/// Maps labeler DIDs to their published label value definitions.
/// These definitions describe what labels mean, their severity, and default settings.
#[derive(Debug, Clone, Default)]
pub struct LabelerDefs {
    /// Labeler DID -> label value definitions
    pub defs: HashMap<Did, Vec<LabelValueDefinition>>,
}

impl LabelerDefs {
    /// Create an empty set of labeler definitions
    pub fn new() -> Self {
        Self::default()
    }

    /// Add definitions for a labeler
    pub fn insert(&mut self, did: Did, definitions: Vec<LabelValueDefinition>) {
        self.defs.insert(did, definitions);
    }

    /// Get definitions for a specific labeler
    pub fn get(&self, did: &Did) -> Option<&[LabelValueDefinition]> {
        self.defs.get(did).map(Vec::as_slice)
    }

    /// Find a label definition by labeler and identifier
    pub fn find_def(&self, labeler: &Did, identifier: &str) -> Option<&LabelValueDefinition> {
        self.get(labeler)
            .and_then(|defs| defs.iter().find(|def| def.identifier == identifier))
    }
}

/// Moderation decision for a post
///
/// The aggregate flags summarize every cause; per-surface answers come from
/// [`ModerationDecision::ui`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModerationDecision {
    /// Whether to hide the content completely
    pub filter: bool,
    /// Strongest blur any cause asks for
    pub blur: Blur,
    /// Whether to show an alert-level warning
    pub alert: bool,
    /// Whether to show an informational badge
    pub inform: bool,
    /// Whether user override is allowed (false for legal takedowns)
    pub no_override: bool,
    /// Everything that contributed to this decision
    pub causes: Vec<ModerationCause>,
}

impl ModerationDecision {
    /// Create a decision with no moderation applied
    pub fn none() -> Self {
        Self::default()
    }

    /// Whether any moderation action is being taken
    pub fn is_moderated(&self) -> bool {
        self.filter || self.blur != Blur::None || self.alert || self.inform || self.is_muted()
    }

    /// Whether the author is muted by the viewer
    pub fn is_muted(&self) -> bool {
        self.causes.iter().any(|c| c.kind == CauseKind::Muted)
    }

    /// Record a cause and fold it into the aggregate flags
    pub fn push(&mut self, cause: ModerationCause) {
        self.fold(&cause);
        self.causes.push(cause);
    }

    /// Fold another decision's causes into this one
    pub fn extend(&mut self, other: ModerationDecision) {
        for cause in other.causes {
            self.push(cause);
        }
    }

    /// Drop causes matching `pred` and recompute the aggregate flags
    pub(crate) fn retain(&mut self, pred: impl FnMut(&ModerationCause) -> bool) {
        self.causes.retain(pred);
        let causes = std::mem::take(&mut self.causes);
        *self = Self::none();
        for cause in causes {
            self.push(cause);
        }
    }

    fn fold(&mut self, cause: &ModerationCause) {
        self.filter |= cause.hide;
        self.blur = self.blur.max(cause.blur);
        match cause.severity {
            Severity::Alert => self.alert = true,
            Severity::Inform => self.inform = true,
            Severity::None => {}
        }
        self.no_override |= cause.no_override;
    }
}

/// What parts of content should be blurred
///
/// Ordered by strength: `Content` hides more than `Media`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Blur {
    /// No blurring
    #[default]
    None,
    /// Blur media only (images, video, audio)
    Media,
    /// Blur the entire content (text and media)
    Content,
}

/// How loudly a cause should be surfaced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    /// No badge
    #[default]
    None,
    /// Informational badge
    Inform,
    /// Warning badge
    Alert,
}

/// What produced a cause
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CauseKind {
    /// A label from a labeler service
    Label {
        /// The label value
        val: SmolStr,
        /// Which labeler applied it
        source: Did,
    },
    /// A label the author put on their own record
    SelfLabel {
        /// The label value
        val: SmolStr,
    },
    /// The viewer muted the author
    Muted,
}

impl CauseKind {
    /// The label value, if this cause came from a label
    pub fn label_value(&self) -> Option<&str> {
        match self {
            CauseKind::Label { val, .. } | CauseKind::SelfLabel { val } => Some(val),
            CauseKind::Muted => None,
        }
    }
}

/// One reason behind a moderation decision
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModerationCause {
    /// What produced it
    pub kind: CauseKind,
    /// Whether it concerns the account or this piece of content
    pub target: LabelTarget,
    /// Remove the subject from lists
    pub hide: bool,
    /// What to blur
    pub blur: Blur,
    /// Badge to show
    pub severity: Severity,
    /// The viewer may not click through
    pub no_override: bool,
}

/// What a label is targeting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelTarget {
    /// The label applies to an account/profile
    Account,
    /// The label applies to a specific piece of content
    Content,
}
