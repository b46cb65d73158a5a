use super::{Blur, CauseKind, LabelTarget, ModerationCause, ModerationDecision, Severity};
use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A place in the UI where moderated content is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Surface {
    /// A profile in a list of accounts
    ProfileList,
    /// A profile's own page
    ProfileView,
    /// An account's avatar, anywhere
    Avatar,
    /// A profile banner
    Banner,
    /// An account's display name, anywhere
    DisplayName,
    /// A post in a feed or thread
    ContentList,
    /// A post opened on its own
    ContentView,
    /// Images, video and other media inside a post
    ContentMedia,
}

impl Surface {
    /// Every surface, in declaration order
    pub const ALL: [Surface; 8] = [
        Surface::ProfileList,
        Surface::ProfileView,
        Surface::Avatar,
        Surface::Banner,
        Surface::DisplayName,
        Surface::ContentList,
        Surface::ContentView,
        Surface::ContentMedia,
    ];

    /// The camelCase key renderers use for this surface
    pub fn as_str(self) -> &'static str {
        match self {
            Surface::ProfileList => "profileList",
            Surface::ProfileView => "profileView",
            Surface::Avatar => "avatar",
            Surface::Banner => "banner",
            Surface::DisplayName => "displayName",
            Surface::ContentList => "contentList",
            Surface::ContentView => "contentView",
            Surface::ContentMedia => "contentMedia",
        }
    }
}

impl FromStr for Surface {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Surface::ALL
            .into_iter()
            .find(|surface| surface.as_str() == s)
            .ok_or_else(|| Error::UnknownSurface(s.into()))
    }
}

impl fmt::Display for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a renderer should do on one [`Surface`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModerationUi {
    /// Leave the item out entirely
    pub filter: bool,
    /// Put the item behind a cover the viewer can lift
    pub blur: bool,
    /// Show a warning badge
    pub alert: bool,
    /// Show an informational badge
    pub inform: bool,
    /// The cover can't be lifted
    pub no_override: bool,
    /// The author is muted by the viewer
    pub muted: bool,
    /// Causes that contributed to any of the above
    pub causes: Vec<ModerationCause>,
}

impl ModerationUi {
    /// Whether nothing needs to happen on this surface
    pub fn is_clear(&self) -> bool {
        !(self.filter || self.blur || self.alert || self.inform || self.muted)
    }

    fn apply(&mut self, cause: &ModerationCause, effect: Effect) {
        if effect == Effect::default() {
            return;
        }
        self.filter |= effect.filter;
        self.blur |= effect.blur;
        self.alert |= effect.alert;
        self.inform |= effect.inform;
        self.muted |= effect.muted;
        self.no_override |= cause.no_override && (effect.filter || effect.blur);
        self.causes.push(cause.clone());
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Effect {
    filter: bool,
    blur: bool,
    alert: bool,
    inform: bool,
    muted: bool,
}

impl ModerationDecision {
    /// Project the decision onto one surface
    pub fn ui(&self, surface: Surface) -> ModerationUi {
        self.ui_with(surface, false)
    }

    /// Project the decision onto one surface, optionally disregarding a muted author.
    ///
    /// The highlighted post of a thread ignores mutes for its content cover: the viewer
    /// navigated to it on purpose.
    pub fn ui_with(&self, surface: Surface, ignore_mute: bool) -> ModerationUi {
        let mut ui = ModerationUi::default();
        for cause in &self.causes {
            if ignore_mute && cause.kind == CauseKind::Muted {
                continue;
            }
            ui.apply(cause, effect(surface, cause));
        }
        ui
    }

    /// Project onto a surface named by its string key.
    ///
    /// An unknown key is logged and treated as "no restriction".
    pub fn ui_named(&self, surface: &str) -> ModerationUi {
        match surface.parse::<Surface>() {
            Ok(surface) => self.ui(surface),
            Err(_err) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(error = %_err, "unknown moderation surface, applying no restriction");
                ModerationUi::default()
            }
        }
    }
}

fn effect(surface: Surface, cause: &ModerationCause) -> Effect {
    let account = cause.target == LabelTarget::Account;
    let alert = cause.severity == Severity::Alert;
    let inform = cause.severity == Severity::Inform;

    if cause.kind == CauseKind::Muted {
        return match surface {
            Surface::ContentList => Effect {
                filter: true,
                blur: true,
                muted: true,
                ..Effect::default()
            },
            Surface::ContentView => Effect {
                alert: true,
                muted: true,
                ..Effect::default()
            },
            Surface::ProfileList | Surface::ProfileView => Effect {
                muted: true,
                ..Effect::default()
            },
            _ => Effect::default(),
        };
    }

    match surface {
        Surface::ContentList => Effect {
            filter: cause.hide,
            blur: cause.hide || cause.blur == Blur::Content,
            alert,
            inform,
            muted: false,
        },
        Surface::ContentView => Effect {
            blur: cause.hide || cause.blur == Blur::Content,
            alert,
            inform,
            ..Effect::default()
        },
        Surface::ContentMedia => Effect {
            blur: cause.blur == Blur::Media,
            ..Effect::default()
        },
        Surface::Avatar | Surface::Banner => Effect {
            blur: account && (cause.hide || cause.blur != Blur::None),
            ..Effect::default()
        },
        Surface::DisplayName => Effect {
            blur: account && cause.hide,
            ..Effect::default()
        },
        Surface::ProfileList => Effect {
            filter: account && cause.hide,
            alert: account && alert,
            inform: account && inform,
            ..Effect::default()
        },
        Surface::ProfileView => Effect {
            blur: account && cause.hide,
            alert: account && alert,
            inform: account && inform,
            ..Effect::default()
        },
    }
}
