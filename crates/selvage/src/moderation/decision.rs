use super::{
    Blur, CauseKind, LabelPref, LabelTarget, LabelValueDefinition, Labeled, LabelerDefs,
    ModerationCause, ModerationDecision, ModerationPrefs, Severity,
};
use crate::post::{Label, PostView};
use selvage_common::{Datetime, Did};

/// Apply moderation logic to a single piece of content
///
/// Takes the content, viewer preferences, labeler definitions, and list of accepted
/// labelers, and produces a moderation decision listing every cause that applies.
///
/// # Arguments
///
/// * `item` - The content to moderate
/// * `prefs` - Viewer's moderation preferences
/// * `defs` - Labeler definitions describing what labels mean
/// * `accepted_labelers` - Which labelers to trust; empty trusts all of them
///
/// # Example
///
/// ```
/// # use selvage::moderation::*;
/// # use selvage::post::PostView;
/// # fn example(post: &PostView, prefs: &ModerationPrefs, defs: &LabelerDefs) {
/// let decision = moderate(post, prefs, defs, &[]);
/// if decision.filter {
///     println!("This post should be hidden");
/// }
/// # }
/// ```
pub fn moderate<T: Labeled + ?Sized>(
    item: &T,
    prefs: &ModerationPrefs,
    defs: &LabelerDefs,
    accepted_labelers: &[Did],
) -> ModerationDecision {
    let mut decision = ModerationDecision::none();
    let now = Datetime::now();

    for label in item.labels() {
        if label.exp.as_ref().is_some_and(|exp| exp <= &now) {
            continue;
        }

        if !accepted_labelers.is_empty() && !accepted_labelers.contains(&label.src) {
            continue;
        }

        // negation withdraws an earlier label from the same labeler
        if label.neg.unwrap_or(false) {
            decision.retain(|cause| {
                !matches!(&cause.kind, CauseKind::Label { val, source }
                    if val == &label.val && source == &label.src)
            });
            continue;
        }

        if let Some(cause) = apply_label(label, prefs, defs) {
            decision.push(cause);
        }
    }

    for self_label in item.self_labels() {
        let val = self_label.val;
        let (hide, blur) = match prefs.pref_for(None, &val) {
            Some(LabelPref::Ignore) => continue,
            Some(LabelPref::Hide) => (true, builtin_blur(&val)),
            Some(LabelPref::Warn) | None => (false, builtin_blur(&val)),
        };
        decision.push(ModerationCause {
            kind: CauseKind::SelfLabel { val },
            target: LabelTarget::Content,
            hide,
            blur,
            severity: Severity::Inform,
            no_override: false,
        });
    }

    decision
}

/// Moderate a post together with its author.
///
/// Post labels target the content, account labels on the author target the account,
/// and a muted author adds a [`CauseKind::Muted`] cause.
#[cfg_attr(feature = "tracing", tracing::instrument(level = "trace", skip_all, fields(uri = %post.uri)))]
pub fn moderate_post(
    post: &PostView,
    prefs: &ModerationPrefs,
    defs: &LabelerDefs,
    accepted_labelers: &[Did],
) -> ModerationDecision {
    let mut decision = moderate(post, prefs, defs, accepted_labelers);
    decision.extend(moderate(&post.author, prefs, defs, accepted_labelers));
    if post.author.is_muted() {
        decision.push(ModerationCause {
            kind: CauseKind::Muted,
            target: LabelTarget::Account,
            hide: false,
            blur: Blur::None,
            severity: Severity::None,
            no_override: false,
        });
    }
    decision
}

/// Work out what a single label does, if anything
fn apply_label(
    label: &Label,
    prefs: &ModerationPrefs,
    defs: &LabelerDefs,
) -> Option<ModerationCause> {
    let val = label.val.as_str();
    let pref = prefs.pref_for(Some(&label.src), val);
    let def = defs.find_def(&label.src, val);

    if def.is_some_and(|def| def.adult_only.unwrap_or(false)) && !prefs.adult_content_enabled {
        let mut cause = hide_cause(label, def);
        cause.no_override = true;
        return Some(cause);
    }

    match pref {
        Some(LabelPref::Hide) => Some(hide_cause(label, def)),
        Some(LabelPref::Warn) => Some(warn_cause(label, def)),
        Some(LabelPref::Ignore) => None,
        None => apply_default(label, def),
    }
}

/// Defaults when the viewer has no preference for the label
fn apply_default(label: &Label, def: Option<&LabelValueDefinition>) -> Option<ModerationCause> {
    if let Some(default_setting) = def.and_then(|def| def.default_setting.as_deref()) {
        match default_setting {
            "hide" => return Some(hide_cause(label, def)),
            "warn" => return Some(warn_cause(label, def)),
            "ignore" => return None,
            _ => {}
        }
    }

    match label.val.as_str() {
        "!hide" => {
            let mut cause = hide_cause(label, def);
            cause.no_override = true;
            Some(cause)
        }
        "!warn" => Some(warn_cause(label, def)),
        // only gates logged-out access, which the post menu handles
        "!no-unauthenticated" => None,
        val if val.starts_with('!') => None,
        "porn" | "nsfl" => Some(hide_cause(label, def)),
        "sexual" | "nudity" | "gore" | "graphic-media" => Some(warn_cause(label, def)),
        _ => Some(ModerationCause {
            severity: Severity::Inform,
            ..cause(label, Blur::None)
        }),
    }
}

fn hide_cause(label: &Label, def: Option<&LabelValueDefinition>) -> ModerationCause {
    ModerationCause {
        hide: true,
        severity: def.map_or(Severity::None, definition_severity),
        ..cause(label, Blur::Content)
    }
}

fn warn_cause(label: &Label, def: Option<&LabelValueDefinition>) -> ModerationCause {
    ModerationCause {
        severity: def.map_or(Severity::Alert, definition_severity),
        ..cause(label, definition_blur(label, def))
    }
}

fn cause(label: &Label, blur: Blur) -> ModerationCause {
    ModerationCause {
        kind: CauseKind::Label {
            val: label.val.clone(),
            source: label.src.clone(),
        },
        target: determine_target(label),
        hide: false,
        blur,
        severity: Severity::None,
        no_override: false,
    }
}

fn definition_blur(label: &Label, def: Option<&LabelValueDefinition>) -> Blur {
    match def.map(|def| def.blurs.as_str()) {
        Some("content") => Blur::Content,
        Some("media") => Blur::Media,
        Some(_) => Blur::None,
        None => builtin_blur(&label.val),
    }
}

fn definition_severity(def: &LabelValueDefinition) -> Severity {
    match def.severity.as_str() {
        "alert" => Severity::Alert,
        "inform" => Severity::Inform,
        _ => Severity::None,
    }
}

/// Blur for well-known label values nobody published a definition for
fn builtin_blur(val: &str) -> Blur {
    match val {
        "porn" | "sexual" | "nudity" | "nsfl" | "gore" | "graphic-media" => Blur::Media,
        _ => Blur::Content,
    }
}

/// Determine whether a label targets an account or content
///
/// Account labels carry a bare DID (or an `at://` URI with only a DID authority) as
/// their subject; anything with a collection and rkey is content.
fn determine_target(label: &Label) -> LabelTarget {
    if Did::new(label.uri.as_str()).is_ok() {
        LabelTarget::Account
    } else {
        LabelTarget::Content
    }
}
