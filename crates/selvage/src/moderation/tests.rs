use crate::moderation::*;
use crate::post::{Label, ProfileViewerState, SelfLabel, SelfLabels};
use crate::testing::{ALICE, post, post_with, record};
use selvage_common::{Datetime, Did};
use serde_json::json;
use smol_str::SmolStr;

const LABELER: &str = "did:plc:ar7c4by46qjdydhdevvrndac";
const OTHER_LABELER: &str = "did:plc:otherlabeler";

fn labeler() -> Did {
    Did::new_static(LABELER).unwrap()
}

fn label(src: &str, subject: &str, val: &str) -> Label {
    Label {
        src: Did::new(src).unwrap(),
        uri: subject.into(),
        cid: None,
        val: val.into(),
        neg: None,
        cts: "2024-05-01T12:00:00.000Z".parse().unwrap(),
        exp: None,
        ver: Some(1),
    }
}

fn def(identifier: &str, blurs: &str, severity: &str, default_setting: &str) -> LabelValueDefinition {
    LabelValueDefinition {
        identifier: identifier.into(),
        blurs: blurs.into(),
        severity: severity.into(),
        default_setting: Some(default_setting.into()),
        adult_only: Some(false),
        locales: vec![],
    }
}

fn labelled_post(labels: Vec<Label>) -> crate::post::PostView {
    let mut post = post(ALICE, "3kpost", "labelled");
    post.labels = Some(labels);
    post
}

fn post_subject() -> String {
    crate::testing::post_uri(ALICE, "3kpost")
}

#[test]
fn moderate_with_default_hide() {
    let mut defs = LabelerDefs::new();
    defs.insert(labeler(), vec![def("spam", "content", "inform", "hide")]);

    let post = labelled_post(vec![label(LABELER, &post_subject(), "spam")]);
    let decision = moderate(&post, &ModerationPrefs::default(), &defs, &[]);

    assert!(decision.filter);
    assert_eq!(decision.causes.len(), 1);
    assert_eq!(decision.causes[0].target, LabelTarget::Content);
    assert_eq!(
        decision.causes[0].kind,
        CauseKind::Label {
            val: "spam".into(),
            source: labeler()
        }
    );
}

#[test]
fn viewer_preference_beats_definition_default() {
    let mut defs = LabelerDefs::new();
    defs.insert(labeler(), vec![def("spam", "content", "inform", "hide")]);
    let mut prefs = ModerationPrefs::default();
    prefs.labels.insert("spam".into(), LabelPref::Ignore);

    let post = labelled_post(vec![label(LABELER, &post_subject(), "spam")]);
    let decision = moderate(&post, &prefs, &defs, &[]);
    assert!(!decision.is_moderated());
}

#[test]
fn per_labeler_preference_overrides_global() {
    let mut prefs = ModerationPrefs::default();
    prefs.labels.insert("rude".into(), LabelPref::Hide);
    prefs
        .labelers
        .entry(labeler())
        .or_default()
        .insert("rude".into(), LabelPref::Warn);

    let post = labelled_post(vec![label(LABELER, &post_subject(), "rude")]);
    let decision = moderate(&post, &prefs, &LabelerDefs::new(), &[]);
    assert!(!decision.filter);
    assert_eq!(decision.blur, Blur::Content);
    assert!(decision.alert);
}

#[test]
fn adult_only_label_is_forced_hidden_without_adult_content() {
    let mut defs = LabelerDefs::new();
    let mut porn = def("porn", "media", "none", "warn");
    porn.adult_only = Some(true);
    defs.insert(labeler(), vec![porn]);

    let post = labelled_post(vec![label(LABELER, &post_subject(), "porn")]);
    let mut prefs = ModerationPrefs::default();
    prefs.labels.insert("porn".into(), LabelPref::Ignore);

    let decision = moderate(&post, &prefs, &defs, &[]);
    assert!(decision.filter);
    assert!(decision.no_override);

    prefs.adult_content_enabled = true;
    let decision = moderate(&post, &prefs, &defs, &[]);
    assert!(!decision.is_moderated());
}

#[test]
fn negation_withdraws_earlier_label() {
    let mut negation = label(LABELER, &post_subject(), "rude");
    negation.neg = Some(true);
    let post = labelled_post(vec![label(LABELER, &post_subject(), "rude"), negation]);

    let decision = moderate(&post, &ModerationPrefs::default(), &LabelerDefs::new(), &[]);
    assert!(decision.causes.is_empty());
    assert!(!decision.inform);
}

#[test]
fn negation_only_applies_to_its_own_labeler() {
    let mut negation = label(OTHER_LABELER, &post_subject(), "rude");
    negation.neg = Some(true);
    let post = labelled_post(vec![label(LABELER, &post_subject(), "rude"), negation]);

    let decision = moderate(&post, &ModerationPrefs::default(), &LabelerDefs::new(), &[]);
    assert_eq!(decision.causes.len(), 1);
}

#[test]
fn expired_labels_are_skipped() {
    let mut expired = label(LABELER, &post_subject(), "!hide");
    expired.exp = Some(Datetime::new(
        (chrono::Utc::now() - chrono::Duration::days(1)).fixed_offset(),
    ));
    let post = labelled_post(vec![expired]);

    let decision = moderate(&post, &ModerationPrefs::default(), &LabelerDefs::new(), &[]);
    assert!(!decision.filter);
}

#[test]
fn untrusted_labelers_are_ignored() {
    let post = labelled_post(vec![label(OTHER_LABELER, &post_subject(), "!hide")]);
    let decision = moderate(
        &post,
        &ModerationPrefs::default(),
        &LabelerDefs::new(),
        &[labeler()],
    );
    assert!(!decision.is_moderated());
}

#[test]
fn system_hide_cannot_be_overridden() {
    let post = labelled_post(vec![label(LABELER, &post_subject(), "!hide")]);
    let decision = moderate(&post, &ModerationPrefs::default(), &LabelerDefs::new(), &[]);
    assert!(decision.filter);
    assert!(decision.no_override);

    let ui = decision.ui(Surface::ContentView);
    assert!(ui.blur);
    assert!(ui.no_override);
}

#[test]
fn self_labels_blur_media() {
    let mut rec = record("nsfw art");
    rec["labels"] = json!({
        "$type": "com.atproto.label.defs#selfLabels",
        "values": [{ "val": "nudity" }],
    });
    let post = post_with(ALICE, "3kart", rec);

    let decision = moderate(&post, &ModerationPrefs::default(), &LabelerDefs::new(), &[]);
    assert_eq!(decision.causes.len(), 1);
    assert_eq!(
        decision.causes[0].kind,
        CauseKind::SelfLabel {
            val: "nudity".into()
        }
    );
    assert!(decision.ui(Surface::ContentMedia).blur);
    assert!(!decision.ui(Surface::ContentList).blur);
    assert!(decision.ui(Surface::ContentList).inform);
}

#[test]
fn record_self_labels_are_read_directly() {
    let record = crate::post::PostRecord {
        text: "hi".into(),
        langs: None,
        reply: None,
        labels: Some(SelfLabels {
            values: vec![SelfLabel { val: "gore".into() }],
        }),
        facets: None,
        created_at: "2024-05-01T12:00:00.000Z".parse().unwrap(),
    };
    assert_eq!(record.self_labels().len(), 1);
    assert!(record.labels().is_empty());
}

#[test]
fn account_labels_blur_avatar_but_not_post_media() {
    let mut post = post(ALICE, "3kpost", "hello");
    post.author.labels = Some(vec![label(LABELER, ALICE, "!warn")]);

    let decision = moderate_post(&post, &ModerationPrefs::default(), &LabelerDefs::new(), &[]);
    assert_eq!(decision.causes[0].target, LabelTarget::Account);

    assert!(decision.ui(Surface::Avatar).blur);
    assert!(decision.ui(Surface::Banner).blur);
    assert!(!decision.ui(Surface::ContentMedia).blur);
    assert!(!decision.ui(Surface::DisplayName).blur);
    assert!(decision.ui(Surface::ProfileView).alert);
}

#[test]
fn account_hide_projects_per_surface() {
    let mut post = post(ALICE, "3kpost", "hello");
    post.author.labels = Some(vec![label(LABELER, &format!("at://{ALICE}"), "!hide")]);
    let decision = moderate_post(&post, &ModerationPrefs::default(), &LabelerDefs::new(), &[]);

    assert!(decision.ui(Surface::ProfileList).filter);
    assert!(!decision.ui(Surface::ProfileList).blur);
    assert!(decision.ui(Surface::ProfileView).blur);
    assert!(!decision.ui(Surface::ProfileView).filter);
    assert!(decision.ui(Surface::DisplayName).blur);
    assert!(decision.ui(Surface::ContentList).filter);
}

#[test]
fn content_labels_leave_profile_surfaces_alone() {
    let post = labelled_post(vec![label(LABELER, &post_subject(), "!hide")]);
    let decision = moderate_post(&post, &ModerationPrefs::default(), &LabelerDefs::new(), &[]);

    for surface in [
        Surface::Avatar,
        Surface::Banner,
        Surface::DisplayName,
        Surface::ProfileList,
        Surface::ProfileView,
    ] {
        assert!(decision.ui(surface).is_clear(), "{surface} should be clear");
    }
    let list = decision.ui(Surface::ContentList);
    assert!(list.filter && list.blur);
}

#[test]
fn muted_author_is_filtered_from_lists_only() {
    let mut post = post(ALICE, "3kpost", "hello");
    post.author.viewer = Some(ProfileViewerState {
        muted: Some(true),
        ..Default::default()
    });
    let decision = moderate_post(&post, &ModerationPrefs::default(), &LabelerDefs::new(), &[]);
    assert!(decision.is_muted());
    assert!(!decision.filter);

    let list = decision.ui(Surface::ContentList);
    assert!(list.filter && list.blur && list.muted);

    let view = decision.ui(Surface::ContentView);
    assert!(!view.blur);
    assert!(view.muted && view.alert);

    let ignoring = decision.ui_with(Surface::ContentView, true);
    assert!(ignoring.is_clear());
    assert!(decision.ui(Surface::Avatar).is_clear());
}

#[test]
fn unknown_surface_degrades_to_no_restriction() {
    let post = labelled_post(vec![label(LABELER, &post_subject(), "!hide")]);
    let decision = moderate(&post, &ModerationPrefs::default(), &LabelerDefs::new(), &[]);

    assert!(matches!(
        "sidebar".parse::<Surface>(),
        Err(crate::Error::UnknownSurface(name)) if name == "sidebar"
    ));
    assert_eq!(decision.ui_named("sidebar"), ModerationUi::default());
    assert_eq!(decision.ui_named("contentList"), decision.ui(Surface::ContentList));
}

#[test]
fn surface_keys_round_trip() {
    for surface in Surface::ALL {
        assert_eq!(surface.as_str().parse::<Surface>().unwrap(), surface);
        assert_eq!(
            serde_json::to_value(surface).unwrap(),
            json!(surface.as_str())
        );
    }
}

#[test]
fn prefs_deserialize_from_json() {
    let prefs: ModerationPrefs = serde_json::from_value(json!({
        "adultContentEnabled": true,
        "labels": { "gore": "hide", "rude": "ignore" },
        "labelers": { "did:plc:ar7c4by46qjdydhdevvrndac": { "gore": "warn" } },
    }))
    .unwrap();
    assert!(prefs.adult_content_enabled);
    assert_eq!(prefs.pref_for(None, "gore"), Some(LabelPref::Hide));
    assert_eq!(prefs.pref_for(Some(&labeler()), "gore"), Some(LabelPref::Warn));
    assert_eq!(prefs.pref_for(Some(&labeler()), "rude"), Some(LabelPref::Ignore));
}

#[test]
fn service_closures_stand_in_for_the_moderator() {
    let always_hide = |_: &crate::post::PostView, _: &ModerationPrefs| {
        let mut decision = ModerationDecision::none();
        decision.push(ModerationCause {
            kind: CauseKind::Label {
                val: SmolStr::new_static("!hide"),
                source: labeler(),
            },
            target: LabelTarget::Content,
            hide: true,
            blur: Blur::Content,
            severity: Severity::None,
            no_override: true,
        });
        decision
    };
    let post = post(ALICE, "3kpost", "hello");
    assert!(always_hide.decide(&post, &ModerationPrefs::default()).filter);
    assert!(
        !LabelModerator::default()
            .decide(&post, &ModerationPrefs::default())
            .is_moderated()
    );
}
