use crate::links::translator_link;
use crate::post::PostRecord;
use crate::prefs::{TranslationMode, ViewerPrefs};
use selvage_common::Language;

/// What happens when the viewer asks to translate a post
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslateAction {
    /// Hand the text to the platform translator, shown over the post
    Overlay {
        /// Text to translate
        text: String,
        /// Language to translate into
        target: Language,
    },
    /// Open this translator URL
    OpenLink {
        /// Translator URL with the text embedded
        url: String,
    },
}

/// Whether `record` is written in `lang`, comparing primary subtags.
///
/// A post that declares no languages is taken to be in the viewer's language.
pub fn post_in_language(record: &PostRecord, lang: &Language) -> bool {
    match record.langs.as_deref() {
        None | Some([]) => true,
        Some(langs) => langs.iter().any(|l| l.same_primary(lang)),
    }
}

/// Whether to offer translation of `record` to this viewer
pub fn needs_translation(record: &PostRecord, prefs: &ViewerPrefs) -> bool {
    prefs
        .primary_language
        .as_ref()
        .is_some_and(|primary| !post_in_language(record, primary))
}

/// The translation to perform for `text`, per the viewer's configured mode.
///
/// `None` when the viewer has no primary language to translate into.
pub fn translate_action(text: &str, prefs: &ViewerPrefs) -> Option<TranslateAction> {
    let target = prefs.primary_language.clone()?;
    Some(match prefs.translation_mode {
        TranslationMode::NativeOverlay => TranslateAction::Overlay {
            text: text.to_owned(),
            target,
        },
        TranslationMode::ExternalLink => TranslateAction::OpenLink {
            url: translator_link(text, &target),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ALICE, post_with, record};

    fn record_in(langs: &[&str]) -> PostRecord {
        let mut rec = record("bonjour tout le monde");
        rec["langs"] = serde_json::json!(langs);
        post_with(ALICE, "3kfr", rec).post_record().unwrap()
    }

    fn prefs(lang: &str, mode: TranslationMode) -> ViewerPrefs {
        ViewerPrefs::new()
            .primary_language(Language::new(lang).unwrap())
            .translation_mode(mode)
            .build()
    }

    #[test]
    fn regional_variants_share_a_language() {
        let record = record_in(&["en-US"]);
        assert!(!needs_translation(&record, &prefs("en-GB", TranslationMode::NativeOverlay)));
        assert!(needs_translation(&record, &prefs("fr", TranslationMode::NativeOverlay)));
    }

    #[test]
    fn undeclared_language_is_not_translated() {
        let record = record_in(&[]);
        assert!(!needs_translation(&record, &prefs("de", TranslationMode::NativeOverlay)));
    }

    #[test]
    fn no_primary_language_means_no_translation() {
        let record = record_in(&["fr"]);
        assert!(!needs_translation(&record, &ViewerPrefs::default()));
        assert_eq!(translate_action("bonjour", &ViewerPrefs::default()), None);
    }

    #[test]
    fn action_follows_translation_mode() {
        assert_eq!(
            translate_action("bonjour", &prefs("en", TranslationMode::NativeOverlay)),
            Some(TranslateAction::Overlay {
                text: "bonjour".into(),
                target: Language::new("en").unwrap(),
            })
        );
        assert_eq!(
            translate_action("bon jour", &prefs("en", TranslationMode::ExternalLink)),
            Some(TranslateAction::OpenLink {
                url: "https://translate.google.com/?sl=auto&tl=en&text=bon%20jour".into(),
            })
        );
    }
}
