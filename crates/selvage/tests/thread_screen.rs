use selvage::common::{AtUri, Did};
use selvage::menu::{HiddenPosts, MenuContext, MenuEffect, MenuItem, MutedThreads, PostOptions};
use selvage::moderation::{LabelModerator, LabelerDefs, ModerationPrefs};
use selvage::prefs::{Viewer, ViewerPrefs};
use selvage::shadow::{PostAction, PostShadowStore};
use selvage::thread::{
    FlatItem, ThreadItemPlan, ThreadMode, ThreadNode, ThreadRenderPolicy, ThreadSession, flatten,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

const THREAD_JSON: &str = include_str!("fixtures/labeled_thread.json");

fn items() -> Vec<FlatItem> {
    let thread = ThreadNode::from_json(THREAD_JSON).unwrap();
    flatten(&thread, ThreadMode::Linear)
}

fn viewer(did: &str) -> Viewer {
    Viewer::signed_in(Did::new(did).unwrap(), None)
}

fn plan(
    items: &[FlatItem],
    store: &PostShadowStore,
    moderator: &LabelModerator,
    prefs: &ModerationPrefs,
) -> Vec<ThreadItemPlan> {
    let policy = ThreadRenderPolicy::new(ViewerPrefs::default(), viewer("did:plc:alice"));
    ThreadSession::new().plan_thread(&policy, items, store, moderator, prefs)
}

#[test]
fn labels_and_mutes_cover_rows() {
    let items = items();
    assert_eq!(
        items.iter().map(FlatItem::depth).collect::<Vec<_>>(),
        [0, 1, 1, 1, 1, 2]
    );
    let plans = plan(
        &items,
        &PostShadowStore::new(),
        &LabelModerator::default(),
        &ModerationPrefs::default(),
    );

    assert!(plans[0].as_highlighted().is_some());

    let labeled = plans[1].as_row().unwrap();
    assert!(labeled.hider.filter);
    assert!(!labeled.hider.muted);

    let muted = plans[2].as_row().unwrap();
    assert!(muted.hider.filter);
    assert!(muted.hider.muted);

    assert!(matches!(plans[3], ThreadItemPlan::Blocked { .. }));
    assert!(plans[4].as_row().unwrap().hider.is_clear());
    assert!(plans[5].as_row().unwrap().hider.is_clear());
}

#[test]
fn labels_from_untrusted_labelers_are_ignored() {
    let moderator = LabelModerator::new(
        LabelerDefs::new(),
        vec![Did::new("did:plc:someoneelse").unwrap()],
    );
    let plans = plan(
        &items(),
        &PostShadowStore::new(),
        &moderator,
        &ModerationPrefs::default(),
    );
    assert!(plans[1].as_row().unwrap().hider.is_clear());
    // mutes don't come from labelers
    assert!(plans[2].as_row().unwrap().hider.muted);
}

#[test]
fn viewer_preference_turns_hide_into_warning() {
    let prefs = ModerationPrefs::from_json(r#"{ "labels": { "porn": "warn" } }"#).unwrap();
    let plans = plan(
        &items(),
        &PostShadowStore::new(),
        &LabelModerator::default(),
        &prefs,
    );
    let labeled = plans[1].as_row().unwrap();
    assert!(!labeled.hider.filter);
    assert!(labeled.hider.alert);
}

#[test]
fn optimistic_like_then_delete_from_the_menu() {
    let items = items();
    let store = PostShadowStore::new();
    let moderator = LabelModerator::default();
    let prefs = ModerationPrefs::default();

    let (root, _) = items[0].post().unwrap();
    store.apply(
        root,
        PostAction::Like {
            uri: AtUri::new("at://did:plc:alice/app.bsky.feed.like/3llike").unwrap(),
        },
    );
    let plans = plan(&items, &store, &moderator, &prefs);
    let engagement = plans[0]
        .as_highlighted()
        .and_then(|layout| layout.engagement.clone())
        .unwrap();
    assert_eq!(engagement.likes.unwrap().count, 5);
    assert_eq!(engagement.reposts.unwrap().count, 2);

    let (answer, _) = items[5].post().unwrap();
    let notified = Arc::new(AtomicUsize::new(0));
    let _subscription = {
        let notified = notified.clone();
        store.subscribe(answer.uri.clone(), move |_, _| {
            notified.fetch_add(1, Ordering::SeqCst);
        })
    };

    let me = viewer("did:plc:alice");
    let view_prefs = ViewerPrefs::default();
    let muted_threads = MutedThreads::new();
    let hidden_posts = HiddenPosts::new();
    let ctx = MenuContext {
        post: answer,
        viewer: &me,
        prefs: &view_prefs,
        muted_threads: &muted_threads,
        hidden_posts: &hidden_posts,
        feed_feedback: false,
        feed_context: None,
    };
    let menu = PostOptions::build(&ctx);
    assert!(menu.iter().any(|group| group.items.contains(&MenuItem::Delete)));
    assert_eq!(
        PostOptions::select(&ctx, MenuItem::Delete),
        Some(MenuEffect::ConfirmDelete {
            uri: answer.uri.clone()
        })
    );

    PostOptions::confirm_delete(&store, answer);
    assert_eq!(notified.load(Ordering::SeqCst), 1);

    let plans = plan(&items, &store, &moderator, &prefs);
    assert_eq!(plans[5], ThreadItemPlan::Deleted);
    // the rest of the thread is untouched
    assert!(plans[4].as_row().is_some());
}

#[test]
fn muting_the_thread_uses_its_root() {
    let items = items();
    let (reply, _) = items[4].post().unwrap();
    let me = viewer("did:plc:bob");
    let view_prefs = ViewerPrefs::default();
    let mut muted_threads = MutedThreads::new();
    let hidden_posts = HiddenPosts::new();

    let effect = PostOptions::select(
        &MenuContext {
            post: reply,
            viewer: &me,
            prefs: &view_prefs,
            muted_threads: &muted_threads,
            hidden_posts: &hidden_posts,
            feed_feedback: false,
            feed_context: None,
        },
        MenuItem::MuteThread,
    )
    .unwrap();
    let mut feedback = selvage::feedback::FeedFeedback::new(false);
    assert_eq!(
        PostOptions::apply_local(effect, &mut muted_threads, &mut feedback),
        None
    );
    let root = AtUri::new("at://did:plc:alice/app.bsky.feed.post/3lroot").unwrap();
    assert!(muted_threads.is_muted(&root));
}
