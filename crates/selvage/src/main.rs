//! Print the render plan of a thread fetched from `app.bsky.feed.getPostThread`.

use clap::Parser;
use miette::{IntoDiagnostic, Result};
use selvage::moderation::{LabelModerator, LabelerDefs, ModerationPrefs, Surface};
use selvage::prefs::{Viewer, ViewerPrefs};
use selvage::shadow::PostShadowStore;
use selvage::thread::{
    FlatItem, ThreadItemPlan, ThreadMode, ThreadNode, ThreadRenderPolicy, ThreadSession, flatten,
};
use selvage::common::{Did, Handle};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Show how each post of a thread would be laid out"
)]
struct Args {
    /// getPostThread response (or a bare thread node) as JSON
    thread: PathBuf,

    /// Viewer preferences JSON
    #[arg(long)]
    prefs: Option<PathBuf>,

    /// Moderation preferences JSON
    #[arg(long)]
    moderation: Option<PathBuf>,

    /// Labelers to trust; repeat for several. Trusts every labeler when omitted.
    #[arg(long = "labeler")]
    labelers: Vec<String>,

    /// DID of the signed-in viewer
    #[arg(long)]
    viewer: Option<String>,

    /// Handle of the signed-in viewer
    #[arg(long, requires = "viewer")]
    handle: Option<String>,

    /// Lay replies out as an indented tree
    #[arg(long)]
    tree: bool,

    /// Override the line limit for long replies
    #[arg(long)]
    max_lines: Option<usize>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let thread = ThreadNode::from_json(&read(&args.thread)?)?;
    let mut prefs = match &args.prefs {
        Some(path) => ViewerPrefs::from_json(&read(path)?)?,
        None => ViewerPrefs::default(),
    };
    if let Some(max_lines) = args.max_lines {
        prefs.max_post_lines = max_lines;
    }
    let moderation_prefs = match &args.moderation {
        Some(path) => ModerationPrefs::from_json(&read(path)?)?,
        None => ModerationPrefs::default(),
    };
    let viewer = match &args.viewer {
        Some(did) => Viewer::signed_in(
            Did::new(did)?,
            args.handle.as_deref().map(Handle::new).transpose()?,
        ),
        None => Viewer::anonymous(),
    };
    let labelers = args
        .labelers
        .iter()
        .map(Did::new)
        .collect::<Result<Vec<_>, _>>()?;

    let mode = if args.tree {
        ThreadMode::Tree
    } else {
        ThreadMode::Linear
    };
    let items = flatten(&thread, mode);
    let policy = ThreadRenderPolicy::new(prefs, viewer);
    let moderator = LabelModerator::new(LabelerDefs::new(), labelers);
    let plans = ThreadSession::new().plan_thread(
        &policy,
        &items,
        &PostShadowStore::new(),
        &moderator,
        &moderation_prefs,
    );

    for (item, plan) in items.iter().zip(&plans) {
        println!("{}", describe(item, plan));
    }
    Ok(())
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).into_diagnostic()
}

fn describe(item: &FlatItem, plan: &ThreadItemPlan) -> String {
    let depth = item.depth();
    let indent = "  ".repeat(depth.max(0) as usize);
    let uri = match item {
        FlatItem::Post { post, .. } => post.uri.to_string(),
        FlatItem::NotFound { uri, .. } | FlatItem::Blocked { uri, .. } => uri.to_string(),
    };
    let summary = match plan {
        ThreadItemPlan::Deleted => "deleted".to_string(),
        ThreadItemPlan::InvalidRecord { message, .. } => format!("invalid record: {message}"),
        ThreadItemPlan::NotFound { .. } => "not found".to_string(),
        ThreadItemPlan::Blocked { .. } => "blocked".to_string(),
        ThreadItemPlan::Highlighted(layout) => {
            let mut flags = vec!["highlighted".to_string()];
            if layout.top_reply_line {
                flags.push("reply-line".into());
            }
            if let Some(engagement) = &layout.engagement {
                if let Some(likes) = &engagement.likes {
                    flags.push(format!("likes={}", likes.count));
                }
                if let Some(reposts) = &engagement.reposts {
                    flags.push(format!("reposts={}", reposts.count));
                }
            }
            if layout.translate.is_some() {
                flags.push("translate".into());
            }
            if layout.content_hider.blur {
                flags.push(format!("covered({})", Surface::ContentView));
            }
            flags.join(" ")
        }
        ThreadItemPlan::Row(row) => {
            let mut flags = vec![format!("{:?}", row.avatar).to_lowercase()];
            if row.parent_line {
                flags.push("parent-line".into());
            }
            if row.child_line {
                flags.push("child-line".into());
            }
            if row.indent_guides > 0 {
                flags.push(format!("guides={}", row.indent_guides));
            }
            if row.text.show_more() {
                flags.push(format!("collapsed@{}", row.text.max_lines));
            }
            if row.load_more {
                flags.push("load-more".into());
            }
            if row.hider.filter {
                flags.push(format!("filtered({})", Surface::ContentList));
            } else if row.hider.blur {
                flags.push(format!("covered({})", Surface::ContentList));
            }
            flags.join(" ")
        }
    };
    format!("{indent}[{depth:>2}] {uri}  {summary}")
}
