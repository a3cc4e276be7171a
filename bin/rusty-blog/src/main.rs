//! # Rusty-Blog Binary
//!
//! Assembles a session from settings and compile-time features, loads the
//! whole folder hierarchy plus the first page of posts, and prints the tree.
//!
//! Usage: `rusty-blog [SORT]` where SORT is one of `name_asc`, `name_desc`,
//! `updated_asc`, `updated_desc`, `created_asc`, `created_desc`.

use anyhow::Context;
use rb_config::{ClientSettings, LogFormat};
use rb_core::models::SortOption;
use rb_core::traits::BlogGateway;
use rb_store::{BlogSession, FolderTreeNode};
use std::fmt::Write;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

// Feature-gated imports: the gateway is picked at compile time
#[cfg(feature = "gateway-http")]
use rb_http::HttpGateway;

#[cfg(not(feature = "gateway-http"))]
compile_error!("rusty-blog needs a gateway feature, e.g. `gateway-http`");

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = ClientSettings::load().context("failed to load settings")?;
    init_tracing(settings.log_format);

    let sort_option = match std::env::args().nth(1) {
        Some(arg) => arg.parse::<SortOption>().map_err(anyhow::Error::msg)?,
        None => settings.sort_option,
    };

    // 1. Initialize Gateway Implementation
    #[cfg(feature = "gateway-http")]
    let gateway: Arc<dyn BlogGateway> = Arc::new(HttpGateway::from_settings(&settings)?);

    // 2. One session for this run
    let mut session = BlogSession::new(gateway, settings.page_size, sort_option);

    tracing::info!("📚 Rusty-Blog loading from {}", settings.api_base_url);

    // 3. Folders first, then posts so the tree carries post counts
    session
        .folders_mut()
        .load_all_folders()
        .await
        .context("failed to load folders")?;
    session
        .fetch_my_posts(0, settings.page_size)
        .await
        .context("failed to load posts")?;

    let unfiled = session.posts().posts().iter().filter(|p| p.folder_id.is_none()).count();
    let pagination = session.posts().pagination();

    let mut out = String::new();
    render_tree(session.folders().tree(), 0, &mut out)?;
    writeln!(
        out,
        "-- {} unfiled, {} of {} posts loaded (page {}/{})",
        unfiled,
        session.posts().posts().len(),
        pagination.total_elements,
        pagination.page + 1,
        pagination.total_pages.max(1),
    )?;
    print!("{}", out);

    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}

/// Two spaces per level, `name (N posts)` per folder.
fn render_tree(nodes: &[FolderTreeNode], depth: usize, out: &mut impl Write) -> std::fmt::Result {
    for node in nodes {
        writeln!(
            out,
            "{}{} ({} posts)",
            "  ".repeat(depth),
            node.folder.name,
            node.post_count
        )?;
        render_tree(&node.children, depth + 1, out)?;
    }
    Ok(())
}
