//! Page inspection and maintenance commands.

use clap::Subcommand;
use storebot_core::PageType;
use storebot_db::PageTypeCount;

/// Sub-commands available under `pages`.
#[derive(Debug, Subcommand)]
pub enum PagesCommands {
    /// Show page counts per type
    Stats,
    /// List stored pages, newest first
    List {
        /// Restrict to one page type (product, collection, page)
        #[arg(long = "type")]
        page_type: Option<PageType>,
        /// Maximum number of pages to show
        #[arg(long, default_value = "20")]
        limit: i64,
    },
    /// Make a page eligible for answers again
    Activate { url: String },
    /// Hide a page from answers without deleting it
    Deactivate { url: String },
}

pub(crate) async fn run_pages(pool: &sqlx::PgPool, command: PagesCommands) -> anyhow::Result<()> {
    match command {
        PagesCommands::Stats => run_pages_stats(pool).await,
        PagesCommands::List { page_type, limit } => run_pages_list(pool, page_type, limit).await,
        PagesCommands::Activate { url } => run_set_active(pool, &url, true).await,
        PagesCommands::Deactivate { url } => run_set_active(pool, &url, false).await,
    }
}

/// Recompute every page's type from its URL and print the new breakdown.
///
/// # Errors
///
/// Returns an error if the update fails.
pub(crate) async fn run_fix_page_types(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    let summary = storebot_db::reclassify_page_types(pool).await?;
    println!("reclassified {} page(s)", summary.updated);
    print_type_breakdown(&summary.counts);
    Ok(())
}

async fn run_pages_stats(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    let total = storebot_db::count_pages(pool).await?;
    println!("total pages: {total}");
    let counts = storebot_db::count_pages_by_type(pool).await?;
    print_type_breakdown(&counts);
    Ok(())
}

async fn run_pages_list(
    pool: &sqlx::PgPool,
    page_type: Option<PageType>,
    limit: i64,
) -> anyhow::Result<()> {
    let rows = storebot_db::list_pages(pool, page_type, limit).await?;

    if rows.is_empty() {
        println!("no pages found; run `scrape` first");
        return Ok(());
    }

    let header = format!(
        "{:<12}{:<8}{:<18}{:<32}URL",
        "TYPE", "ACTIVE", "LAST SCRAPED", "TITLE"
    );
    println!("{header}");
    for row in &rows {
        let title = row.title.as_deref().unwrap_or("-");
        println!(
            "{:<12}{:<8}{:<18}{:<32}{}",
            row.page_type,
            if row.is_active { "yes" } else { "no" },
            row.last_scraped.format("%Y-%m-%d %H:%M").to_string(),
            truncate(title, 30),
            row.url
        );
    }

    Ok(())
}

async fn run_set_active(pool: &sqlx::PgPool, url: &str, is_active: bool) -> anyhow::Result<()> {
    match storebot_db::set_page_active(pool, url, is_active).await {
        Ok(()) => {
            let state = if is_active { "activated" } else { "deactivated" };
            println!("{state} {url}");
            Ok(())
        }
        Err(storebot_db::DbError::NotFound) => anyhow::bail!("no page stored for '{url}'"),
        Err(e) => Err(e.into()),
    }
}

pub(crate) fn print_type_breakdown(counts: &[PageTypeCount]) {
    if counts.is_empty() {
        println!("  (no pages)");
        return;
    }
    for count in counts {
        println!(
            "  {:<12}{:>6} total{:>6} active",
            count.page_type, count.total, count.active
        );
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        format!(
            "{}...",
            text.chars().take(max_chars - 3).collect::<String>()
        )
    } else {
        text.to_string()
    }
}
