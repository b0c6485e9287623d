mod ask;
mod pages;
mod scrape;

use clap::{Parser, Subcommand};
use storebot_core::AppConfig;

use crate::pages::PagesCommands;

#[derive(Debug, Parser)]
#[command(name = "storebot-cli")]
#[command(about = "Storefront chatbot maintenance commands")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Scrape products, collections, and the homepage into the database
    Scrape {
        /// Storefront root URL (defaults to STOREBOT_STORE_URL)
        #[arg(long)]
        domain: Option<String>,

        /// Maximum number of products to save (defaults to STOREBOT_SCRAPE_LIMIT)
        #[arg(long)]
        limit: Option<usize>,

        /// Delete every stored page before scraping
        #[arg(long)]
        clear: bool,
    },
    /// Recompute page types from stored URLs
    FixPageTypes,
    /// Inspect and toggle stored pages
    Pages {
        #[command(subcommand)]
        command: PagesCommands,
    },
    /// Answer one question against the stored pages
    Ask {
        /// Dialogflow intent display name
        #[arg(long, default_value = storebot_chat::PRODUCT_QUERY_INTENT)]
        intent: String,

        /// The shopper's message
        query: String,
    },
    /// Database maintenance
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    /// Check that the database is reachable
    Ping,
    /// Apply pending migrations
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("storebot-cli ready; run with --help to list commands");
        return Ok(());
    };

    let config = storebot_core::load_app_config()?;
    let pool = connect(&config).await?;

    match command {
        Commands::Scrape {
            domain,
            limit,
            clear,
        } => scrape::run_scrape(&pool, &config, domain, limit, clear).await?,
        Commands::FixPageTypes => pages::run_fix_page_types(&pool).await?,
        Commands::Pages { command } => pages::run_pages(&pool, command).await?,
        Commands::Ask { intent, query } => ask::run_ask(&pool, &config, &intent, &query).await?,
        Commands::Db { command } => match command {
            DbCommands::Ping => {
                storebot_db::health_check(&pool).await?;
                println!("database ok");
            }
            DbCommands::Migrate => {
                let applied = storebot_db::run_migrations(&pool).await?;
                println!("applied {applied} migration(s)");
            }
        },
    }

    Ok(())
}

async fn connect(config: &AppConfig) -> anyhow::Result<sqlx::PgPool> {
    let pool_config = storebot_db::PoolConfig::from_app_config(config);
    let pool = storebot_db::connect_pool(&config.database_url, pool_config)
        .await
        .map_err(|e| anyhow::anyhow!("failed to connect to database: {e}"))?;
    Ok(pool)
}
