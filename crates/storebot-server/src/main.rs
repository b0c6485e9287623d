mod api;
mod middleware;

use std::sync::Arc;

use storebot_chat::{ChatEngine, GeminiClient};
use storebot_core::{AppConfig, Lexicon, PageStore};
use storebot_db::PgPageStore;
use tracing_subscriber::EnvFilter;

use crate::{
    api::{build_app, AppState},
    middleware::RateLimitState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = storebot_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = storebot_db::PoolConfig::from_app_config(&config);
    let pool = storebot_db::connect_pool(&config.database_url, pool_config).await?;
    let applied = storebot_db::run_migrations(&pool).await?;
    tracing::info!(applied, "migrations up to date");

    let store: Arc<dyn PageStore> = Arc::new(PgPageStore::new(pool));
    let engine = build_engine(&config, store)?;

    let app = build_app(
        AppState {
            engine: Arc::new(engine),
        },
        RateLimitState::per_minute(config.rate_limit_per_minute),
    );

    tracing::info!(
        bind_addr = %config.bind_addr,
        store = %config.store_name,
        "webhook listening"
    );
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

fn build_engine(config: &AppConfig, store: Arc<dyn PageStore>) -> anyhow::Result<ChatEngine> {
    let lexicon = match &config.lexicon_path {
        Some(path) => storebot_core::load_lexicon(path)?,
        None => Lexicon::default(),
    };

    let mut engine = ChatEngine::new(store, Arc::new(lexicon), &config.store_name)
        .with_threshold(config.match_threshold);

    match GeminiClient::from_app_config(config)? {
        Some(client) => {
            tracing::info!(model = %config.llm_model, "text generation enabled");
            engine = engine.with_llm(Arc::new(client));
        }
        None => tracing::info!("GEMINI_API_KEY not set; using template replies only"),
    }

    Ok(engine)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
