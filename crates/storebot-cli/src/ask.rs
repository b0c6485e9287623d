//! `ask` command: one webhook round-trip without the HTTP layer.

use std::sync::Arc;

use storebot_chat::{ChatEngine, GeminiClient, Intent};
use storebot_core::{Lexicon, PageStore};
use storebot_db::PgPageStore;

/// Runs the chat engine once and prints the reply.
///
/// # Errors
///
/// Returns an error if the lexicon file or text generation client cannot be
/// loaded, or the page store cannot be queried.
pub(crate) async fn run_ask(
    pool: &sqlx::PgPool,
    config: &storebot_core::AppConfig,
    intent: &str,
    query: &str,
) -> anyhow::Result<()> {
    let lexicon = match &config.lexicon_path {
        Some(path) => storebot_core::load_lexicon(path)?,
        None => Lexicon::default(),
    };
    let store: Arc<dyn PageStore> = Arc::new(PgPageStore::new(pool.clone()));

    let mut engine = ChatEngine::new(store, Arc::new(lexicon), &config.store_name)
        .with_threshold(config.match_threshold);
    if let Some(client) = GeminiClient::from_app_config(config)? {
        engine = engine.with_llm(Arc::new(client));
    }

    let intent = Intent::from_display_name(intent);
    let language = engine.language_of(query);
    tracing::debug!(?intent, language = language.as_str(), "asking");

    let reply = engine.respond(intent, query).await?;
    println!("{reply}");
    Ok(())
}
