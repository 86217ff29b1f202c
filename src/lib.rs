pub mod api;
pub mod config;
pub mod errors;
pub mod llm;
pub mod logging;
pub mod models;
pub mod rag;
pub mod store;

use llm::AnthropicClient;
use models::sample_cases;
use rag::LegalAssistant;
use store::CaseStore;
use store::MilvusClient;
use tracing::info;
use tracing::warn;

pub use config::AppConfig;
pub use errors::*;

/// The production assistant: Milvus-backed case store plus the Anthropic
/// generation client.
pub type Assistant = LegalAssistant<MilvusClient, AnthropicClient>;

/// Build the production assistant from configuration.
///
/// Connects both long-lived service handles, then makes startup idempotent:
/// the collection schema is ensured and the built-in sample cases are
/// inserted only when the store is empty. A store failure here is not
/// fatal: searches degrade to the built-in sample cases until the store
/// recovers.
pub async fn bootstrap(config: &AppConfig) -> Result<Assistant> {
    let client = MilvusClient::new(config.store_url(), config.collection())?;
    let store = CaseStore::new(client, config.dimension());

    match store.ensure_schema().await {
        Ok(()) => {
            if let Err(e) = store.seed_if_empty(&sample_cases(config.dimension())).await {
                warn!("Seeding failed, store may be empty: {}", e);
            } else {
                info!("Case store ready: collection '{}'", config.collection());
            }
        }
        Err(e) => {
            warn!(
                "Store bootstrap failed, searches will fall back to sample cases: {}",
                e
            );
        }
    }

    let generator = AnthropicClient::new(config)?;

    Ok(LegalAssistant::new(
        store,
        generator,
        config.retrieval_limit(),
    ))
}
