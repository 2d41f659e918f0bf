use fertility_planner::config::AiConfig;
use fertility_planner::error::AppError;
use fertility_planner::storage::SqliteStore;
use fertility_planner::workflows::advisor::{ChatCompletionClient, HttpChatClient};
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) ai_enabled: bool,
}

pub(crate) fn open_store(path: &Path) -> Result<Arc<SqliteStore>, AppError> {
    let store = SqliteStore::open(path)?;
    let schema_version = store.schema_version()?;
    info!(path = %path.display(), schema_version, "database ready");
    Ok(Arc::new(store))
}

pub(crate) fn build_ai_client(config: &AiConfig) -> Result<Arc<HttpChatClient>, AppError> {
    let client = HttpChatClient::from_config(config)?;
    if client.is_enabled() {
        info!(model = %config.model, "AI provider configured");
    } else {
        warn!("AI_API_KEY not set; AI endpoints will serve fallback content");
    }
    Ok(Arc::new(client))
}
