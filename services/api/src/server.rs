use crate::cli::ServeArgs;
use crate::infra::{build_ai_client, open_store, AppState};
use crate::routes::with_planner_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use fertility_planner::config::AppConfig;
use fertility_planner::error::AppError;
use fertility_planner::telemetry;
use fertility_planner::workflows::advisor::ChatCompletionClient;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(path) = args.database.take() {
        config.database.path = path;
    }

    telemetry::init(&config.telemetry)?;

    let store = open_store(&config.database.path)?;
    let client = build_ai_client(&config.ai)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        ai_enabled: client.is_enabled(),
    };

    let app = with_planner_routes(store, client)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        in_memory = config.database.is_in_memory(),
        "fertility planner ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
