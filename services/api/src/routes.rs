use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use fertility_planner::storage::SqliteStore;
use fertility_planner::workflows::advisor::{advisor_router, AdvisorService, ChatCompletionClient};
use fertility_planner::workflows::care::{care_router, CareService};
use fertility_planner::workflows::doctors::{doctor_router, DoctorService};
use fertility_planner::workflows::intake::{intake_router, IntakeService};
use fertility_planner::workflows::journey::{journey_router, JourneyService};
use fertility_planner::workflows::pathways::{pathway_router, PathwayService};
use fertility_planner::workflows::timeline::timeline_router;
use serde_json::json;
use std::sync::Arc;

/// Every workflow router over one shared store, plus the operational endpoints.
pub(crate) fn with_planner_routes<C>(store: Arc<SqliteStore>, client: Arc<C>) -> axum::Router
where
    C: ChatCompletionClient + 'static,
{
    intake_router(Arc::new(IntakeService::new(store.clone())))
        .merge(pathway_router(Arc::new(PathwayService::new(store.clone()))))
        .merge(doctor_router(Arc::new(DoctorService::new(store.clone()))))
        .merge(journey_router(Arc::new(JourneyService::new(store.clone()))))
        .merge(care_router(Arc::new(CareService::new(store.clone()))))
        .merge(timeline_router(store.clone()))
        .merge(advisor_router(Arc::new(AdvisorService::new(store, client))))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready", "aiEnabled": state.ai_enabled })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
