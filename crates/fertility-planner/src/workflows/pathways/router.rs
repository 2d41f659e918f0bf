use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;

use super::repository::PathwayRepository;
use super::service::{CalculateRequest, PathwayService};
use crate::workflows::intake::{PatientCode, PatientRepository};
use crate::workflows::response::{Envelope, JsonBody};
use crate::workflows::timeline::TimelineRepository;

pub fn pathway_router<R>(service: Arc<PathwayService<R>>) -> Router
where
    R: PatientRepository + PathwayRepository + TimelineRepository + 'static,
{
    Router::new()
        .route("/api/pathways/calculate", post(calculate_handler::<R>))
        .route("/api/pathways/:patient_code", get(latest_handler::<R>))
        .with_state(service)
}

pub(crate) async fn calculate_handler<R>(
    State(service): State<Arc<PathwayService<R>>>,
    JsonBody(request): JsonBody<CalculateRequest>,
) -> Response
where
    R: PatientRepository + PathwayRepository + TimelineRepository + 'static,
{
    match service.calculate(request) {
        Ok(calculation) => Envelope::ok(calculation).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn latest_handler<R>(
    State(service): State<Arc<PathwayService<R>>>,
    Path(patient_code): Path<String>,
) -> Response
where
    R: PatientRepository + PathwayRepository + TimelineRepository + 'static,
{
    match service.latest(&PatientCode(patient_code)) {
        Ok(plan) => Envelope::ok(plan).into_response(),
        Err(err) => err.into_response(),
    }
}
