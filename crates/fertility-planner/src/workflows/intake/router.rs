use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use serde::Serialize;

use super::domain::{IntakeRequest, IntakeSession, PatientCode};
use super::repository::PatientRepository;
use super::service::IntakeService;
use crate::workflows::response::{Envelope, JsonBody};
use crate::workflows::timeline::TimelineRepository;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct IntakeResponse {
    patient_code: PatientCode,
    ready_for_pathways: bool,
    session: IntakeSession,
}

/// Router exposing the intake wizard endpoints.
pub fn intake_router<R>(service: Arc<IntakeService<R>>) -> Router
where
    R: PatientRepository + TimelineRepository + 'static,
{
    Router::new()
        .route("/api/patients", post(upsert_handler::<R>))
        .route("/api/patients/:patient_code", get(session_handler::<R>))
        .with_state(service)
}

pub(crate) async fn upsert_handler<R>(
    State(service): State<Arc<IntakeService<R>>>,
    JsonBody(request): JsonBody<IntakeRequest>,
) -> Response
where
    R: PatientRepository + TimelineRepository + 'static,
{
    match service.upsert(request) {
        Ok(session) => respond(session),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn session_handler<R>(
    State(service): State<Arc<IntakeService<R>>>,
    Path(patient_code): Path<String>,
) -> Response
where
    R: PatientRepository + TimelineRepository + 'static,
{
    match service.session(&PatientCode(patient_code)) {
        Ok(session) => respond(session),
        Err(err) => err.into_response(),
    }
}

fn respond(session: IntakeSession) -> Response {
    Envelope::ok(IntakeResponse {
        patient_code: session.patient_code.clone(),
        ready_for_pathways: session.ready_for_pathways(),
        session,
    })
    .into_response()
}
