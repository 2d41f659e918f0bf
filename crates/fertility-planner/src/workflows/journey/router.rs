use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, put};
use axum::Router;
use serde::Serialize;

use super::domain::{EntryRequest, ManualDataEntry, MilestoneUpdate};
use super::repository::JourneyRepository;
use super::service::JourneyService;
use crate::workflows::intake::{PatientCode, PatientRepository};
use crate::workflows::response::{Envelope, JsonBody};
use crate::workflows::timeline::TimelineRepository;

#[derive(Debug, Serialize)]
struct EntryResponse {
    entry: ManualDataEntry,
}

pub fn journey_router<R>(service: Arc<JourneyService<R>>) -> Router
where
    R: PatientRepository + JourneyRepository + TimelineRepository + 'static,
{
    Router::new()
        .route(
            "/api/journey/:patient_code/entries",
            get(entries_handler::<R>).post(record_entry_handler::<R>),
        )
        .route(
            "/api/journey/:patient_code/milestones",
            get(milestones_handler::<R>),
        )
        .route(
            "/api/journey/:patient_code/milestones/:step_key",
            put(update_milestone_handler::<R>),
        )
        .with_state(service)
}

pub(crate) async fn record_entry_handler<R>(
    State(service): State<Arc<JourneyService<R>>>,
    Path(patient_code): Path<String>,
    JsonBody(request): JsonBody<EntryRequest>,
) -> Response
where
    R: PatientRepository + JourneyRepository + TimelineRepository + 'static,
{
    match service.record_entry(&PatientCode(patient_code), request) {
        Ok(entry) => Envelope::ok(EntryResponse { entry }).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn entries_handler<R>(
    State(service): State<Arc<JourneyService<R>>>,
    Path(patient_code): Path<String>,
) -> Response
where
    R: PatientRepository + JourneyRepository + TimelineRepository + 'static,
{
    match service.entries(&PatientCode(patient_code)) {
        Ok(entries) => Envelope::ok(entries).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn update_milestone_handler<R>(
    State(service): State<Arc<JourneyService<R>>>,
    Path((patient_code, step_key)): Path<(String, String)>,
    JsonBody(update): JsonBody<MilestoneUpdate>,
) -> Response
where
    R: PatientRepository + JourneyRepository + TimelineRepository + 'static,
{
    match service.update_milestone(&PatientCode(patient_code), &step_key, update) {
        Ok(progress) => Envelope::ok(progress).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn milestones_handler<R>(
    State(service): State<Arc<JourneyService<R>>>,
    Path(patient_code): Path<String>,
) -> Response
where
    R: PatientRepository + JourneyRepository + TimelineRepository + 'static,
{
    match service.milestones(&PatientCode(patient_code)) {
        Ok(progress) => Envelope::ok(progress).into_response(),
        Err(err) => err.into_response(),
    }
}
