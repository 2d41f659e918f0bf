use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use serde::Serialize;

use super::domain::{
    ChapterRequest, PersonalizedTimelineItem, PlanRequest, RemoteCareSession, SessionRequest,
    StoryChapter, TimelineItemRequest,
};
use super::repository::CareRepository;
use super::service::CareService;
use crate::workflows::intake::{PatientCode, PatientRepository};
use crate::workflows::response::{Envelope, JsonBody};
use crate::workflows::timeline::TimelineRepository;

#[derive(Debug, Serialize)]
struct SessionResponse {
    session: RemoteCareSession,
}

#[derive(Debug, Serialize)]
struct ItemResponse {
    item: PersonalizedTimelineItem,
}

#[derive(Debug, Serialize)]
struct ChapterResponse {
    chapter: StoryChapter,
}

pub fn care_router<R>(service: Arc<CareService<R>>) -> Router
where
    R: PatientRepository + CareRepository + TimelineRepository + 'static,
{
    Router::new()
        .route(
            "/api/care/:patient_code/sessions",
            get(sessions_handler::<R>).post(schedule_session_handler::<R>),
        )
        .route(
            "/api/care/:patient_code/timeline",
            get(timeline_handler::<R>).post(add_item_handler::<R>),
        )
        .route("/api/care/:patient_code/timeline/plan", post(plan_handler::<R>))
        .route(
            "/api/care/:patient_code/story",
            get(story_handler::<R>).post(add_chapter_handler::<R>),
        )
        .with_state(service)
}

pub(crate) async fn schedule_session_handler<R>(
    State(service): State<Arc<CareService<R>>>,
    Path(patient_code): Path<String>,
    JsonBody(request): JsonBody<SessionRequest>,
) -> Response
where
    R: PatientRepository + CareRepository + TimelineRepository + 'static,
{
    match service.schedule_session(&PatientCode(patient_code), request) {
        Ok(session) => Envelope::ok(SessionResponse { session }).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn sessions_handler<R>(
    State(service): State<Arc<CareService<R>>>,
    Path(patient_code): Path<String>,
) -> Response
where
    R: PatientRepository + CareRepository + TimelineRepository + 'static,
{
    match service.sessions(&PatientCode(patient_code)) {
        Ok(sessions) => Envelope::ok(sessions).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn add_item_handler<R>(
    State(service): State<Arc<CareService<R>>>,
    Path(patient_code): Path<String>,
    JsonBody(request): JsonBody<TimelineItemRequest>,
) -> Response
where
    R: PatientRepository + CareRepository + TimelineRepository + 'static,
{
    match service.add_timeline_item(&PatientCode(patient_code), request) {
        Ok(item) => Envelope::ok(ItemResponse { item }).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn plan_handler<R>(
    State(service): State<Arc<CareService<R>>>,
    Path(patient_code): Path<String>,
    JsonBody(request): JsonBody<PlanRequest>,
) -> Response
where
    R: PatientRepository + CareRepository + TimelineRepository + 'static,
{
    match service.plan_timeline(&PatientCode(patient_code), request) {
        Ok(timeline) => Envelope::ok(timeline).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn timeline_handler<R>(
    State(service): State<Arc<CareService<R>>>,
    Path(patient_code): Path<String>,
) -> Response
where
    R: PatientRepository + CareRepository + TimelineRepository + 'static,
{
    match service.timeline(&PatientCode(patient_code)) {
        Ok(timeline) => Envelope::ok(timeline).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn add_chapter_handler<R>(
    State(service): State<Arc<CareService<R>>>,
    Path(patient_code): Path<String>,
    JsonBody(request): JsonBody<ChapterRequest>,
) -> Response
where
    R: PatientRepository + CareRepository + TimelineRepository + 'static,
{
    match service.add_chapter(&PatientCode(patient_code), request) {
        Ok(chapter) => Envelope::ok(ChapterResponse { chapter }).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn story_handler<R>(
    State(service): State<Arc<CareService<R>>>,
    Path(patient_code): Path<String>,
) -> Response
where
    R: PatientRepository + CareRepository + TimelineRepository + 'static,
{
    match service.story(&PatientCode(patient_code)) {
        Ok(story) => Envelope::ok(story).into_response(),
        Err(err) => err.into_response(),
    }
}
