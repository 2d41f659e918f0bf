use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use serde::Serialize;

use super::domain::{DoctorRecord, ProviderReview};
use super::repository::{RecommendationRepository, ReviewRepository};
use super::service::{DoctorService, MatchRequest, ReviewRequest};
use crate::workflows::intake::{PatientCode, PatientRepository};
use crate::workflows::response::{Envelope, JsonBody};
use crate::workflows::timeline::TimelineRepository;

#[derive(Debug, Serialize)]
struct RosterResponse<'a> {
    doctors: &'a [DoctorRecord],
}

pub fn doctor_router<R>(service: Arc<DoctorService<R>>) -> Router
where
    R: PatientRepository
        + RecommendationRepository
        + ReviewRepository
        + TimelineRepository
        + 'static,
{
    Router::new()
        .route("/api/doctors", get(roster_handler::<R>))
        .route("/api/doctors/match", post(match_handler::<R>))
        .route(
            "/api/doctors/:doctor_id/reviews",
            get(reviews_handler::<R>).post(submit_review_handler::<R>),
        )
        .route(
            "/api/patients/:patient_code/doctor-recommendations",
            get(history_handler::<R>),
        )
        .with_state(service)
}

pub(crate) async fn roster_handler<R>(State(service): State<Arc<DoctorService<R>>>) -> Response
where
    R: PatientRepository
        + RecommendationRepository
        + ReviewRepository
        + TimelineRepository
        + 'static,
{
    Envelope::ok(RosterResponse {
        doctors: service.roster(),
    })
    .into_response()
}

pub(crate) async fn match_handler<R>(
    State(service): State<Arc<DoctorService<R>>>,
    JsonBody(request): JsonBody<MatchRequest>,
) -> Response
where
    R: PatientRepository
        + RecommendationRepository
        + ReviewRepository
        + TimelineRepository
        + 'static,
{
    match service.recommend(request) {
        Ok(snapshot) => Envelope::ok(snapshot).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn history_handler<R>(
    State(service): State<Arc<DoctorService<R>>>,
    Path(patient_code): Path<String>,
) -> Response
where
    R: PatientRepository
        + RecommendationRepository
        + ReviewRepository
        + TimelineRepository
        + 'static,
{
    match service.history(&PatientCode(patient_code)) {
        Ok(history) => Envelope::ok(history).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn submit_review_handler<R>(
    State(service): State<Arc<DoctorService<R>>>,
    Path(doctor_id): Path<String>,
    JsonBody(request): JsonBody<ReviewRequest>,
) -> Response
where
    R: PatientRepository
        + RecommendationRepository
        + ReviewRepository
        + TimelineRepository
        + 'static,
{
    match service.submit_review(&doctor_id, request) {
        Ok(review) => Envelope::ok(ReviewResponse { review }).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn reviews_handler<R>(
    State(service): State<Arc<DoctorService<R>>>,
    Path(doctor_id): Path<String>,
) -> Response
where
    R: PatientRepository
        + RecommendationRepository
        + ReviewRepository
        + TimelineRepository
        + 'static,
{
    match service.reviews(&doctor_id) {
        Ok(reviews) => Envelope::ok(reviews).into_response(),
        Err(err) => err.into_response(),
    }
}

#[derive(Debug, Serialize)]
struct ReviewResponse {
    review: ProviderReview,
}
