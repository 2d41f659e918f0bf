//! Append-only activity feed per patient.
//!
//! Timeline writes are always secondary to the request's primary write, so
//! callers go through [`record_quietly`] and a failed append never fails the
//! request.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::storage::StorageError;
use crate::workflows::intake::{PatientCode, PatientRepository};
use crate::workflows::response::{Envelope, PlannerError};

/// Kinds of activity recorded against a patient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimelineEventKind {
    PhaseCompleted,
    PathwaysCalculated,
    DoctorsMatched,
    RecommendationsGenerated,
    ReportAnalyzed,
    DataRecorded,
    MilestoneCompleted,
    ReviewSubmitted,
    CareSessionScheduled,
    StoryChapterAdded,
}

impl TimelineEventKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            TimelineEventKind::PhaseCompleted => "phase_completed",
            TimelineEventKind::PathwaysCalculated => "pathways_calculated",
            TimelineEventKind::DoctorsMatched => "doctors_matched",
            TimelineEventKind::RecommendationsGenerated => "recommendations_generated",
            TimelineEventKind::ReportAnalyzed => "report_analyzed",
            TimelineEventKind::DataRecorded => "data_recorded",
            TimelineEventKind::MilestoneCompleted => "milestone_completed",
            TimelineEventKind::ReviewSubmitted => "review_submitted",
            TimelineEventKind::CareSessionScheduled => "care_session_scheduled",
            TimelineEventKind::StoryChapterAdded => "story_chapter_added",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        [
            TimelineEventKind::PhaseCompleted,
            TimelineEventKind::PathwaysCalculated,
            TimelineEventKind::DoctorsMatched,
            TimelineEventKind::RecommendationsGenerated,
            TimelineEventKind::ReportAnalyzed,
            TimelineEventKind::DataRecorded,
            TimelineEventKind::MilestoneCompleted,
            TimelineEventKind::ReviewSubmitted,
            TimelineEventKind::CareSessionScheduled,
            TimelineEventKind::StoryChapterAdded,
        ]
        .into_iter()
        .find(|kind| kind.as_str() == raw)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEvent {
    pub id: String,
    pub patient_code: PatientCode,
    pub kind: TimelineEventKind,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

impl TimelineEvent {
    pub fn new(
        patient_code: PatientCode,
        kind: TimelineEventKind,
        title: impl Into<String>,
        detail: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            patient_code,
            kind,
            title: title.into(),
            detail,
            occurred_at: Utc::now(),
        }
    }
}

pub trait TimelineRepository: Send + Sync {
    fn append_event(&self, event: &TimelineEvent) -> Result<(), StorageError>;
    /// Newest first.
    fn events(&self, code: &PatientCode) -> Result<Vec<TimelineEvent>, StorageError>;
}

/// Append an event, logging instead of propagating a failure.
pub fn record_quietly<R>(repository: &R, event: TimelineEvent)
where
    R: TimelineRepository + ?Sized,
{
    if let Err(err) = repository.append_event(&event) {
        warn!(
            patient_code = %event.patient_code,
            kind = event.kind.as_str(),
            error = %err,
            "continuing without timeline event"
        );
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineView {
    pub patient_code: PatientCode,
    pub events: Vec<TimelineEvent>,
}

/// Read the feed for a known patient.
pub fn timeline_for<R>(repository: &R, code: &PatientCode) -> Result<TimelineView, PlannerError>
where
    R: PatientRepository + TimelineRepository,
{
    if repository.fetch_patient(code)?.is_none() {
        return Err(PlannerError::not_found("patient", code.as_str()));
    }
    let events = repository.events(code)?;
    Ok(TimelineView {
        patient_code: code.clone(),
        events,
    })
}

pub fn timeline_router<R>(repository: Arc<R>) -> Router
where
    R: PatientRepository + TimelineRepository + 'static,
{
    Router::new()
        .route("/api/timeline/:patient_code", get(timeline_handler::<R>))
        .with_state(repository)
}

pub(crate) async fn timeline_handler<R>(
    State(repository): State<Arc<R>>,
    Path(patient_code): Path<String>,
) -> Response
where
    R: PatientRepository + TimelineRepository + 'static,
{
    let code = PatientCode(patient_code);
    match timeline_for(repository.as_ref(), &code) {
        Ok(view) => Envelope::ok(view).into_response(),
        Err(err) => err.into_response(),
    }
}
