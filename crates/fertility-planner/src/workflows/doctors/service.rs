use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use super::distance::{DistanceEstimator, PostalDistanceEstimator};
use super::domain::{
    DoctorPreferences, DoctorRecommendationSnapshot, DoctorRecord, ProviderReview, ReviewSummary,
};
use super::matching::rank_doctors;
use super::repository::{RecommendationRepository, ReviewRepository};
use super::roster::standard_roster;
use crate::workflows::intake::{PatientCode, PatientRecord, PatientRepository};
use crate::workflows::response::{require_fields, PlannerError};
use crate::workflows::timeline::{
    record_quietly, TimelineEvent, TimelineEventKind, TimelineRepository,
};

/// Body of `POST /api/doctors/match`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MatchRequest {
    pub patient_code: Option<String>,
    pub postal_code: Option<String>,
    pub city: Option<String>,
    /// Falls back to the preferences stored on the profile.
    pub preferences: Option<DoctorPreferences>,
}

/// Body of `POST /api/doctors/:doctor_id/reviews`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReviewRequest {
    pub patient_code: Option<String>,
    pub rating: Option<i64>,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationHistory {
    pub patient_code: PatientCode,
    pub recommendations: Vec<DoctorRecommendationSnapshot>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorReviews {
    #[serde(flatten)]
    pub summary: ReviewSummary,
    pub reviews: Vec<ProviderReview>,
}

pub struct DoctorService<R> {
    repository: Arc<R>,
    roster: Vec<DoctorRecord>,
    estimator: Arc<dyn DistanceEstimator>,
}

impl<R> DoctorService<R>
where
    R: PatientRepository
        + RecommendationRepository
        + ReviewRepository
        + TimelineRepository
        + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self {
            repository,
            roster: standard_roster(),
            estimator: Arc::new(PostalDistanceEstimator),
        }
    }

    pub fn with_roster(mut self, roster: Vec<DoctorRecord>) -> Self {
        self.roster = roster;
        self
    }

    pub fn with_estimator(mut self, estimator: Arc<dyn DistanceEstimator>) -> Self {
        self.estimator = estimator;
        self
    }

    pub fn roster(&self) -> &[DoctorRecord] {
        &self.roster
    }

    /// Rank the whole roster for a patient and keep the result as a snapshot.
    pub fn recommend(
        &self,
        request: MatchRequest,
    ) -> Result<DoctorRecommendationSnapshot, PlannerError> {
        require_fields(&[
            ("patientCode", request.patient_code.as_deref()),
            ("postalCode", request.postal_code.as_deref()),
        ])?;
        let code = request
            .patient_code
            .as_deref()
            .and_then(PatientCode::parse)
            .ok_or(PlannerError::MissingFields(vec!["patientCode"]))?;
        let postal_code = request
            .postal_code
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .to_string();

        let mut record = self.patient(&code)?;
        let preferences = request
            .preferences
            .clone()
            .or_else(|| record.profile.doctor_preferences.clone())
            .unwrap_or_default();

        record.profile.postal_code = Some(postal_code.clone());
        if let Some(city) = request.city.filter(|city| !city.trim().is_empty()) {
            record.profile.city = Some(city);
        }
        if request.preferences.is_some() {
            record.profile.doctor_preferences = Some(preferences.clone());
        }
        record.updated_at = Utc::now();
        self.repository.upsert_patient(&record)?;

        let matches = rank_doctors(
            &self.roster,
            &postal_code,
            &preferences,
            self.estimator.as_ref(),
        );

        let snapshot = DoctorRecommendationSnapshot {
            id: Uuid::new_v4().to_string(),
            patient_code: code.clone(),
            postal_code,
            preferences,
            matches,
            created_at: Utc::now(),
        };
        self.repository.insert_recommendation(&snapshot)?;

        let top = snapshot.matches.first().map(|m| m.doctor.name.clone());
        info!(
            patient_code = %code,
            candidates = snapshot.matches.len(),
            top_score = snapshot.matches.first().map(|m| m.match_score).unwrap_or(0),
            "doctor matches ranked"
        );

        record_quietly(
            self.repository.as_ref(),
            TimelineEvent::new(
                code,
                TimelineEventKind::DoctorsMatched,
                "Doctor matches found",
                top.map(|name| format!("Best match: {name}")),
            ),
        );

        Ok(snapshot)
    }

    pub fn history(&self, code: &PatientCode) -> Result<RecommendationHistory, PlannerError> {
        self.patient(code)?;
        let recommendations = self.repository.recommendations(code)?;
        Ok(RecommendationHistory {
            patient_code: code.clone(),
            recommendations,
        })
    }

    pub fn submit_review(
        &self,
        doctor_id: &str,
        request: ReviewRequest,
    ) -> Result<ProviderReview, PlannerError> {
        let doctor = self.doctor(doctor_id)?;
        let code = request
            .patient_code
            .as_deref()
            .and_then(PatientCode::parse)
            .ok_or(PlannerError::MissingFields(vec!["patientCode"]))?;
        let rating = request
            .rating
            .ok_or(PlannerError::MissingFields(vec!["rating"]))?;
        let rating = u8::try_from(rating)
            .ok()
            .filter(|rating| (1..=5).contains(rating))
            .ok_or_else(|| {
                PlannerError::InvalidInput(format!("rating must be between 1 and 5, got {rating}"))
            })?;
        self.patient(&code)?;

        let review = ProviderReview {
            id: Uuid::new_v4().to_string(),
            doctor_id: doctor.id.clone(),
            patient_code: code.clone(),
            rating,
            comment: request
                .comment
                .map(|comment| comment.trim().to_string())
                .filter(|comment| !comment.is_empty()),
            created_at: Utc::now(),
        };
        self.repository.insert_review(&review)?;
        info!(patient_code = %code, doctor_id = %doctor.id, rating, "provider review saved");

        record_quietly(
            self.repository.as_ref(),
            TimelineEvent::new(
                code,
                TimelineEventKind::ReviewSubmitted,
                format!("Reviewed {}", doctor.name),
                Some(format!("{rating}/5")),
            ),
        );

        Ok(review)
    }

    pub fn reviews(&self, doctor_id: &str) -> Result<DoctorReviews, PlannerError> {
        let doctor = self.doctor(doctor_id)?;
        let reviews = self.repository.reviews_for(&doctor.id)?;
        Ok(DoctorReviews {
            summary: ReviewSummary::from_reviews(&doctor.id, &reviews),
            reviews,
        })
    }

    fn doctor(&self, doctor_id: &str) -> Result<&DoctorRecord, PlannerError> {
        self.roster
            .iter()
            .find(|doctor| doctor.id == doctor_id)
            .ok_or_else(|| PlannerError::not_found("doctor", doctor_id))
    }

    fn patient(&self, code: &PatientCode) -> Result<PatientRecord, PlannerError> {
        self.repository
            .fetch_patient(code)?
            .ok_or_else(|| PlannerError::not_found("patient", code.as_str()))
    }
}
