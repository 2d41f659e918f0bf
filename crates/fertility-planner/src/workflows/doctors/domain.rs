use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::workflows::intake::PatientCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Female,
    Male,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GenderPreference {
    Female,
    Male,
    #[serde(alias = "noPreference", alias = "none")]
    Any,
}

/// Experience tiers. `Experienced` and `Senior` are adjacent for matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceLevel {
    Early,
    Experienced,
    Senior,
}

impl ExperienceLevel {
    pub fn is_adjacent_to(self, other: ExperienceLevel) -> bool {
        matches!(
            (self, other),
            (ExperienceLevel::Experienced, ExperienceLevel::Senior)
                | (ExperienceLevel::Senior, ExperienceLevel::Experienced)
        )
    }
}

/// Patient-stated doctor preferences. Every criterion is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DoctorPreferences {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_gender: Option<GenderPreference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience_level: Option<ExperienceLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialization: Option<String>,
    /// Kilometres.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_distance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accepts_insurance: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offers_telemedicine: Option<bool>,
}

/// Static roster entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorRecord {
    pub id: String,
    pub name: String,
    pub specialization: String,
    pub gender: Gender,
    pub experience: ExperienceLevel,
    pub clinic: String,
    pub city: String,
    pub postal_code: String,
    pub consultation_fee: u32,
    pub accepts_insurance: bool,
    pub offers_telemedicine: bool,
    pub languages: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DistanceSource {
    /// Great-circle distance between known postal-area centroids.
    Centroid,
    /// Bucketed guess from postal-code arithmetic.
    Estimated,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistanceEstimate {
    pub km: f64,
    pub source: DistanceSource,
}

/// A roster entry ranked for one search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorMatch {
    pub doctor: DoctorRecord,
    pub distance_km: f64,
    pub distance_source: DistanceSource,
    pub match_score: u8,
    pub reasons: Vec<String>,
}

/// Persisted result of one doctor search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorRecommendationSnapshot {
    pub id: String,
    pub patient_code: PatientCode,
    pub postal_code: String,
    pub preferences: DoctorPreferences,
    pub matches: Vec<DoctorMatch>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderReview {
    pub id: String,
    pub doctor_id: String,
    pub patient_code: PatientCode,
    pub rating: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSummary {
    pub doctor_id: String,
    pub average_rating: Option<f32>,
    pub review_count: usize,
}

impl ReviewSummary {
    pub fn from_reviews(doctor_id: &str, reviews: &[ProviderReview]) -> Self {
        let review_count = reviews.len();
        let average_rating = if review_count == 0 {
            None
        } else {
            let total: u32 = reviews.iter().map(|review| u32::from(review.rating)).sum();
            Some(((total as f32 / review_count as f32) * 10.0).round() / 10.0)
        };
        Self {
            doctor_id: doctor_id.to_string(),
            average_rating,
            review_count,
        }
    }
}
