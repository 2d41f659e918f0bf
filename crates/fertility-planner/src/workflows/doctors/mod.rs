//! Doctor matching against a static roster.
//!
//! Scoring is additive over independent preference criteria and distance
//! comes from a pluggable [`DistanceEstimator`], so ranking stays
//! deterministic for a given roster and postal code.

pub mod distance;
pub mod domain;
pub mod matching;
pub mod repository;
pub mod roster;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use distance::{DistanceEstimator, PostalDistanceEstimator};
pub use domain::{
    DistanceEstimate, DistanceSource, DoctorMatch, DoctorPreferences,
    DoctorRecommendationSnapshot, DoctorRecord, ExperienceLevel, Gender, GenderPreference,
    ProviderReview, ReviewSummary,
};
pub use matching::{match_score, rank_doctors, MatchScore};
pub use repository::{RecommendationRepository, ReviewRepository};
pub use roster::standard_roster;
pub use router::doctor_router;
pub use service::{DoctorReviews, DoctorService, MatchRequest, RecommendationHistory, ReviewRequest};
