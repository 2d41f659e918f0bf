use super::domain::{DoctorRecommendationSnapshot, ProviderReview};
use crate::storage::StorageError;
use crate::workflows::intake::PatientCode;

/// One snapshot per doctor search.
pub trait RecommendationRepository: Send + Sync {
    fn insert_recommendation(
        &self,
        snapshot: &DoctorRecommendationSnapshot,
    ) -> Result<(), StorageError>;
    /// Newest first.
    fn recommendations(
        &self,
        code: &PatientCode,
    ) -> Result<Vec<DoctorRecommendationSnapshot>, StorageError>;
}

pub trait ReviewRepository: Send + Sync {
    fn insert_review(&self, review: &ProviderReview) -> Result<(), StorageError>;
    /// Newest first.
    fn reviews_for(&self, doctor_id: &str) -> Result<Vec<ProviderReview>, StorageError>;
}
