use chrono::{DateTime, Utc};

use super::domain::{PathwayPlan, TreatmentPathwayOption};
use crate::storage::StorageError;
use crate::workflows::intake::PatientCode;

/// Stored pathways are overwritten wholesale on every recalculation.
pub trait PathwayRepository: Send + Sync {
    fn replace_pathways(
        &self,
        code: &PatientCode,
        pathways: &[TreatmentPathwayOption],
        calculated_at: DateTime<Utc>,
    ) -> Result<(), StorageError>;
    fn latest_plan(&self, code: &PatientCode) -> Result<Option<PathwayPlan>, StorageError>;
}
