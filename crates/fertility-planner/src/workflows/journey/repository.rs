use super::domain::{JourneyMilestone, ManualDataEntry};
use crate::storage::StorageError;
use crate::workflows::intake::PatientCode;

pub trait JourneyRepository: Send + Sync {
    fn insert_entry(&self, entry: &ManualDataEntry) -> Result<(), StorageError>;
    /// Most recent `recorded_on` first.
    fn entries(&self, code: &PatientCode) -> Result<Vec<ManualDataEntry>, StorageError>;
    fn upsert_milestone(&self, milestone: &JourneyMilestone) -> Result<(), StorageError>;
    fn milestones(&self, code: &PatientCode) -> Result<Vec<JourneyMilestone>, StorageError>;
}
