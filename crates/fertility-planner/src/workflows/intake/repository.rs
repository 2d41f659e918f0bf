use super::domain::{PatientCode, PatientRecord};
use crate::storage::StorageError;

/// Patient persistence keyed by the generated patient code.
pub trait PatientRepository: Send + Sync {
    /// Insert or replace the row for `record.patient_code`.
    fn upsert_patient(&self, record: &PatientRecord) -> Result<(), StorageError>;
    fn fetch_patient(&self, code: &PatientCode) -> Result<Option<PatientRecord>, StorageError>;
}
