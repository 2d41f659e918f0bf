use rusqlite::{params, OptionalExtension};

use super::{decode_timestamp, encode_timestamp, SqliteStore, StorageError};
use crate::workflows::intake::{IntakePhase, PatientCode, PatientRecord, PatientRepository};

impl PatientRepository for SqliteStore {
    fn upsert_patient(&self, record: &PatientRecord) -> Result<(), StorageError> {
        let profile_json = serde_json::to_string(&record.profile)?;
        let conn = self.connection()?;
        conn.execute(
            "INSERT INTO patients (patient_code, current_phase, profile_json, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(patient_code) DO UPDATE SET
                current_phase = excluded.current_phase,
                profile_json = excluded.profile_json,
                updated_at = excluded.updated_at",
            params![
                record.patient_code.as_str(),
                record.current_phase.number(),
                profile_json,
                encode_timestamp(record.created_at),
                encode_timestamp(record.updated_at),
            ],
        )?;
        Ok(())
    }

    fn fetch_patient(&self, code: &PatientCode) -> Result<Option<PatientRecord>, StorageError> {
        let conn = self.connection()?;
        let row = conn
            .query_row(
                "SELECT current_phase, profile_json, created_at, updated_at
                 FROM patients WHERE patient_code = ?1",
                params![code.as_str()],
                |row| {
                    Ok((
                        row.get::<_, u8>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                    ))
                },
            )
            .optional()?;

        let Some((phase, profile_json, created_at, updated_at)) = row else {
            return Ok(None);
        };

        Ok(Some(PatientRecord {
            patient_code: code.clone(),
            current_phase: IntakePhase::from_number(phase).unwrap_or(IntakePhase::Basics),
            profile: serde_json::from_str(&profile_json)?,
            created_at: decode_timestamp(&created_at)?,
            updated_at: decode_timestamp(&updated_at)?,
        }))
    }
}
