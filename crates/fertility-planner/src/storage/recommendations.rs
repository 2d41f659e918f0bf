use rusqlite::params;

use super::{decode_timestamp, encode_timestamp, SqliteStore, StorageError};
use crate::workflows::doctors::{DoctorRecommendationSnapshot, RecommendationRepository};
use crate::workflows::intake::PatientCode;

impl RecommendationRepository for SqliteStore {
    fn insert_recommendation(
        &self,
        snapshot: &DoctorRecommendationSnapshot,
    ) -> Result<(), StorageError> {
        let preferences_json = serde_json::to_string(&snapshot.preferences)?;
        let matches_json = serde_json::to_string(&snapshot.matches)?;
        let conn = self.connection()?;
        conn.execute(
            "INSERT INTO doctor_recommendations
                (id, patient_code, postal_code, preferences_json, matches_json, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                snapshot.id,
                snapshot.patient_code.as_str(),
                snapshot.postal_code,
                preferences_json,
                matches_json,
                encode_timestamp(snapshot.created_at),
            ],
        )?;
        Ok(())
    }

    fn recommendations(
        &self,
        code: &PatientCode,
    ) -> Result<Vec<DoctorRecommendationSnapshot>, StorageError> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare(
            "SELECT id, postal_code, preferences_json, matches_json, created_at
             FROM doctor_recommendations WHERE patient_code = ?1
             ORDER BY created_at DESC, rowid DESC",
        )?;
        let rows = stmt.query_map(params![code.as_str()], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
            ))
        })?;

        let mut snapshots = Vec::new();
        for row in rows {
            let (id, postal_code, preferences_json, matches_json, created_at) = row?;
            snapshots.push(DoctorRecommendationSnapshot {
                id,
                patient_code: code.clone(),
                postal_code,
                preferences: serde_json::from_str(&preferences_json)?,
                matches: serde_json::from_str(&matches_json)?,
                created_at: decode_timestamp(&created_at)?,
            });
        }
        Ok(snapshots)
    }
}
