use chrono::{DateTime, Utc};
use rusqlite::params;

use super::{decode_timestamp, encode_timestamp, SqliteStore, StorageError};
use crate::workflows::intake::PatientCode;
use crate::workflows::pathways::{PathwayPlan, PathwayRepository, TreatmentPathwayOption};

impl PathwayRepository for SqliteStore {
    fn replace_pathways(
        &self,
        code: &PatientCode,
        pathways: &[TreatmentPathwayOption],
        calculated_at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        let encoded = pathways
            .iter()
            .map(serde_json::to_string)
            .collect::<Result<Vec<_>, _>>()?;
        let calculated_at = encode_timestamp(calculated_at);

        let mut conn = self.connection()?;
        let tx = conn.transaction()?;
        tx.execute(
            "DELETE FROM treatment_pathways WHERE patient_code = ?1",
            params![code.as_str()],
        )?;
        for (rank, (option, option_json)) in pathways.iter().zip(encoded).enumerate() {
            tx.execute(
                "INSERT INTO treatment_pathways
                    (patient_code, pathway_key, rank, priority, suitability, success_rate, option_json, calculated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    code.as_str(),
                    option.key.as_str(),
                    rank as i64,
                    option.priority,
                    option.suitability,
                    option.success_rate,
                    option_json,
                    calculated_at,
                ],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    fn latest_plan(&self, code: &PatientCode) -> Result<Option<PathwayPlan>, StorageError> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare(
            "SELECT option_json, calculated_at FROM treatment_pathways
             WHERE patient_code = ?1 ORDER BY rank ASC",
        )?;
        let rows = stmt.query_map(params![code.as_str()], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut calculated_at = None;
        let mut pathways = Vec::new();
        for row in rows {
            let (option_json, stamp) = row?;
            if calculated_at.is_none() {
                calculated_at = Some(decode_timestamp(&stamp)?);
            }
            pathways.push(serde_json::from_str(&option_json)?);
        }

        Ok(calculated_at.map(|calculated_at| PathwayPlan {
            calculated_at,
            pathways,
        }))
    }
}
