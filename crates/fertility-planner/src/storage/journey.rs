use chrono::NaiveDate;
use rusqlite::params;

use super::{decode_timestamp, encode_timestamp, SqliteStore, StorageError};
use crate::workflows::intake::PatientCode;
use crate::workflows::journey::{JourneyMilestone, JourneyRepository, ManualDataEntry, MilestoneStatus};

const DATE_FORMAT: &str = "%Y-%m-%d";

impl JourneyRepository for SqliteStore {
    fn insert_entry(&self, entry: &ManualDataEntry) -> Result<(), StorageError> {
        let conn = self.connection()?;
        conn.execute(
            "INSERT INTO manual_data_entries
                (id, patient_code, category, label, value, unit, recorded_on, notes, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                entry.id,
                entry.patient_code.as_str(),
                entry.category,
                entry.label,
                entry.value,
                entry.unit,
                entry.recorded_on.format(DATE_FORMAT).to_string(),
                entry.notes,
                encode_timestamp(entry.created_at),
            ],
        )?;
        Ok(())
    }

    fn entries(&self, code: &PatientCode) -> Result<Vec<ManualDataEntry>, StorageError> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare(
            "SELECT id, category, label, value, unit, recorded_on, notes, created_at
             FROM manual_data_entries WHERE patient_code = ?1
             ORDER BY recorded_on DESC, created_at DESC, rowid DESC",
        )?;
        let rows = stmt.query_map(params![code.as_str()], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, Option<String>>(4)?,
                row.get::<_, String>(5)?,
                row.get::<_, Option<String>>(6)?,
                row.get::<_, String>(7)?,
            ))
        })?;

        let mut entries = Vec::new();
        for row in rows {
            let (id, category, label, value, unit, recorded_on, notes, created_at) = row?;
            let recorded_on = NaiveDate::parse_from_str(&recorded_on, DATE_FORMAT)
                .map_err(|_| StorageError::Timestamp(recorded_on.clone()))?;
            entries.push(ManualDataEntry {
                id,
                patient_code: code.clone(),
                category,
                label,
                value,
                unit,
                recorded_on,
                notes,
                created_at: decode_timestamp(&created_at)?,
            });
        }
        Ok(entries)
    }

    fn upsert_milestone(&self, milestone: &JourneyMilestone) -> Result<(), StorageError> {
        let conn = self.connection()?;
        conn.execute(
            "INSERT INTO journey_milestones (patient_code, step_key, status, notes, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(patient_code, step_key) DO UPDATE SET
                status = excluded.status,
                notes = excluded.notes,
                updated_at = excluded.updated_at",
            params![
                milestone.patient_code.as_str(),
                milestone.step_key,
                milestone.status.as_str(),
                milestone.notes,
                encode_timestamp(milestone.updated_at),
            ],
        )?;
        Ok(())
    }

    fn milestones(&self, code: &PatientCode) -> Result<Vec<JourneyMilestone>, StorageError> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare(
            "SELECT step_key, status, notes, updated_at
             FROM journey_milestones WHERE patient_code = ?1",
        )?;
        let rows = stmt.query_map(params![code.as_str()], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, Option<String>>(2)?,
                row.get::<_, String>(3)?,
            ))
        })?;

        let mut milestones = Vec::new();
        for row in rows {
            let (step_key, status, notes, updated_at) = row?;
            let Some(status) = MilestoneStatus::parse(&status) else {
                tracing::warn!(%step_key, %status, "skipping milestone with unknown status");
                continue;
            };
            milestones.push(JourneyMilestone {
                patient_code: code.clone(),
                step_key,
                status,
                notes,
                updated_at: decode_timestamp(&updated_at)?,
            });
        }
        Ok(milestones)
    }
}
