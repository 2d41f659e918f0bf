use chrono::NaiveDate;
use rusqlite::params;

use super::{decode_timestamp, encode_timestamp, SqliteStore, StorageError};
use crate::workflows::care::{
    CareMode, CareRepository, PersonalizedTimelineItem, RemoteCareSession, SessionStatus,
    StoryChapter,
};
use crate::workflows::intake::PatientCode;

const DATE_FORMAT: &str = "%Y-%m-%d";

impl CareRepository for SqliteStore {
    fn insert_session(&self, session: &RemoteCareSession) -> Result<(), StorageError> {
        let conn = self.connection()?;
        conn.execute(
            "INSERT INTO remote_care_sessions
                (id, patient_code, doctor_id, mode, status, scheduled_for, notes, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                session.id,
                session.patient_code.as_str(),
                session.doctor_id,
                session.mode.as_str(),
                session.status.as_str(),
                encode_timestamp(session.scheduled_for),
                session.notes,
                encode_timestamp(session.created_at),
            ],
        )?;
        Ok(())
    }

    fn sessions(&self, code: &PatientCode) -> Result<Vec<RemoteCareSession>, StorageError> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare(
            "SELECT id, doctor_id, mode, status, scheduled_for, notes, created_at
             FROM remote_care_sessions WHERE patient_code = ?1
             ORDER BY scheduled_for ASC, rowid ASC",
        )?;
        let rows = stmt.query_map(params![code.as_str()], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, Option<String>>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, Option<String>>(5)?,
                row.get::<_, String>(6)?,
            ))
        })?;

        let mut sessions = Vec::new();
        for row in rows {
            let (id, doctor_id, mode, status, scheduled_for, notes, created_at) = row?;
            let (Some(mode), Some(status)) = (CareMode::parse(&mode), SessionStatus::parse(&status)) else {
                tracing::warn!(%id, %mode, %status, "skipping care session with unknown mode or status");
                continue;
            };
            sessions.push(RemoteCareSession {
                id,
                patient_code: code.clone(),
                doctor_id,
                mode,
                status,
                scheduled_for: decode_timestamp(&scheduled_for)?,
                notes,
                created_at: decode_timestamp(&created_at)?,
            });
        }
        Ok(sessions)
    }

    fn insert_timeline_item(&self, item: &PersonalizedTimelineItem) -> Result<(), StorageError> {
        let conn = self.connection()?;
        conn.execute(
            "INSERT INTO personalized_timeline_items
                (id, patient_code, step_key, title, description, target_date, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                item.id,
                item.patient_code.as_str(),
                item.step_key,
                item.title,
                item.description,
                item.target_date.format(DATE_FORMAT).to_string(),
                encode_timestamp(item.created_at),
            ],
        )?;
        Ok(())
    }

    fn timeline_items(&self, code: &PatientCode) -> Result<Vec<PersonalizedTimelineItem>, StorageError> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare(
            "SELECT id, step_key, title, description, target_date, created_at
             FROM personalized_timeline_items WHERE patient_code = ?1
             ORDER BY target_date ASC, created_at ASC, rowid ASC",
        )?;
        let rows = stmt.query_map(params![code.as_str()], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, Option<String>>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, Option<String>>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, String>(5)?,
            ))
        })?;

        let mut items = Vec::new();
        for row in rows {
            let (id, step_key, title, description, target_date, created_at) = row?;
            let target_date = NaiveDate::parse_from_str(&target_date, DATE_FORMAT)
                .map_err(|_| StorageError::Timestamp(target_date.clone()))?;
            items.push(PersonalizedTimelineItem {
                id,
                patient_code: code.clone(),
                step_key,
                title,
                description,
                target_date,
                created_at: decode_timestamp(&created_at)?,
            });
        }
        Ok(items)
    }

    fn append_chapter(&self, chapter: &StoryChapter) -> Result<u32, StorageError> {
        let conn = self.connection()?;
        // Read and insert under one lock.
        let last: Option<u32> = conn.query_row(
            "SELECT MAX(chapter) FROM story_chapters WHERE patient_code = ?1",
            params![chapter.patient_code.as_str()],
            |row| row.get(0),
        )?;
        let number = last.unwrap_or(0) + 1;
        conn.execute(
            "INSERT INTO story_chapters (id, patient_code, chapter, title, body, mood, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                chapter.id,
                chapter.patient_code.as_str(),
                number,
                chapter.title,
                chapter.body,
                chapter.mood,
                encode_timestamp(chapter.created_at),
            ],
        )?;
        Ok(number)
    }

    fn chapters(&self, code: &PatientCode) -> Result<Vec<StoryChapter>, StorageError> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare(
            "SELECT id, chapter, title, body, mood, created_at
             FROM story_chapters WHERE patient_code = ?1
             ORDER BY chapter ASC",
        )?;
        let rows = stmt.query_map(params![code.as_str()], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, u32>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, Option<String>>(4)?,
                row.get::<_, String>(5)?,
            ))
        })?;

        let mut chapters = Vec::new();
        for row in rows {
            let (id, number, title, body, mood, created_at) = row?;
            chapters.push(StoryChapter {
                id,
                patient_code: code.clone(),
                chapter: number,
                title,
                body,
                mood,
                created_at: decode_timestamp(&created_at)?,
            });
        }
        Ok(chapters)
    }
}
