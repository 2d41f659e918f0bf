use rusqlite::params;

use super::{decode_timestamp, encode_timestamp, SqliteStore, StorageError};
use crate::workflows::intake::PatientCode;
use crate::workflows::timeline::{TimelineEvent, TimelineEventKind, TimelineRepository};

impl TimelineRepository for SqliteStore {
    fn append_event(&self, event: &TimelineEvent) -> Result<(), StorageError> {
        let conn = self.connection()?;
        conn.execute(
            "INSERT INTO timeline_events (id, patient_code, kind, title, detail, occurred_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                event.id,
                event.patient_code.as_str(),
                event.kind.as_str(),
                event.title,
                event.detail,
                encode_timestamp(event.occurred_at),
            ],
        )?;
        Ok(())
    }

    fn events(&self, code: &PatientCode) -> Result<Vec<TimelineEvent>, StorageError> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare(
            "SELECT id, kind, title, detail, occurred_at
             FROM timeline_events WHERE patient_code = ?1
             ORDER BY occurred_at DESC, rowid DESC",
        )?;

        let rows = stmt.query_map(params![code.as_str()], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, Option<String>>(3)?,
                row.get::<_, String>(4)?,
            ))
        })?;

        let mut events = Vec::new();
        for row in rows {
            let (id, kind, title, detail, occurred_at) = row?;
            let Some(kind) = TimelineEventKind::parse(&kind) else {
                tracing::warn!(%id, %kind, "skipping timeline event with unknown kind");
                continue;
            };
            events.push(TimelineEvent {
                id,
                patient_code: code.clone(),
                kind,
                title,
                detail,
                occurred_at: decode_timestamp(&occurred_at)?,
            });
        }
        Ok(events)
    }
}
