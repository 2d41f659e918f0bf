use rusqlite::params;

use super::{decode_timestamp, encode_timestamp, SqliteStore, StorageError};
use crate::workflows::doctors::{ProviderReview, ReviewRepository};
use crate::workflows::intake::PatientCode;

impl ReviewRepository for SqliteStore {
    fn insert_review(&self, review: &ProviderReview) -> Result<(), StorageError> {
        let conn = self.connection()?;
        conn.execute(
            "INSERT INTO provider_reviews (id, doctor_id, patient_code, rating, comment, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                review.id,
                review.doctor_id,
                review.patient_code.as_str(),
                review.rating,
                review.comment,
                encode_timestamp(review.created_at),
            ],
        )?;
        Ok(())
    }

    fn reviews_for(&self, doctor_id: &str) -> Result<Vec<ProviderReview>, StorageError> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare(
            "SELECT id, patient_code, rating, comment, created_at
             FROM provider_reviews WHERE doctor_id = ?1
             ORDER BY created_at DESC, rowid DESC",
        )?;
        let rows = stmt.query_map(params![doctor_id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, u8>(2)?,
                row.get::<_, Option<String>>(3)?,
                row.get::<_, String>(4)?,
            ))
        })?;

        let mut reviews = Vec::new();
        for row in rows {
            let (id, patient_code, rating, comment, created_at) = row?;
            reviews.push(ProviderReview {
                id,
                doctor_id: doctor_id.to_string(),
                patient_code: PatientCode(patient_code),
                rating,
                comment,
                created_at: decode_timestamp(&created_at)?,
            });
        }
        Ok(reviews)
    }
}
