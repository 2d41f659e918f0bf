use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::domain::{IntakeRequest, IntakeSession, PatientCode, PatientRecord};
use super::repository::PatientRepository;
use crate::workflows::response::PlannerError;
use crate::workflows::timeline::{record_quietly, TimelineEvent, TimelineEventKind, TimelineRepository};

/// Multi-phase profile intake backed by an upserted patient row.
pub struct IntakeService<R> {
    repository: Arc<R>,
}

impl<R> IntakeService<R>
where
    R: PatientRepository + TimelineRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Apply one wizard phase. A missing code starts a new patient under a
    /// generated code; a supplied code must already exist.
    pub fn upsert(&self, request: IntakeRequest) -> Result<IntakeSession, PlannerError> {
        let IntakeRequest {
            patient_code,
            phase,
            profile,
        } = request;
        let phase = phase.ok_or(PlannerError::MissingFields(vec!["phase"]))?;

        let existing = match patient_code.as_deref().and_then(PatientCode::parse) {
            Some(code) => Some(
                self.repository
                    .fetch_patient(&code)?
                    .ok_or_else(|| PlannerError::not_found("patient", code.as_str()))?,
            ),
            None => None,
        };

        let now = Utc::now();
        let (record, newly_reached) = match existing {
            Some(mut record) => {
                let advanced = phase > record.current_phase;
                record.profile.merge(profile);
                record.current_phase = record.current_phase.max(phase);
                record.updated_at = now;
                (record, advanced)
            }
            None => {
                let record = PatientRecord {
                    patient_code: PatientCode::generate(),
                    current_phase: phase,
                    profile,
                    created_at: now,
                    updated_at: now,
                };
                (record, true)
            }
        };

        self.repository.upsert_patient(&record)?;
        info!(
            patient_code = %record.patient_code,
            phase = record.current_phase.number(),
            "intake phase saved"
        );

        if newly_reached {
            record_quietly(
                self.repository.as_ref(),
                TimelineEvent::new(
                    record.patient_code.clone(),
                    TimelineEventKind::PhaseCompleted,
                    format!("{} saved", phase.label()),
                    None,
                ),
            );
        }

        Ok(record.session())
    }

    pub fn session(&self, code: &PatientCode) -> Result<IntakeSession, PlannerError> {
        self.record(code).map(|record| record.session())
    }

    pub fn record(&self, code: &PatientCode) -> Result<PatientRecord, PlannerError> {
        self.repository
            .fetch_patient(code)?
            .ok_or_else(|| PlannerError::not_found("patient", code.as_str()))
    }
}
