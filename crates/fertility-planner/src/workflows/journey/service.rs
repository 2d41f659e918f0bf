use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use super::blueprint::JourneyBlueprint;
use super::domain::{
    EntryRequest, JournalEntries, JourneyMilestone, JourneyProgress, ManualDataEntry,
    MilestoneStatus, MilestoneUpdate, MilestoneView,
};
use super::repository::JourneyRepository;
use crate::workflows::intake::{PatientCode, PatientRepository};
use crate::workflows::response::PlannerError;
use crate::workflows::timeline::{
    record_quietly, TimelineEvent, TimelineEventKind, TimelineRepository,
};

/// Manual journal entries and milestone tracking over the standard journey.
pub struct JourneyService<R> {
    repository: Arc<R>,
    blueprint: JourneyBlueprint,
}

impl<R> JourneyService<R>
where
    R: PatientRepository + JourneyRepository + TimelineRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self {
            repository,
            blueprint: JourneyBlueprint::standard(),
        }
    }

    pub fn record_entry(
        &self,
        code: &PatientCode,
        request: EntryRequest,
    ) -> Result<ManualDataEntry, PlannerError> {
        let category = non_blank(request.category);
        let label = non_blank(request.label);
        let value = request.value.as_ref().and_then(entry_value);

        let mut missing = Vec::new();
        if category.is_none() {
            missing.push("category");
        }
        if label.is_none() {
            missing.push("label");
        }
        if value.is_none() {
            missing.push("value");
        }
        let (Some(category), Some(label), Some(value)) = (category, label, value) else {
            return Err(PlannerError::MissingFields(missing));
        };

        self.require_patient(code)?;

        let now = Utc::now();
        let entry = ManualDataEntry {
            id: Uuid::new_v4().to_string(),
            patient_code: code.clone(),
            category,
            label,
            value,
            unit: non_blank(request.unit),
            recorded_on: request.recorded_on.unwrap_or_else(|| now.date_naive()),
            notes: non_blank(request.notes),
            created_at: now,
        };
        self.repository.insert_entry(&entry)?;
        info!(patient_code = %code, category = %entry.category, "journal entry recorded");

        record_quietly(
            self.repository.as_ref(),
            TimelineEvent::new(
                code.clone(),
                TimelineEventKind::DataRecorded,
                format!("Logged {}", entry.label),
                Some(match &entry.unit {
                    Some(unit) => format!("{} {unit}", entry.value),
                    None => entry.value.clone(),
                }),
            ),
        );

        Ok(entry)
    }

    pub fn entries(&self, code: &PatientCode) -> Result<JournalEntries, PlannerError> {
        self.require_patient(code)?;
        Ok(JournalEntries {
            patient_code: code.clone(),
            entries: self.repository.entries(code)?,
        })
    }

    /// Set a step's status. Moving a step into `completed` adds a timeline event.
    pub fn update_milestone(
        &self,
        code: &PatientCode,
        step_key: &str,
        update: MilestoneUpdate,
    ) -> Result<JourneyProgress, PlannerError> {
        let step = self
            .blueprint
            .step(step_key)
            .ok_or_else(|| PlannerError::InvalidInput(format!("unknown journey step '{step_key}'")))?;
        let status = update
            .status
            .ok_or(PlannerError::MissingFields(vec!["status"]))?;
        self.require_patient(code)?;

        let previous = self
            .repository
            .milestones(code)?
            .into_iter()
            .find(|milestone| milestone.step_key == step.key)
            .map(|milestone| milestone.status)
            .unwrap_or_default();

        self.repository.upsert_milestone(&JourneyMilestone {
            patient_code: code.clone(),
            step_key: step.key.to_string(),
            status,
            notes: non_blank(update.notes),
            updated_at: Utc::now(),
        })?;
        info!(patient_code = %code, step = step.key, status = status.as_str(), "milestone updated");

        if status == MilestoneStatus::Completed && previous != MilestoneStatus::Completed {
            record_quietly(
                self.repository.as_ref(),
                TimelineEvent::new(
                    code.clone(),
                    TimelineEventKind::MilestoneCompleted,
                    format!("{} completed", step.label),
                    None,
                ),
            );
        }

        self.milestones(code)
    }

    pub fn milestones(&self, code: &PatientCode) -> Result<JourneyProgress, PlannerError> {
        self.require_patient(code)?;
        let stored = self.repository.milestones(code)?;

        let views = self
            .blueprint
            .steps()
            .iter()
            .map(|step| {
                let saved = stored.iter().find(|milestone| milestone.step_key == step.key);
                MilestoneView {
                    step_key: step.key,
                    label: step.label,
                    typical_days: step.typical_days,
                    guidance: step.guidance.clone(),
                    status: saved.map(|m| m.status).unwrap_or_default(),
                    notes: saved.and_then(|m| m.notes.clone()),
                    updated_at: saved.map(|m| m.updated_at),
                }
            })
            .collect();

        Ok(JourneyProgress::new(code.clone(), views))
    }

    fn require_patient(&self, code: &PatientCode) -> Result<(), PlannerError> {
        match self.repository.fetch_patient(code)? {
            Some(_) => Ok(()),
            None => Err(PlannerError::not_found("patient", code.as_str())),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn entry_value(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => non_blank(Some(text.clone())),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}
