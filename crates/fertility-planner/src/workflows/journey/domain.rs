use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::workflows::intake::PatientCode;

/// One step of the standard treatment journey.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepTemplate {
    pub key: &'static str,
    pub label: &'static str,
    pub typical_days: u16,
    pub guidance: Vec<&'static str>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MilestoneStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

impl MilestoneStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            MilestoneStatus::Pending => "pending",
            MilestoneStatus::InProgress => "inProgress",
            MilestoneStatus::Completed => "completed",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        [
            MilestoneStatus::Pending,
            MilestoneStatus::InProgress,
            MilestoneStatus::Completed,
        ]
        .into_iter()
        .find(|status| status.as_str() == raw)
    }
}

/// Patient-entered measurement such as a cycle day, AMH level or dose.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualDataEntry {
    pub id: String,
    pub patient_code: PatientCode,
    pub category: String,
    pub label: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    pub recorded_on: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Body of `POST /api/journey/:patient_code/entries`.
///
/// `value` accepts a string or a number; numbers are stored as text.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EntryRequest {
    pub category: Option<String>,
    pub label: Option<String>,
    pub value: Option<serde_json::Value>,
    pub unit: Option<String>,
    pub recorded_on: Option<NaiveDate>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JourneyMilestone {
    pub patient_code: PatientCode,
    pub step_key: String,
    pub status: MilestoneStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Body of `PUT /api/journey/:patient_code/milestones/:step_key`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MilestoneUpdate {
    pub status: Option<MilestoneStatus>,
    pub notes: Option<String>,
}

/// A blueprint step merged with the patient's stored status.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MilestoneView {
    pub step_key: &'static str,
    pub label: &'static str,
    pub typical_days: u16,
    pub guidance: Vec<&'static str>,
    pub status: MilestoneStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JourneyProgress {
    pub patient_code: PatientCode,
    pub milestones: Vec<MilestoneView>,
    pub completed: usize,
    pub total: usize,
    pub progress_percent: u8,
}

impl JourneyProgress {
    pub fn new(patient_code: PatientCode, milestones: Vec<MilestoneView>) -> Self {
        let total = milestones.len();
        let completed = milestones
            .iter()
            .filter(|milestone| milestone.status == MilestoneStatus::Completed)
            .count();
        let progress_percent = if total == 0 {
            0
        } else {
            (completed * 100 / total) as u8
        };
        Self {
            patient_code,
            milestones,
            completed,
            total,
            progress_percent,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntries {
    pub patient_code: PatientCode,
    pub entries: Vec<ManualDataEntry>,
}
