use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::workflows::intake::PatientCode;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CareMode {
    #[default]
    Video,
    Phone,
    Chat,
}

impl CareMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            CareMode::Video => "video",
            CareMode::Phone => "phone",
            CareMode::Chat => "chat",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        [CareMode::Video, CareMode::Phone, CareMode::Chat]
            .into_iter()
            .find(|mode| mode.as_str() == raw)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SessionStatus {
    #[default]
    Scheduled,
    Completed,
    Cancelled,
}

impl SessionStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            SessionStatus::Scheduled => "scheduled",
            SessionStatus::Completed => "completed",
            SessionStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        [
            SessionStatus::Scheduled,
            SessionStatus::Completed,
            SessionStatus::Cancelled,
        ]
        .into_iter()
        .find(|status| status.as_str() == raw)
    }
}

/// A video, phone or chat appointment with a roster doctor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteCareSession {
    pub id: String,
    pub patient_code: PatientCode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doctor_id: Option<String>,
    pub mode: CareMode,
    pub status: SessionStatus,
    pub scheduled_for: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Body of `POST /api/care/:patient_code/sessions`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionRequest {
    pub doctor_id: Option<String>,
    pub mode: Option<CareMode>,
    pub status: Option<SessionStatus>,
    pub scheduled_for: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

/// A dated entry on the patient's own plan, optionally tied to a journey step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalizedTimelineItem {
    pub id: String,
    pub patient_code: PatientCode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step_key: Option<String>,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub target_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Body of `POST /api/care/:patient_code/timeline`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TimelineItemRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub target_date: Option<NaiveDate>,
    pub step_key: Option<String>,
}

/// Body of `POST /api/care/:patient_code/timeline/plan`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlanRequest {
    /// Defaults to today.
    pub start_date: Option<NaiveDate>,
}

/// One numbered entry of the patient's story board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryChapter {
    pub id: String,
    pub patient_code: PatientCode,
    pub chapter: u32,
    pub title: String,
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mood: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Body of `POST /api/care/:patient_code/story`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChapterRequest {
    pub title: Option<String>,
    pub body: Option<String>,
    pub mood: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CareSessions {
    pub patient_code: PatientCode,
    pub sessions: Vec<RemoteCareSession>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalizedTimeline {
    pub patient_code: PatientCode,
    pub items: Vec<PersonalizedTimelineItem>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryBoard {
    pub patient_code: PatientCode,
    pub chapters: Vec<StoryChapter>,
}
