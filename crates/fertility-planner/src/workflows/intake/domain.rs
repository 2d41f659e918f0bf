use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::workflows::doctors::DoctorPreferences;

/// Opaque external key for every patient-scoped record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatientCode(pub String);

impl PatientCode {
    /// `FP-` followed by eight upper-case hex characters.
    pub fn generate() -> Self {
        let raw = Uuid::new_v4().simple().to_string();
        Self(format!("FP-{}", raw[..8].to_ascii_uppercase()))
    }

    /// Trimmed code, or `None` for blank input.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PatientCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Everything the intake wizard collects. Every field is optional and an
/// absent field contributes nothing to scoring.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PatientProfile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age_range: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cycle_regularity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conditions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_trying: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_treatments: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emotional_state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub financial_comfort: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doctor_preferences: Option<DoctorPreferences>,
}

impl PatientProfile {
    /// Overwrite every field the patch carries; leave the rest untouched.
    pub fn merge(&mut self, patch: PatientProfile) {
        let PatientProfile {
            age_range,
            cycle_regularity,
            conditions,
            time_trying,
            previous_treatments,
            emotional_state,
            financial_comfort,
            postal_code,
            city,
            doctor_preferences,
        } = patch;

        merge_field(&mut self.age_range, age_range);
        merge_field(&mut self.cycle_regularity, cycle_regularity);
        merge_field(&mut self.conditions, conditions);
        merge_field(&mut self.time_trying, time_trying);
        merge_field(&mut self.previous_treatments, previous_treatments);
        merge_field(&mut self.emotional_state, emotional_state);
        merge_field(&mut self.financial_comfort, financial_comfort);
        merge_field(&mut self.postal_code, postal_code);
        merge_field(&mut self.city, city);
        merge_field(&mut self.doctor_preferences, doctor_preferences);
    }

    /// Case and separator insensitive membership test (`blocked_tubes`
    /// matches `blockedTubes`).
    pub fn has_condition(&self, tag: &str) -> bool {
        let wanted = normalize_tag(tag);
        self.conditions
            .as_deref()
            .unwrap_or_default()
            .iter()
            .any(|condition| normalize_tag(condition) == wanted)
    }

    /// Exact match on the wizard's `"ivf"` option value.
    pub fn had_previous_ivf(&self) -> bool {
        self.previous_treatments.as_deref() == Some("ivf")
    }

    /// Exact match on the wizard's `"low"` option value.
    pub fn has_low_financial_comfort(&self) -> bool {
        self.financial_comfort.as_deref() == Some("low")
    }
}

fn merge_field<T>(slot: &mut Option<T>, incoming: Option<T>) {
    if incoming.is_some() {
        *slot = incoming;
    }
}

fn normalize_tag(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Ordered phases of the intake wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IntakePhase {
    Basics,
    MedicalHistory,
    Holistic,
    Preferences,
    Complete,
}

impl IntakePhase {
    pub const fn number(self) -> u8 {
        match self {
            IntakePhase::Basics => 1,
            IntakePhase::MedicalHistory => 2,
            IntakePhase::Holistic => 3,
            IntakePhase::Preferences => 4,
            IntakePhase::Complete => 5,
        }
    }

    pub fn from_number(value: u8) -> Option<Self> {
        match value {
            1 => Some(IntakePhase::Basics),
            2 => Some(IntakePhase::MedicalHistory),
            3 => Some(IntakePhase::Holistic),
            4 => Some(IntakePhase::Preferences),
            5 => Some(IntakePhase::Complete),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            IntakePhase::Basics => "Basics",
            IntakePhase::MedicalHistory => "Medical history",
            IntakePhase::Holistic => "Holistic wellbeing",
            IntakePhase::Preferences => "Care preferences",
            IntakePhase::Complete => "Complete",
        }
    }

    pub fn next(self) -> Option<Self> {
        Self::from_number(self.number() + 1)
    }
}

/// Stored patient row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientRecord {
    pub patient_code: PatientCode,
    pub current_phase: IntakePhase,
    pub profile: PatientProfile,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PatientRecord {
    pub fn session(&self) -> IntakeSession {
        IntakeSession {
            patient_code: self.patient_code.clone(),
            current_phase: self.current_phase,
            current_phase_label: self.current_phase.label(),
            next_phase: self.current_phase.next(),
            profile: self.profile.clone(),
        }
    }
}

/// Serializable wizard state handed back to the client after every phase.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntakeSession {
    pub patient_code: PatientCode,
    pub current_phase: IntakePhase,
    pub current_phase_label: &'static str,
    pub next_phase: Option<IntakePhase>,
    pub profile: PatientProfile,
}

impl IntakeSession {
    /// Pathway scoring needs at least the medical-history phase.
    pub fn ready_for_pathways(&self) -> bool {
        self.current_phase >= IntakePhase::MedicalHistory
    }
}

/// Body of `POST /api/patients`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IntakeRequest {
    pub patient_code: Option<String>,
    pub phase: Option<IntakePhase>,
    pub profile: PatientProfile,
}
