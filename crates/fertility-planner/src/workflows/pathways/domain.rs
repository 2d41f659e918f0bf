use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Treatment modalities in the fixed catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PathwayKey {
    Iui,
    Fet,
    IvfIcsi,
    IvfPgtA,
}

impl PathwayKey {
    pub const fn as_str(self) -> &'static str {
        match self {
            PathwayKey::Iui => "iui",
            PathwayKey::Fet => "fet",
            PathwayKey::IvfIcsi => "ivfIcsi",
            PathwayKey::IvfPgtA => "ivfPgtA",
        }
    }
}

/// Which of the two scores an adjustment moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScoreMetric {
    SuccessRate,
    Suitability,
}

/// One applied delta, kept so the UI can explain a score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreAdjustment {
    pub metric: ScoreMetric,
    pub factor: String,
    pub delta: i16,
    pub note: String,
}

/// A ranked treatment option for one patient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreatmentPathwayOption {
    pub key: PathwayKey,
    pub name: String,
    pub success_rate: u8,
    pub timeline: String,
    pub cost_min: u32,
    pub cost_max: u32,
    pub suitability: u8,
    pub pros: Vec<String>,
    pub cons: Vec<String>,
    pub priority: u8,
    pub recommendation: String,
    pub adjustments: Vec<ScoreAdjustment>,
}

/// The latest stored calculation for a patient.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PathwayPlan {
    pub calculated_at: DateTime<Utc>,
    pub pathways: Vec<TreatmentPathwayOption>,
}

/// Step function from suitability to sort tier.
pub const fn priority_tier(suitability: u8) -> u8 {
    if suitability >= 80 {
        1
    } else if suitability >= 60 {
        2
    } else if suitability >= 40 {
        3
    } else {
        4
    }
}

pub const fn recommendation_for(priority: u8) -> &'static str {
    match priority {
        1 => "Highly recommended for your profile",
        2 => "Recommended; discuss with your specialist",
        3 => "Possible option with some limitations",
        _ => "Less suitable at this time",
    }
}
