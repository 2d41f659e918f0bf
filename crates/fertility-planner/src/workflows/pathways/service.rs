use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::domain::{PathwayPlan, TreatmentPathwayOption};
use super::repository::PathwayRepository;
use super::rules::score_pathways;
use crate::workflows::intake::{PatientCode, PatientProfile, PatientRepository};
use crate::workflows::response::PlannerError;
use crate::workflows::timeline::{
    record_quietly, TimelineEvent, TimelineEventKind, TimelineRepository,
};

/// Body of `POST /api/pathways/calculate`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CalculateRequest {
    pub patient_code: Option<String>,
    /// Merged over the stored profile for this calculation only.
    pub profile: Option<PatientProfile>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PathwayCalculation {
    pub patient_code: PatientCode,
    pub pathways: Vec<TreatmentPathwayOption>,
}

pub struct PathwayService<R> {
    repository: Arc<R>,
}

impl<R> PathwayService<R>
where
    R: PatientRepository + PathwayRepository + TimelineRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Score, replace the stored set, and note the event on the timeline.
    pub fn calculate(&self, request: CalculateRequest) -> Result<PathwayCalculation, PlannerError> {
        let code = request
            .patient_code
            .as_deref()
            .and_then(PatientCode::parse)
            .ok_or(PlannerError::MissingFields(vec!["patientCode"]))?;

        let record = self
            .repository
            .fetch_patient(&code)?
            .ok_or_else(|| PlannerError::not_found("patient", code.as_str()))?;

        let mut profile = record.profile;
        if let Some(overrides) = request.profile {
            profile.merge(overrides);
        }

        let pathways = score_pathways(&profile);
        self.repository
            .replace_pathways(&code, &pathways, Utc::now())?;

        let top = pathways.first().map(|option| option.name.clone());
        info!(
            patient_code = %code,
            options = pathways.len(),
            top = top.as_deref().unwrap_or("none"),
            "treatment pathways calculated"
        );

        record_quietly(
            self.repository.as_ref(),
            TimelineEvent::new(
                code.clone(),
                TimelineEventKind::PathwaysCalculated,
                "Treatment pathways calculated",
                top.map(|name| format!("Top option: {name}")),
            ),
        );

        Ok(PathwayCalculation {
            patient_code: code,
            pathways,
        })
    }

    pub fn latest(&self, code: &PatientCode) -> Result<PathwayPlan, PlannerError> {
        if self.repository.fetch_patient(code)?.is_none() {
            return Err(PlannerError::not_found("patient", code.as_str()));
        }
        self.repository
            .latest_plan(code)?
            .ok_or_else(|| PlannerError::not_found("pathway plan", code.as_str()))
    }
}
