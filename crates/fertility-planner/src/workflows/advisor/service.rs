use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::de::DeserializeOwned;
use tracing::{info, warn};

use super::cleanup::parse_model_json;
use super::client::{ChatCompletionClient, ChatRequest};
use super::domain::{
    Advice, AdviceSource, RecommendationRequest, RecommendationSet, ReportAnalysis, ReportImage,
    TextAnalysisRequest,
};
use super::{fallback, prompts};
use crate::workflows::intake::{PatientCode, PatientRepository};
use crate::workflows::pathways::PathwayRepository;
use crate::workflows::response::PlannerError;
use crate::workflows::timeline::{
    record_quietly, TimelineEvent, TimelineEventKind, TimelineRepository,
};

pub const MAX_REPORT_CHARS: usize = 20_000;
pub const MAX_IMAGE_BYTES: usize = 8 * 1024 * 1024;

/// Prompts the model on the patient's behalf and substitutes a fixed payload
/// whenever the answer cannot be used.
pub struct AdvisorService<R, C> {
    repository: Arc<R>,
    client: Arc<C>,
}

impl<R, C> AdvisorService<R, C>
where
    R: PatientRepository + PathwayRepository + TimelineRepository + 'static,
    C: ChatCompletionClient + 'static,
{
    pub fn new(repository: Arc<R>, client: Arc<C>) -> Self {
        Self { repository, client }
    }

    pub async fn recommendations(
        &self,
        request: RecommendationRequest,
    ) -> Result<Advice<RecommendationSet>, PlannerError> {
        let code = request
            .patient_code
            .as_deref()
            .and_then(PatientCode::parse)
            .ok_or(PlannerError::MissingFields(vec!["patientCode"]))?;
        let record = self
            .repository
            .fetch_patient(&code)?
            .ok_or_else(|| PlannerError::not_found("patient", code.as_str()))?;
        let pathways = self
            .repository
            .latest_plan(&code)?
            .map(|plan| plan.pathways)
            .unwrap_or_default();

        let prompt = prompts::recommendations(&record.profile, &pathways);
        let (body, source) = self
            .ask(&prompt, "recommendations", fallback::recommendations)
            .await;

        record_quietly(
            self.repository.as_ref(),
            TimelineEvent::new(
                code.clone(),
                TimelineEventKind::RecommendationsGenerated,
                "Personalised recommendations generated",
                None,
            ),
        );

        Ok(Advice {
            patient_code: Some(code),
            source,
            body,
        })
    }

    pub async fn analyze_text(
        &self,
        request: TextAnalysisRequest,
    ) -> Result<Advice<ReportAnalysis>, PlannerError> {
        let text = request
            .text
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .ok_or(PlannerError::MissingFields(vec!["text"]))?;
        if text.chars().count() > MAX_REPORT_CHARS {
            return Err(PlannerError::InvalidInput(format!(
                "report text exceeds {MAX_REPORT_CHARS} characters"
            )));
        }
        let code = self.optional_patient(request.patient_code.as_deref())?;

        let (body, source) = self
            .ask(
                &prompts::text_analysis(text),
                "text analysis",
                fallback::report_analysis,
            )
            .await;
        self.note_report(code.as_ref(), "Report text analysed");

        Ok(Advice {
            patient_code: code,
            source,
            body,
        })
    }

    /// Image analysis is the one flow that reports an unconfigured provider
    /// instead of answering with the fallback.
    pub async fn analyze_image(
        &self,
        patient_code: Option<&str>,
        image: Option<ReportImage>,
    ) -> Result<Advice<ReportAnalysis>, PlannerError> {
        let image = image
            .filter(|image| !image.bytes.is_empty())
            .ok_or(PlannerError::MissingFields(vec!["file"]))?;
        let content_type: mime::Mime = image.content_type.parse().map_err(|_| {
            PlannerError::InvalidInput(format!("unrecognised content type '{}'", image.content_type))
        })?;
        if content_type.type_() != mime::IMAGE {
            return Err(PlannerError::InvalidInput(
                "uploaded report must be an image".to_string(),
            ));
        }
        if image.bytes.len() > MAX_IMAGE_BYTES {
            return Err(PlannerError::InvalidInput(format!(
                "uploaded report exceeds {MAX_IMAGE_BYTES} bytes"
            )));
        }
        let code = self.optional_patient(patient_code)?;

        if !self.client.is_enabled() {
            return Err(PlannerError::AiUnavailable(
                "image analysis needs a configured AI provider".to_string(),
            ));
        }

        let data_url = format!(
            "data:{};base64,{}",
            content_type.essence_str(),
            STANDARD.encode(&image.bytes)
        );
        let (body, source) = self
            .ask(
                &prompts::image_analysis(data_url),
                "image analysis",
                fallback::report_analysis,
            )
            .await;
        self.note_report(code.as_ref(), "Report image analysed");

        Ok(Advice {
            patient_code: code,
            source,
            body,
        })
    }

    async fn ask<T>(
        &self,
        request: &ChatRequest,
        purpose: &'static str,
        fallback: fn() -> T,
    ) -> (T, AdviceSource)
    where
        T: DeserializeOwned,
    {
        if !self.client.is_enabled() {
            info!(purpose, "AI client disabled, serving fallback");
            return (fallback(), AdviceSource::Fallback);
        }

        match self.client.complete(request).await {
            Ok(raw) => match parse_model_json::<T>(&raw) {
                Ok(body) => (body, AdviceSource::Model),
                Err(err) => {
                    warn!(purpose, error = %err, "model output unusable, serving fallback");
                    (fallback(), AdviceSource::Fallback)
                }
            },
            Err(err) => {
                warn!(purpose, error = %err, "AI request failed, serving fallback");
                (fallback(), AdviceSource::Fallback)
            }
        }
    }

    /// A supplied code must belong to a known patient; no code is fine.
    fn optional_patient(&self, raw: Option<&str>) -> Result<Option<PatientCode>, PlannerError> {
        let Some(code) = raw.and_then(PatientCode::parse) else {
            return Ok(None);
        };
        match self.repository.fetch_patient(&code)? {
            Some(_) => Ok(Some(code)),
            None => Err(PlannerError::not_found("patient", code.as_str())),
        }
    }

    fn note_report(&self, code: Option<&PatientCode>, title: &'static str) {
        if let Some(code) = code {
            record_quietly(
                self.repository.as_ref(),
                TimelineEvent::new(code.clone(), TimelineEventKind::ReportAnalyzed, title, None),
            );
        }
    }
}
