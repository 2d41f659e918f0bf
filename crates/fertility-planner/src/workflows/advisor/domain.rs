use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::workflows::intake::PatientCode;

/// Where a payload came from. The UI flow treats both as success.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdviceSource {
    Model,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub title: String,
    pub detail: String,
    #[serde(default)]
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationSet {
    pub summary: String,
    #[serde(default)]
    pub recommendations: Vec<Recommendation>,
    #[serde(default)]
    pub next_steps: Vec<String>,
}

/// One value read off a lab report. `value` keeps whatever JSON type the
/// model produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedField {
    pub name: String,
    pub value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_range: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportAnalysis {
    #[serde(default)]
    pub extracted_fields: Vec<ExtractedField>,
    #[serde(default)]
    pub insights: Vec<String>,
    #[serde(default)]
    pub follow_up_questions: Vec<String>,
}

/// Body of `POST /api/ai/recommendations`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecommendationRequest {
    pub patient_code: Option<String>,
}

/// Body of `POST /api/ai/analyze-text`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextAnalysisRequest {
    pub patient_code: Option<String>,
    pub text: Option<String>,
}

/// An uploaded report image.
#[derive(Debug, Clone)]
pub struct ReportImage {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Advice<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_code: Option<PatientCode>,
    pub source: AdviceSource,
    #[serde(flatten)]
    pub body: T,
}
