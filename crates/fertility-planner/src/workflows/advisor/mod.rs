//! AI proxy: prompt templates, a chat-completion client, output cleanup and
//! fixed fallbacks so the patient-facing flow never hard-fails.

pub mod cleanup;
pub mod client;
pub mod domain;
pub mod fallback;
pub mod prompts;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use cleanup::{clean_model_json, parse_model_json, ModelJsonError};
pub use client::{
    AiClientError, ChatCompletionClient, ChatMessage, ChatRequest, ChatRole, ContentPart,
    HttpChatClient, ImageUrl, MessageContent,
};
pub use domain::{
    Advice, AdviceSource, ExtractedField, Recommendation, RecommendationRequest,
    RecommendationSet, ReportAnalysis, ReportImage, TextAnalysisRequest,
};
pub use router::advisor_router;
pub use service::AdvisorService;
