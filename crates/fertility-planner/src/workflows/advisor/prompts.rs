use super::client::{ChatMessage, ChatRequest, ContentPart, ImageUrl};
use crate::workflows::intake::PatientProfile;
use crate::workflows::pathways::TreatmentPathwayOption;

const TEMPERATURE: f32 = 0.3;

const SYSTEM: &str = "You are a supportive fertility care assistant. You explain options in \
plain language, never diagnose, and always encourage patients to confirm decisions with their \
clinician. Reply with a single JSON object and nothing else.";

const RECOMMENDATION_SHAPE: &str = r#"{"summary": string, "recommendations": [{"title": string, "detail": string, "category": "medical" | "lifestyle" | "wellbeing" | "financial" | "preparation"}], "nextSteps": [string]}"#;

const ANALYSIS_SHAPE: &str = r#"{"extractedFields": [{"name": string, "value": string | number, "unit": string | null, "referenceRange": string | null}], "insights": [string], "followUpQuestions": [string]}"#;

pub fn recommendations(
    profile: &PatientProfile,
    pathways: &[TreatmentPathwayOption],
) -> ChatRequest {
    let profile_json =
        serde_json::to_string_pretty(profile).unwrap_or_else(|_| "{}".to_string());
    let ranked = if pathways.is_empty() {
        "No treatment pathways have been calculated yet.".to_string()
    } else {
        pathways
            .iter()
            .map(|option| {
                format!(
                    "- {} (suitability {}, estimated success {}%)",
                    option.name, option.suitability, option.success_rate
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    let prompt = format!(
        "Patient intake profile:\n{profile_json}\n\nRanked treatment pathways:\n{ranked}\n\n\
         Write three to five personalised recommendations for this patient's next few weeks. \
         Respond with JSON matching {RECOMMENDATION_SHAPE}."
    );

    ChatRequest {
        messages: vec![ChatMessage::system(SYSTEM), ChatMessage::user(prompt)],
        temperature: TEMPERATURE,
    }
}

pub fn text_analysis(report: &str) -> ChatRequest {
    let prompt = format!(
        "Extract the measured values from this fertility lab report, note anything a patient \
         should ask about, and suggest follow-up questions. Respond with JSON matching \
         {ANALYSIS_SHAPE}.\n\nReport:\n{report}"
    );

    ChatRequest {
        messages: vec![ChatMessage::system(SYSTEM), ChatMessage::user(prompt)],
        temperature: TEMPERATURE,
    }
}

pub fn image_analysis(data_url: String) -> ChatRequest {
    let instruction = format!(
        "The attached image is a fertility lab report. Extract the measured values, note anything \
         a patient should ask about, and suggest follow-up questions. Respond with JSON matching \
         {ANALYSIS_SHAPE}."
    );

    ChatRequest {
        messages: vec![
            ChatMessage::system(SYSTEM),
            ChatMessage::user_parts(vec![
                ContentPart::Text { text: instruction },
                ContentPart::ImageUrl {
                    image_url: ImageUrl { url: data_url },
                },
            ]),
        ],
        temperature: TEMPERATURE,
    }
}
