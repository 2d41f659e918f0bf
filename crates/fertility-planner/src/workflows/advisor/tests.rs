use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use super::*;
use crate::storage::SqliteStore;
use crate::workflows::intake::PatientProfile;
use crate::workflows::response::{ErrorCode, PlannerError};
use crate::workflows::test_support::{json_request, raw_request, read_json_body, seed_patient, store};
use crate::workflows::timeline::{TimelineEventKind, TimelineRepository};

/// Replays canned completions in order and keeps every request it saw.
#[derive(Default)]
struct ScriptedClient {
    enabled: bool,
    replies: Mutex<VecDeque<Result<String, AiClientError>>>,
    seen: Mutex<Vec<ChatRequest>>,
}

impl ScriptedClient {
    fn answering(replies: Vec<Result<String, AiClientError>>) -> Self {
        Self {
            enabled: true,
            replies: Mutex::new(replies.into()),
            seen: Mutex::new(Vec::new()),
        }
    }

    fn disabled() -> Self {
        Self::default()
    }

    fn requests(&self) -> Vec<ChatRequest> {
        self.seen.lock().expect("lock").clone()
    }
}

impl ChatCompletionClient for ScriptedClient {
    fn is_enabled(&self) -> bool {
        self.enabled
    }

    async fn complete(&self, request: &ChatRequest) -> Result<String, AiClientError> {
        self.seen.lock().expect("lock").push(request.clone());
        self.replies
            .lock()
            .expect("lock")
            .pop_front()
            .unwrap_or_else(|| Err(AiClientError::Transport("script exhausted".to_string())))
    }
}

fn service(
    store: Arc<SqliteStore>,
    client: ScriptedClient,
) -> (Arc<AdvisorService<SqliteStore, ScriptedClient>>, Arc<ScriptedClient>) {
    let client = Arc::new(client);
    (
        Arc::new(AdvisorService::new(store, client.clone())),
        client,
    )
}

fn profile() -> PatientProfile {
    PatientProfile {
        age_range: Some("35-37".to_string()),
        conditions: Some(vec!["pcos".to_string()]),
        ..PatientProfile::default()
    }
}

const MODEL_RECOMMENDATIONS: &str = r#"```json
{
  "summary": "You have good options.",
  "recommendations": [
    {"title": "See a specialist", "detail": "Book soon.", "category": "medical"},
  ],
  "nextSteps": ["Book a consult",],
}
```"#;

#[tokio::test]
async fn model_recommendations_survive_fences_and_trailing_commas() {
    let store = store();
    let code = seed_patient(&store, "FP-AI000001", profile());
    let (service, client) = service(
        store.clone(),
        ScriptedClient::answering(vec![Ok(MODEL_RECOMMENDATIONS.to_string())]),
    );

    let advice = service
        .recommendations(RecommendationRequest {
            patient_code: Some(code.to_string()),
        })
        .await
        .expect("advice");

    assert_eq!(advice.source, AdviceSource::Model);
    assert_eq!(advice.body.summary, "You have good options.");
    assert_eq!(advice.body.recommendations.len(), 1);
    assert_eq!(advice.body.next_steps, vec!["Book a consult".to_string()]);

    let requests = client.requests();
    assert_eq!(requests.len(), 1);
    let MessageContent::Text(prompt) = &requests[0].messages[1].content else {
        panic!("recommendation prompt is plain text");
    };
    assert!(prompt.contains("35-37"));

    let events = store.events(&code).expect("events");
    assert_eq!(events[0].kind, TimelineEventKind::RecommendationsGenerated);
}

#[tokio::test]
async fn unusable_model_output_falls_back() {
    let store = store();
    let code = seed_patient(&store, "FP-AI000002", profile());
    let (service, _) = service(
        store,
        ScriptedClient::answering(vec![Ok("Sorry, I can't do that.".to_string())]),
    );

    let advice = service
        .recommendations(RecommendationRequest {
            patient_code: Some(code.to_string()),
        })
        .await
        .expect("fallback is still a success");

    assert_eq!(advice.source, AdviceSource::Fallback);
    assert_eq!(advice.body, fallback::recommendations());
}

#[tokio::test]
async fn upstream_errors_fall_back() {
    let store = store();
    let code = seed_patient(&store, "FP-AI000003", profile());
    let (service, _) = service(
        store,
        ScriptedClient::answering(vec![Err(AiClientError::Status {
            status: 502,
            body: "bad gateway".to_string(),
        })]),
    );

    let advice = service
        .recommendations(RecommendationRequest {
            patient_code: Some(code.to_string()),
        })
        .await
        .expect("fallback");
    assert_eq!(advice.source, AdviceSource::Fallback);
}

#[tokio::test]
async fn disabled_client_never_calls_out() {
    let store = store();
    let code = seed_patient(&store, "FP-AI000004", profile());
    let (service, client) = service(store, ScriptedClient::disabled());

    let advice = service
        .recommendations(RecommendationRequest {
            patient_code: Some(code.to_string()),
        })
        .await
        .expect("fallback");
    assert_eq!(advice.source, AdviceSource::Fallback);
    assert!(client.requests().is_empty());
}

#[tokio::test]
async fn recommendations_need_a_known_patient() {
    let (service, _) = service(store(), ScriptedClient::disabled());

    let missing = service
        .recommendations(RecommendationRequest::default())
        .await
        .expect_err("missing code");
    assert_eq!(missing.code(), ErrorCode::MissingFields);

    let unknown = service
        .recommendations(RecommendationRequest {
            patient_code: Some("FP-GHOST".to_string()),
        })
        .await
        .expect_err("unknown");
    assert_eq!(unknown.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn text_analysis_requires_text_and_parses_fields() {
    let (service, _) = service(
        store(),
        ScriptedClient::answering(vec![Ok(r#"{"extractedFields":[{"name":"AMH","value":1.9,"unit":"ng/mL"}],"insights":["Within range"],"followUpQuestions":[]}"#.to_string())]),
    );

    let err = service
        .analyze_text(TextAnalysisRequest {
            patient_code: None,
            text: Some("   ".to_string()),
        })
        .await
        .expect_err("blank text");
    assert!(matches!(err, PlannerError::MissingFields(ref fields) if fields == &vec!["text"]));

    let advice = service
        .analyze_text(TextAnalysisRequest {
            patient_code: None,
            text: Some("AMH 1.9 ng/mL".to_string()),
        })
        .await
        .expect("analysis");
    assert_eq!(advice.source, AdviceSource::Model);
    assert_eq!(advice.body.extracted_fields[0].name, "AMH");
    assert_eq!(advice.body.extracted_fields[0].value, json!(1.9));
    assert!(advice.patient_code.is_none());
}

#[tokio::test]
async fn image_analysis_is_unavailable_without_a_provider() {
    let (service, _) = service(store(), ScriptedClient::disabled());
    let err = service
        .analyze_image(
            None,
            Some(ReportImage {
                content_type: "image/png".to_string(),
                bytes: vec![0x89, b'P', b'N', b'G'],
            }),
        )
        .await
        .expect_err("disabled");
    assert_eq!(err.code(), ErrorCode::AiServiceUnavailable);
}

#[tokio::test]
async fn image_analysis_sends_a_data_url() {
    let store = store();
    let code = seed_patient(&store, "FP-AI000005", profile());
    let (service, client) = service(
        store.clone(),
        ScriptedClient::answering(vec![Err(AiClientError::Timeout(30))]),
    );

    let advice = service
        .analyze_image(
            Some(code.as_str()),
            Some(ReportImage {
                content_type: "image/jpeg".to_string(),
                bytes: b"jpeg".to_vec(),
            }),
        )
        .await
        .expect("fallback");
    assert_eq!(advice.source, AdviceSource::Fallback);
    assert_eq!(advice.body, fallback::report_analysis());

    let requests = client.requests();
    let MessageContent::Parts(parts) = &requests[0].messages[1].content else {
        panic!("image prompt uses content parts");
    };
    assert!(parts.iter().any(|part| matches!(
        part,
        ContentPart::ImageUrl { image_url } if image_url.url == "data:image/jpeg;base64,anBlZw=="
    )));

    let events = store.events(&code).expect("events");
    assert_eq!(events[0].kind, TimelineEventKind::ReportAnalyzed);
}

#[tokio::test]
async fn image_analysis_rejects_non_images() {
    let (service, _) = service(store(), ScriptedClient::answering(Vec::new()));
    let err = service
        .analyze_image(
            None,
            Some(ReportImage {
                content_type: "application/pdf".to_string(),
                bytes: b"%PDF".to_vec(),
            }),
        )
        .await
        .expect_err("pdf");
    assert_eq!(err.code(), ErrorCode::InvalidInput);

    let err = service
        .analyze_image(None, None)
        .await
        .expect_err("no file");
    assert_eq!(err.code(), ErrorCode::MissingFields);
}

#[tokio::test]
async fn analyze_text_route_reports_fallback_source() {
    let (service, _) = service(store(), ScriptedClient::disabled());
    let router = advisor_router(service);

    let response = router
        .oneshot(json_request(
            "POST",
            "/api/ai/analyze-text",
            &json!({ "text": "FSH 7.2 mIU/mL" }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["success"], json!(true));
    assert_eq!(payload["source"], json!("fallback"));
    assert!(payload["followUpQuestions"].is_array());
}

#[tokio::test]
async fn analyze_report_route_reads_multipart_uploads() {
    let (service, _) = service(store(), ScriptedClient::disabled());
    let router = advisor_router(service);

    let boundary = "report-boundary";
    let body = format!(
        "--{boundary}\r\n\
         Content-Disposition: form-data; name=\"file\"; filename=\"labs.png\"\r\n\
         Content-Type: image/png\r\n\r\n\
         PNGDATA\r\n\
         --{boundary}--\r\n"
    );
    let request = Request::builder()
        .method("POST")
        .uri("/api/ai/analyze-report")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .expect("request");

    let response = router.oneshot(request).await.expect("route executes");
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let payload = read_json_body(response).await;
    assert_eq!(payload["errorCode"], json!("AI_SERVICE_UNAVAILABLE"));
}

#[tokio::test]
async fn analyze_text_rejects_non_string_text() {
    let (service, _) = service(store(), ScriptedClient::disabled());
    let router = advisor_router(service);

    let response = router
        .oneshot(json_request("POST", "/api/ai/analyze-text", &json!({ "text": 42 })))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert_eq!(payload["success"], json!(false));
    assert_eq!(payload["errorCode"], json!("INVALID_INPUT"));
}

#[tokio::test]
async fn analyze_report_requires_a_multipart_body() {
    let (service, _) = service(store(), ScriptedClient::disabled());
    let router = advisor_router(service);

    let response = router
        .oneshot(raw_request(
            "POST",
            "/api/ai/analyze-report",
            "application/json",
            "{\"file\": \"labs.png\"}",
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert_eq!(payload["errorCode"], json!("INVALID_INPUT"));
}
