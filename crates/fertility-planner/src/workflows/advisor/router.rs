use std::sync::Arc;

use axum::extract::multipart::MultipartRejection;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Router;

use super::client::ChatCompletionClient;
use super::domain::{RecommendationRequest, ReportImage, TextAnalysisRequest};
use super::service::{AdvisorService, MAX_IMAGE_BYTES};
use crate::workflows::intake::PatientRepository;
use crate::workflows::pathways::PathwayRepository;
use crate::workflows::response::{Envelope, JsonBody, PlannerError};
use crate::workflows::timeline::TimelineRepository;

/// Room for the image plus the other form fields.
const MAX_UPLOAD_BYTES: usize = MAX_IMAGE_BYTES + 64 * 1024;

pub fn advisor_router<R, C>(service: Arc<AdvisorService<R, C>>) -> Router
where
    R: PatientRepository + PathwayRepository + TimelineRepository + 'static,
    C: ChatCompletionClient + 'static,
{
    Router::new()
        .route("/api/ai/recommendations", post(recommendations_handler::<R, C>))
        .route("/api/ai/analyze-text", post(analyze_text_handler::<R, C>))
        .route(
            "/api/ai/analyze-report",
            post(analyze_report_handler::<R, C>).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .with_state(service)
}

pub(crate) async fn recommendations_handler<R, C>(
    State(service): State<Arc<AdvisorService<R, C>>>,
    JsonBody(request): JsonBody<RecommendationRequest>,
) -> Response
where
    R: PatientRepository + PathwayRepository + TimelineRepository + 'static,
    C: ChatCompletionClient + 'static,
{
    match service.recommendations(request).await {
        Ok(advice) => Envelope::ok(advice).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn analyze_text_handler<R, C>(
    State(service): State<Arc<AdvisorService<R, C>>>,
    JsonBody(request): JsonBody<TextAnalysisRequest>,
) -> Response
where
    R: PatientRepository + PathwayRepository + TimelineRepository + 'static,
    C: ChatCompletionClient + 'static,
{
    match service.analyze_text(request).await {
        Ok(advice) => Envelope::ok(advice).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn analyze_report_handler<R, C>(
    State(service): State<Arc<AdvisorService<R, C>>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response
where
    R: PatientRepository + PathwayRepository + TimelineRepository + 'static,
    C: ChatCompletionClient + 'static,
{
    let mut multipart = match multipart {
        Ok(multipart) => multipart,
        Err(rejection) => {
            return PlannerError::InvalidInput(rejection.body_text()).into_response();
        }
    };
    let upload = match read_upload(&mut multipart).await {
        Ok(upload) => upload,
        Err(err) => return err.into_response(),
    };

    match service
        .analyze_image(upload.patient_code.as_deref(), upload.image)
        .await
    {
        Ok(advice) => Envelope::ok(advice).into_response(),
        Err(err) => err.into_response(),
    }
}

#[derive(Debug, Default)]
struct ReportUpload {
    patient_code: Option<String>,
    image: Option<ReportImage>,
}

async fn read_upload(multipart: &mut Multipart) -> Result<ReportUpload, PlannerError> {
    let mut upload = ReportUpload::default();

    while let Some(field) = multipart.next_field().await.map_err(malformed)? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("patientCode") => {
                upload.patient_code = Some(field.text().await.map_err(malformed)?);
            }
            Some("file") => {
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field.bytes().await.map_err(malformed)?;
                upload.image = Some(ReportImage {
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
            _ => {}
        }
    }

    Ok(upload)
}

fn malformed(err: axum::extract::multipart::MultipartError) -> PlannerError {
    PlannerError::InvalidInput(format!("malformed multipart body: {err}"))
}
