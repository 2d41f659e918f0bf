use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use tracing::error;

use crate::storage::StorageError;

/// Machine-readable failure category sent to the UI as `errorCode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    MissingFields,
    InvalidInput,
    NotFound,
    AiServiceUnavailable,
    InternalError,
}

impl ErrorCode {
    pub const fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingFields => "MISSING_FIELDS",
            ErrorCode::InvalidInput => "INVALID_INPUT",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::AiServiceUnavailable => "AI_SERVICE_UNAVAILABLE",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        }
    }

    pub const fn status(self) -> StatusCode {
        match self {
            ErrorCode::MissingFields | ErrorCode::InvalidInput => StatusCode::BAD_REQUEST,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::AiServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error shared by every planner workflow and mapped onto the HTTP envelope.
#[derive(Debug, thiserror::Error)]
pub enum PlannerError {
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
    #[error("{0}")]
    InvalidInput(String),
    #[error("{entity} '{key}' not found")]
    NotFound { entity: &'static str, key: String },
    #[error("AI service unavailable: {0}")]
    AiUnavailable(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl PlannerError {
    pub fn not_found(entity: &'static str, key: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            key: key.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            PlannerError::MissingFields(_) => ErrorCode::MissingFields,
            PlannerError::InvalidInput(_) => ErrorCode::InvalidInput,
            PlannerError::NotFound { .. } => ErrorCode::NotFound,
            PlannerError::AiUnavailable(_) => ErrorCode::AiServiceUnavailable,
            PlannerError::Storage(_) => ErrorCode::InternalError,
        }
    }
}

impl IntoResponse for PlannerError {
    fn into_response(self) -> Response {
        let code = self.code();
        let message = match &self {
            PlannerError::Storage(err) => {
                error!(error = %err, "storage failure while handling request");
                "internal error".to_string()
            }
            other => other.to_string(),
        };

        let body = Json(json!({
            "success": false,
            "error": message,
            "errorCode": code.as_str(),
        }));
        (code.status(), body).into_response()
    }
}

/// Successful response: the payload's fields flattened next to `success: true`.
#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    success: bool,
    #[serde(flatten)]
    body: T,
}

impl<T: Serialize> Envelope<T> {
    pub fn ok(body: T) -> Self {
        Self {
            success: true,
            body,
        }
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// JSON body extractor whose rejections use the planner error envelope
/// (`INVALID_INPUT`, 400) instead of axum's plain-text responses.
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = PlannerError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(PlannerError::InvalidInput(rejection.body_text())),
        }
    }
}

/// Collect the names of required fields that are absent or blank.
pub(crate) fn require_fields(fields: &[(&'static str, Option<&str>)]) -> Result<(), PlannerError> {
    let missing: Vec<&'static str> = fields
        .iter()
        .filter(|(_, value)| value.map(|v| v.trim().is_empty()).unwrap_or(true))
        .map(|(name, _)| *name)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(PlannerError::MissingFields(missing))
    }
}
