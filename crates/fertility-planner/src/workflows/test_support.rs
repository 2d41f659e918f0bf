use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;
use chrono::Utc;
use serde_json::Value;

use crate::storage::SqliteStore;
use crate::workflows::intake::{IntakePhase, PatientCode, PatientProfile, PatientRecord, PatientRepository};

pub(crate) fn store() -> Arc<SqliteStore> {
    Arc::new(SqliteStore::open_in_memory().expect("in-memory store"))
}

pub(crate) fn seed_patient(store: &SqliteStore, code: &str, profile: PatientProfile) -> PatientCode {
    let now = Utc::now();
    let record = PatientRecord {
        patient_code: PatientCode(code.to_string()),
        current_phase: IntakePhase::MedicalHistory,
        profile,
        created_at: now,
        updated_at: now,
    };
    store.upsert_patient(&record).expect("seed patient");
    record.patient_code
}

pub(crate) fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(body).expect("encode body")))
        .expect("request")
}

/// Body sent verbatim, for payloads `json_request` cannot express.
pub(crate) fn raw_request(method: &str, uri: &str, content_type: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, content_type)
        .body(Body::from(body.to_string()))
        .expect("request")
}

pub(crate) fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

pub(crate) async fn read_json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), 1 << 20)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json body")
}
