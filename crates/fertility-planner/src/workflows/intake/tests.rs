use std::sync::Arc;

use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;

use super::*;
use crate::workflows::response::ErrorCode;
use crate::workflows::test_support::{get_request, json_request, raw_request, read_json_body, store};
use crate::workflows::timeline::{TimelineEventKind, TimelineRepository};

fn request(code: Option<&str>, phase: IntakePhase, profile: PatientProfile) -> IntakeRequest {
    IntakeRequest {
        patient_code: code.map(str::to_string),
        phase: Some(phase),
        profile,
    }
}

#[test]
fn generated_codes_have_the_expected_shape() {
    let code = PatientCode::generate();
    let raw = code.as_str();
    assert_eq!(raw.len(), 11);
    assert!(raw.starts_with("FP-"));
    assert!(raw[3..]
        .chars()
        .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_lowercase()));
    assert_ne!(PatientCode::generate(), code);
}

#[test]
fn first_upsert_creates_a_patient_with_a_code() {
    let store = store();
    let service = IntakeService::new(store.clone());

    let session = service
        .upsert(request(
            None,
            IntakePhase::Basics,
            PatientProfile {
                age_range: Some("35-37".to_string()),
                ..PatientProfile::default()
            },
        ))
        .expect("created");

    assert!(session.patient_code.as_str().starts_with("FP-"));
    assert_eq!(session.current_phase, IntakePhase::Basics);
    assert_eq!(session.next_phase, Some(IntakePhase::MedicalHistory));
    assert!(!session.ready_for_pathways());

    let events = store.events(&session.patient_code).expect("events");
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind, TimelineEventKind::PhaseCompleted);
}

#[test]
fn later_phases_merge_and_never_regress() {
    let store = store();
    let service = IntakeService::new(store.clone());

    let first = service
        .upsert(request(
            None,
            IntakePhase::Basics,
            PatientProfile {
                age_range: Some("35-37".to_string()),
                cycle_regularity: Some("regular".to_string()),
                ..PatientProfile::default()
            },
        ))
        .expect("created");
    let code = first.patient_code.as_str().to_string();

    let second = service
        .upsert(request(
            Some(&code),
            IntakePhase::Holistic,
            PatientProfile {
                conditions: Some(vec!["endometriosis".to_string()]),
                financial_comfort: Some("low".to_string()),
                ..PatientProfile::default()
            },
        ))
        .expect("merged");
    assert_eq!(second.current_phase, IntakePhase::Holistic);
    assert_eq!(second.profile.age_range.as_deref(), Some("35-37"));
    assert_eq!(second.profile.financial_comfort.as_deref(), Some("low"));

    // Re-submitting an earlier phase edits data but keeps progress.
    let third = service
        .upsert(request(
            Some(&code),
            IntakePhase::Basics,
            PatientProfile {
                age_range: Some("38-40".to_string()),
                ..PatientProfile::default()
            },
        ))
        .expect("edited");
    assert_eq!(third.current_phase, IntakePhase::Holistic);
    assert_eq!(third.profile.age_range.as_deref(), Some("38-40"));
    assert!(third.profile.has_condition("endometriosis"));

    let events = store.events(&third.patient_code).expect("events");
    assert_eq!(events.len(), 2, "only forward moves are recorded");
}

#[test]
fn supplied_unknown_code_is_not_found() {
    let store = store();
    let service = IntakeService::new(store.clone());
    let err = service
        .upsert(request(
            Some("  FP-CLIENT01 "),
            IntakePhase::Basics,
            PatientProfile::default(),
        ))
        .expect_err("client-chosen code");
    assert_eq!(err.code(), ErrorCode::NotFound);
    assert!(store
        .fetch_patient(&PatientCode("FP-CLIENT01".to_string()))
        .expect("lookup")
        .is_none());
}

#[test]
fn blank_code_starts_a_new_patient() {
    let service = IntakeService::new(store());
    let session = service
        .upsert(request(Some("   "), IntakePhase::Basics, PatientProfile::default()))
        .expect("created");
    assert!(session.patient_code.as_str().starts_with("FP-"));
    assert_eq!(session.patient_code.as_str().len(), 11);
}

#[test]
fn missing_phase_is_rejected() {
    let service = IntakeService::new(store());
    let err = service
        .upsert(IntakeRequest::default())
        .expect_err("no phase");
    assert_eq!(err.code(), ErrorCode::MissingFields);
}

#[test]
fn condition_matching_ignores_case_and_separators() {
    let profile = PatientProfile {
        conditions: Some(vec!["Blocked_Tubes".to_string(), "PCOS".to_string()]),
        previous_treatments: Some("ivf".to_string()),
        ..PatientProfile::default()
    };
    assert!(profile.has_condition("blockedTubes"));
    assert!(profile.has_condition("pcos"));
    assert!(!profile.has_condition("fibroids"));
    assert!(profile.had_previous_ivf());
}

#[test]
fn option_values_match_exactly() {
    let profile = PatientProfile {
        previous_treatments: Some(" IVF ".to_string()),
        financial_comfort: Some("Low".to_string()),
        ..PatientProfile::default()
    };
    assert!(!profile.had_previous_ivf());
    assert!(!profile.has_low_financial_comfort());
}

#[tokio::test]
async fn routes_create_and_fetch_sessions() {
    let router = intake_router(Arc::new(IntakeService::new(store())));

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/patients",
            &json!({
                "phase": "medicalHistory",
                "profile": { "ageRange": "> 42", "conditions": ["lowOvarianReserve"] }
            }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["success"], json!(true));
    assert_eq!(payload["readyForPathways"], json!(true));
    assert_eq!(payload["session"]["currentPhase"], json!("medicalHistory"));
    assert_eq!(payload["session"]["nextPhase"], json!("holistic"));
    let code = payload["patientCode"].as_str().expect("code").to_string();

    let response = router
        .clone()
        .oneshot(get_request(&format!("/api/patients/{code}")))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["session"]["profile"]["ageRange"], json!("> 42"));

    let response = router
        .oneshot(get_request("/api/patients/FP-UNKNOWN"))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let payload = read_json_body(response).await;
    assert_eq!(payload["errorCode"], json!("NOT_FOUND"));
}

#[tokio::test]
async fn malformed_bodies_get_the_error_envelope() {
    let router = intake_router(Arc::new(IntakeService::new(store())));

    let response = router
        .clone()
        .oneshot(raw_request("POST", "/api/patients", "application/json", "{"))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert_eq!(payload["success"], json!(false));
    assert_eq!(payload["errorCode"], json!("INVALID_INPUT"));

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/patients",
            &json!({ "phase": "lifestyle", "profile": {} }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert_eq!(payload["errorCode"], json!("INVALID_INPUT"));

    let response = router
        .oneshot(json_request(
            "POST",
            "/api/patients",
            &json!({ "patientCode": "FP-NOBODY01", "phase": "basics", "profile": {} }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let payload = read_json_body(response).await;
    assert_eq!(payload["errorCode"], json!("NOT_FOUND"));
}
