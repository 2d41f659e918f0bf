use std::sync::Arc;

use axum::http::StatusCode;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde_json::json;
use tower::ServiceExt;

use super::*;
use crate::storage::SqliteStore;
use crate::workflows::intake::{PatientCode, PatientProfile};
use crate::workflows::response::ErrorCode;
use crate::workflows::test_support::{
    get_request, json_request, raw_request, read_json_body, seed_patient, store,
};
use crate::workflows::timeline::{TimelineEventKind, TimelineRepository};

fn care(store: &Arc<SqliteStore>) -> CareService<SqliteStore> {
    CareService::new(Arc::clone(store))
}

fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0).single().expect("valid time")
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

#[test]
fn sessions_list_in_schedule_order() {
    let store = store();
    let code = seed_patient(&store, "FP-CARE0001", PatientProfile::default());
    let service = care(&store);

    let later = SessionRequest {
        doctor_id: Some("dr-001".to_string()),
        scheduled_for: Some(at(2026, 6, 3, 15, 0)),
        ..SessionRequest::default()
    };
    let sooner = SessionRequest {
        mode: Some(CareMode::Phone),
        scheduled_for: Some(at(2026, 5, 20, 9, 30)),
        notes: Some("  discuss AMH  ".to_string()),
        ..SessionRequest::default()
    };
    service.schedule_session(&code, later).expect("later session");
    service.schedule_session(&code, sooner).expect("sooner session");

    let listed = service.sessions(&code).expect("sessions").sessions;
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].mode, CareMode::Phone);
    assert_eq!(listed[0].notes.as_deref(), Some("discuss AMH"));
    assert_eq!(listed[0].doctor_id, None);
    assert_eq!(listed[1].mode, CareMode::Video);
    assert_eq!(listed[1].status, SessionStatus::Scheduled);
    assert_eq!(listed[1].doctor_id.as_deref(), Some("dr-001"));

    let events = store.events(&code).expect("events");
    let scheduled = events
        .iter()
        .filter(|event| event.kind == TimelineEventKind::CareSessionScheduled)
        .count();
    assert_eq!(scheduled, 2);
}

#[test]
fn session_needs_a_time_and_a_roster_doctor() {
    let store = store();
    let code = seed_patient(&store, "FP-CARE0002", PatientProfile::default());
    let service = care(&store);

    let err = service
        .schedule_session(&code, SessionRequest::default())
        .expect_err("no time");
    assert_eq!(err.code(), ErrorCode::MissingFields);

    let err = service
        .schedule_session(
            &code,
            SessionRequest {
                doctor_id: Some("dr-999".to_string()),
                scheduled_for: Some(Utc::now()),
                ..SessionRequest::default()
            },
        )
        .expect_err("unknown doctor");
    assert_eq!(err.code(), ErrorCode::NotFound);
    assert!(service.sessions(&code).expect("sessions").sessions.is_empty());
}

#[test]
fn completed_sessions_are_stored_without_a_timeline_event() {
    let store = store();
    let code = seed_patient(&store, "FP-CARE0003", PatientProfile::default());
    let service = care(&store);

    service
        .schedule_session(
            &code,
            SessionRequest {
                status: Some(SessionStatus::Completed),
                scheduled_for: Some(Utc::now()),
                ..SessionRequest::default()
            },
        )
        .expect("stored");

    assert_eq!(service.sessions(&code).expect("sessions").sessions[0].status, SessionStatus::Completed);
    assert!(store.events(&code).expect("events").is_empty());
}

#[test]
fn unknown_patient_is_not_found_for_every_record() {
    let store = store();
    let service = care(&store);
    let code = PatientCode("FP-NOBODY01".to_string());

    assert_eq!(service.sessions(&code).expect_err("sessions").code(), ErrorCode::NotFound);
    assert_eq!(service.timeline(&code).expect_err("timeline").code(), ErrorCode::NotFound);
    assert_eq!(service.story(&code).expect_err("story").code(), ErrorCode::NotFound);
    let err = service
        .add_chapter(
            &code,
            ChapterRequest {
                title: Some("Start".to_string()),
                body: Some("Day one".to_string()),
                mood: None,
            },
        )
        .expect_err("chapter");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[test]
fn timeline_items_sort_by_target_date() {
    let store = store();
    let code = seed_patient(&store, "FP-CARE0004", PatientProfile::default());
    let service = care(&store);

    service
        .add_timeline_item(
            &code,
            TimelineItemRequest {
                title: Some("Retrieval".to_string()),
                target_date: Some(date(2026, 7, 1)),
                step_key: Some("procedure".to_string()),
                ..TimelineItemRequest::default()
            },
        )
        .expect("retrieval");
    service
        .add_timeline_item(
            &code,
            TimelineItemRequest {
                title: Some("Baseline scan".to_string()),
                target_date: Some(date(2026, 6, 2)),
                ..TimelineItemRequest::default()
            },
        )
        .expect("scan");

    let items = service.timeline(&code).expect("timeline").items;
    let titles: Vec<_> = items.iter().map(|item| item.title.as_str()).collect();
    assert_eq!(titles, vec!["Baseline scan", "Retrieval"]);
    assert_eq!(items[1].step_key.as_deref(), Some("procedure"));
}

#[test]
fn timeline_item_validation() {
    let store = store();
    let code = seed_patient(&store, "FP-CARE0005", PatientProfile::default());
    let service = care(&store);

    let err = service
        .add_timeline_item(&code, TimelineItemRequest::default())
        .expect_err("empty");
    assert_eq!(err.code(), ErrorCode::MissingFields);
    assert!(err.to_string().contains("title"));
    assert!(err.to_string().contains("targetDate"));

    let err = service
        .add_timeline_item(
            &code,
            TimelineItemRequest {
                title: Some("Scan".to_string()),
                target_date: Some(date(2026, 6, 2)),
                step_key: Some("egg_freezing".to_string()),
                ..TimelineItemRequest::default()
            },
        )
        .expect_err("unknown step");
    assert_eq!(err.code(), ErrorCode::InvalidInput);
}

#[test]
fn planning_lays_steps_end_to_end_once() {
    let store = store();
    let code = seed_patient(&store, "FP-CARE0006", PatientProfile::default());
    let service = care(&store);

    let plan = service
        .plan_timeline(&code, PlanRequest { start_date: Some(date(2026, 5, 1)) })
        .expect("plan");
    let dates: Vec<_> = plan.items.iter().map(|item| item.target_date).collect();
    assert_eq!(
        dates,
        vec![
            date(2026, 5, 1),
            date(2026, 5, 8),
            date(2026, 6, 7),
            date(2026, 6, 14),
            date(2026, 6, 28),
            date(2026, 6, 29),
            date(2026, 7, 13),
        ]
    );
    assert_eq!(plan.items[0].title, "Initial consultation");
    assert!(plan.items[0].description.is_some());

    let again = service
        .plan_timeline(&code, PlanRequest { start_date: Some(date(2027, 1, 1)) })
        .expect("replan");
    assert_eq!(again.items.len(), 7);
    assert_eq!(again.items[0].target_date, date(2026, 5, 1));
}

#[test]
fn chapters_are_numbered_per_patient() {
    let store = store();
    let first = seed_patient(&store, "FP-CARE0007", PatientProfile::default());
    let second = seed_patient(&store, "FP-CARE0008", PatientProfile::default());
    let service = care(&store);

    let chapter = |title: &str, mood: Option<&str>| ChapterRequest {
        title: Some(title.to_string()),
        body: Some(format!("{title} notes")),
        mood: mood.map(str::to_string),
    };
    let one = service.add_chapter(&first, chapter("Deciding", Some("hopeful"))).expect("one");
    let two = service.add_chapter(&first, chapter("Testing", None)).expect("two");
    let other = service.add_chapter(&second, chapter("Beginning", None)).expect("other");
    assert_eq!((one.chapter, two.chapter, other.chapter), (1, 2, 1));

    let story = service.story(&first).expect("story");
    let numbers: Vec<_> = story.chapters.iter().map(|c| c.chapter).collect();
    assert_eq!(numbers, vec![1, 2]);
    assert_eq!(story.chapters[0].mood.as_deref(), Some("hopeful"));

    let events = store.events(&first).expect("events");
    assert!(events
        .iter()
        .any(|event| event.kind == TimelineEventKind::StoryChapterAdded && event.title == "Chapter 2: Testing"));

    let err = service
        .add_chapter(&first, ChapterRequest { title: Some("  ".to_string()), ..ChapterRequest::default() })
        .expect_err("blank");
    assert_eq!(err.code(), ErrorCode::MissingFields);
}

#[tokio::test]
async fn care_routes_store_and_list_records() {
    let store = store();
    seed_patient(&store, "FP-CARE0009", PatientProfile::default());
    let router = care_router(Arc::new(CareService::new(store)));

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/care/FP-CARE0009/sessions",
            &json!({ "doctorId": "dr-002", "mode": "chat", "scheduledFor": "2026-06-01T10:00:00Z" }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["success"], json!(true));
    assert_eq!(payload["session"]["mode"], json!("chat"));
    assert_eq!(payload["session"]["status"], json!("scheduled"));

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/care/FP-CARE0009/timeline",
            &json!({ "title": "Baseline scan", "targetDate": "2026-06-02" }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["item"]["targetDate"], json!("2026-06-02"));

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/care/FP-CARE0009/story",
            &json!({ "title": "Week one", "body": "Started injections." }),
        ))
        .await
        .expect("route executes");
    let payload = read_json_body(response).await;
    assert_eq!(payload["chapter"]["chapter"], json!(1));

    for (uri, key) in [
        ("/api/care/FP-CARE0009/sessions", "sessions"),
        ("/api/care/FP-CARE0009/timeline", "items"),
        ("/api/care/FP-CARE0009/story", "chapters"),
    ] {
        let response = router.clone().oneshot(get_request(uri)).await.expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);
        let payload = read_json_body(response).await;
        assert_eq!(payload["patientCode"], json!("FP-CARE0009"));
        assert_eq!(payload[key].as_array().map(Vec::len), Some(1), "{uri}");
    }

    let response = router
        .oneshot(json_request(
            "POST",
            "/api/care/FP-CARE0009/timeline/plan",
            &json!({ "startDate": "2026-05-01" }),
        ))
        .await
        .expect("route executes");
    let payload = read_json_body(response).await;
    assert_eq!(payload["items"].as_array().map(Vec::len), Some(8));
}

#[tokio::test]
async fn care_routes_envelope_their_errors() {
    let store = store();
    seed_patient(&store, "FP-CARE0010", PatientProfile::default());
    let router = care_router(Arc::new(CareService::new(store)));

    let response = router
        .clone()
        .oneshot(get_request("/api/care/FP-NOBODY01/story"))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let payload = read_json_body(response).await;
    assert_eq!(payload["errorCode"], json!("NOT_FOUND"));

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/care/FP-CARE0010/sessions",
            &json!({ "mode": "carrierPigeon", "scheduledFor": "2026-06-01T10:00:00Z" }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert_eq!(payload["errorCode"], json!("INVALID_INPUT"));

    let response = router
        .clone()
        .oneshot(raw_request("POST", "/api/care/FP-CARE0010/story", "application/json", "[1, 2"))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert_eq!(payload["success"], json!(false));

    let response = router
        .oneshot(json_request("POST", "/api/care/FP-CARE0010/story", &json!({ "title": "Only a title" })))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert_eq!(payload["errorCode"], json!("MISSING_FIELDS"));
}
