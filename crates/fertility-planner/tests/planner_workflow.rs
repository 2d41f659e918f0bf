use std::sync::Arc;

use fertility_planner::storage::SqliteStore;
use fertility_planner::workflows::doctors::{
    DoctorPreferences, DoctorService, ExperienceLevel, GenderPreference, MatchRequest,
    ReviewRequest,
};
use fertility_planner::workflows::intake::{
    IntakePhase, IntakeRequest, IntakeService, PatientCode, PatientProfile,
};
use fertility_planner::workflows::journey::{
    EntryRequest, JourneyService, MilestoneStatus, MilestoneUpdate,
};
use fertility_planner::workflows::pathways::{CalculateRequest, PathwayKey, PathwayService};
use fertility_planner::workflows::timeline::{timeline_for, TimelineEventKind};
use serde_json::json;

fn intake(
    service: &IntakeService<SqliteStore>,
    code: Option<&str>,
    phase: IntakePhase,
    profile: PatientProfile,
) -> String {
    service
        .upsert(IntakeRequest {
            patient_code: code.map(str::to_string),
            phase: Some(phase),
            profile,
        })
        .expect("intake saved")
        .patient_code
        .0
}

#[test]
fn patient_journey_from_intake_to_review() {
    let store = Arc::new(SqliteStore::open_in_memory().expect("in-memory store"));
    let intake_service = IntakeService::new(store.clone());
    let pathways = PathwayService::new(store.clone());
    let doctors = DoctorService::new(store.clone());
    let journey = JourneyService::new(store.clone());

    let code = intake(
        &intake_service,
        None,
        IntakePhase::Basics,
        PatientProfile {
            age_range: Some("38-40".to_string()),
            ..PatientProfile::default()
        },
    );
    intake(
        &intake_service,
        Some(&code),
        IntakePhase::MedicalHistory,
        PatientProfile {
            conditions: Some(vec!["blockedTubes".to_string()]),
            previous_treatments: Some("none".to_string()),
            ..PatientProfile::default()
        },
    );
    intake(
        &intake_service,
        Some(&code),
        IntakePhase::Preferences,
        PatientProfile {
            postal_code: Some("10016".to_string()),
            doctor_preferences: Some(DoctorPreferences {
                preferred_gender: Some(GenderPreference::Female),
                experience_level: Some(ExperienceLevel::Senior),
                max_distance: Some(25.0),
                ..DoctorPreferences::default()
            }),
            ..PatientProfile::default()
        },
    );

    let plan = pathways
        .calculate(CalculateRequest {
            patient_code: Some(code.clone()),
            profile: None,
        })
        .expect("pathways calculated");
    assert_eq!(plan.pathways[0].key, PathwayKey::IvfIcsi);

    let snapshot = doctors
        .recommend(MatchRequest {
            patient_code: Some(code.clone()),
            postal_code: Some("10016".to_string()),
            ..MatchRequest::default()
        })
        .expect("doctors matched");
    assert_eq!(snapshot.preferences.experience_level, Some(ExperienceLevel::Senior));
    assert_eq!(snapshot.matches[0].doctor.id, "dr-001");

    doctors
        .submit_review(
            "dr-001",
            ReviewRequest {
                patient_code: Some(code.clone()),
                rating: Some(5),
                comment: Some("  Clear and kind  ".to_string()),
            },
        )
        .expect("review stored");

    let patient = PatientCode(code.clone());
    journey
        .record_entry(
            &patient,
            EntryRequest {
                category: Some("labs".to_string()),
                label: Some("AMH".to_string()),
                value: Some(json!(1.4)),
                unit: Some("ng/mL".to_string()),
                ..EntryRequest::default()
            },
        )
        .expect("entry recorded");
    let progress = journey
        .update_milestone(
            &patient,
            "initial_consultation",
            MilestoneUpdate {
                status: Some(MilestoneStatus::Completed),
                notes: None,
            },
        )
        .expect("milestone updated");
    assert_eq!(progress.completed, 1);
    assert_eq!(progress.progress_percent, 14);

    let timeline = timeline_for(store.as_ref(), &patient).expect("timeline");
    let kinds: Vec<TimelineEventKind> = timeline.events.iter().map(|event| event.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TimelineEventKind::MilestoneCompleted,
            TimelineEventKind::DataRecorded,
            TimelineEventKind::ReviewSubmitted,
            TimelineEventKind::DoctorsMatched,
            TimelineEventKind::PathwaysCalculated,
            TimelineEventKind::PhaseCompleted,
            TimelineEventKind::PhaseCompleted,
            TimelineEventKind::PhaseCompleted,
        ]
    );
}

#[test]
fn file_backed_store_survives_reopen() {
    let path = std::env::temp_dir().join(format!(
        "fertility-planner-{}.db",
        uuid::Uuid::new_v4()
    ));

    let code = {
        let store = Arc::new(SqliteStore::open(&path).expect("file store"));
        let code = intake(
            &IntakeService::new(store.clone()),
            None,
            IntakePhase::MedicalHistory,
            PatientProfile {
                age_range: Some("> 42".to_string()),
                conditions: Some(vec!["lowOvarianReserve".to_string()]),
                ..PatientProfile::default()
            },
        );
        PathwayService::new(store)
            .calculate(CalculateRequest {
                patient_code: Some(code.clone()),
                profile: None,
            })
            .expect("pathways calculated");
        code
    };

    let reopened = Arc::new(SqliteStore::open(&path).expect("reopen store"));
    let session = IntakeService::new(reopened.clone())
        .session(&PatientCode(code.clone()))
        .expect("session persisted");
    assert_eq!(session.current_phase, IntakePhase::MedicalHistory);

    let plan = PathwayService::new(reopened)
        .latest(&session.patient_code)
        .expect("plan persisted");
    let keys: Vec<PathwayKey> = plan.pathways.iter().map(|option| option.key).collect();
    assert_eq!(keys, vec![PathwayKey::IvfIcsi, PathwayKey::IvfPgtA, PathwayKey::Iui]);

    let _ = std::fs::remove_file(&path);
}
