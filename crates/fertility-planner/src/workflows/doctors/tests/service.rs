use std::sync::Arc;

use super::common::*;
use crate::workflows::doctors::{
    DistanceSource, DoctorPreferences, DoctorService, ExperienceLevel, Gender, MatchRequest,
    ReviewRequest,
};
use crate::workflows::intake::{PatientProfile, PatientRepository};
use crate::workflows::response::{ErrorCode, PlannerError};
use crate::workflows::test_support::{seed_patient, store};
use crate::workflows::timeline::{TimelineEventKind, TimelineRepository};

fn match_request(code: &str, postal: &str) -> MatchRequest {
    MatchRequest {
        patient_code: Some(code.to_string()),
        postal_code: Some(postal.to_string()),
        city: Some("New York".to_string()),
        preferences: Some(DoctorPreferences {
            experience_level: Some(ExperienceLevel::Senior),
            max_distance: Some(25.0),
            ..DoctorPreferences::default()
        }),
    }
}

#[test]
fn recommend_requires_code_and_postal_code() {
    let service = service(store());
    let err = service
        .recommend(MatchRequest::default())
        .expect_err("nothing supplied");
    match err {
        PlannerError::MissingFields(fields) => {
            assert_eq!(fields, vec!["patientCode", "postalCode"])
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn recommend_rejects_unknown_patients() {
    let service = service(store());
    let err = service
        .recommend(match_request("FP-MISSING", "10016"))
        .expect_err("unknown patient");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[test]
fn recommend_ranks_whole_roster_and_records_everything() {
    let store = store();
    let code = seed_patient(&store, "FP-DOC00001", PatientProfile::default());
    let service = service(store.clone());

    let snapshot = service
        .recommend(match_request(code.as_str(), "10016"))
        .expect("recommendation");

    assert_eq!(snapshot.matches.len(), service.roster().len());
    assert!(snapshot.matches.iter().all(|m| m.match_score <= 100));
    let best = &snapshot.matches[0];
    assert_eq!(best.doctor.id, "dr-001");
    assert_eq!(best.distance_source, DistanceSource::Centroid);
    for pair in snapshot.matches.windows(2) {
        assert!(pair[0].match_score / 5 >= pair[1].match_score / 5);
    }

    let stored = store.fetch_patient(&code).expect("fetch").expect("patient");
    assert_eq!(stored.profile.postal_code.as_deref(), Some("10016"));
    assert_eq!(stored.profile.city.as_deref(), Some("New York"));
    assert_eq!(
        stored
            .profile
            .doctor_preferences
            .and_then(|prefs| prefs.experience_level),
        Some(ExperienceLevel::Senior)
    );

    let history = service.history(&code).expect("history");
    assert_eq!(history.recommendations.len(), 1);
    assert_eq!(history.recommendations[0].id, snapshot.id);

    let events = store.events(&code).expect("events");
    assert_eq!(events[0].kind, TimelineEventKind::DoctorsMatched);
}

#[test]
fn recommend_falls_back_to_stored_preferences() {
    let store = store();
    let profile = PatientProfile {
        doctor_preferences: Some(DoctorPreferences {
            preferred_gender: Some(crate::workflows::doctors::GenderPreference::Male),
            ..DoctorPreferences::default()
        }),
        ..PatientProfile::default()
    };
    let code = seed_patient(&store, "FP-DOC00002", profile);
    let service = service(store);

    let mut request = match_request(code.as_str(), "19103");
    request.preferences = None;
    let snapshot = service.recommend(request).expect("recommendation");

    assert_eq!(snapshot.matches[0].doctor.gender, Gender::Male);
}

#[test]
fn reviews_validate_rating_and_doctor() {
    let store = store();
    let code = seed_patient(&store, "FP-DOC00003", PatientProfile::default());
    let service = service(store);

    let out_of_range = service
        .submit_review(
            "dr-001",
            ReviewRequest {
                patient_code: Some(code.to_string()),
                rating: Some(6),
                comment: None,
            },
        )
        .expect_err("rating 6");
    assert_eq!(out_of_range.code(), ErrorCode::InvalidInput);

    let unknown_doctor = service
        .submit_review(
            "dr-999",
            ReviewRequest {
                patient_code: Some(code.to_string()),
                rating: Some(4),
                comment: None,
            },
        )
        .expect_err("unknown doctor");
    assert_eq!(unknown_doctor.code(), ErrorCode::NotFound);
}

#[test]
fn reviews_aggregate_to_a_rounded_average() {
    let store = store();
    let code = seed_patient(&store, "FP-DOC00004", PatientProfile::default());
    let service = service(store.clone());

    for rating in [5, 4, 4] {
        service
            .submit_review(
                "dr-004",
                ReviewRequest {
                    patient_code: Some(code.to_string()),
                    rating: Some(rating),
                    comment: Some("  Kind and clear  ".to_string()),
                },
            )
            .expect("review saved");
    }

    let reviews = service.reviews("dr-004").expect("reviews");
    assert_eq!(reviews.summary.review_count, 3);
    assert_eq!(reviews.summary.average_rating, Some(4.3));
    assert_eq!(reviews.reviews[0].comment.as_deref(), Some("Kind and clear"));

    let empty = service.reviews("dr-002").expect("no reviews");
    assert_eq!(empty.summary.average_rating, None);

    let events = store.events(&code).expect("events");
    assert!(events
        .iter()
        .all(|event| event.kind == TimelineEventKind::ReviewSubmitted));
}

#[test]
fn injected_roster_and_estimator_drive_the_ranking() {
    let store = store();
    let code = seed_patient(&store, "FP-DOC00009", PatientProfile::default());

    let mut near = doctor("dr-near", Gender::Male, ExperienceLevel::Early);
    near.postal_code = "55402".to_string();
    let far = doctor("dr-far", Gender::Female, ExperienceLevel::Senior);

    let service = DoctorService::new(store)
        .with_roster(vec![far, near])
        .with_estimator(Arc::new(FixedDistances(vec![("55402", 3.0), ("55401", 40.0)])));

    let snapshot = service
        .recommend(MatchRequest {
            patient_code: Some(code.as_str().to_string()),
            postal_code: Some("55400".to_string()),
            ..MatchRequest::default()
        })
        .expect("recommendation");

    let ids: Vec<&str> = snapshot.matches.iter().map(|m| m.doctor.id.as_str()).collect();
    assert_eq!(ids, vec!["dr-near", "dr-far"]);
    assert!(snapshot.matches.iter().all(|m| m.match_score == 10));
}
