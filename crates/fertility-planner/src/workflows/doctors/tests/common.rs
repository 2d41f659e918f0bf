use std::sync::Arc;

use crate::storage::SqliteStore;
use crate::workflows::doctors::{
    DistanceEstimate, DistanceEstimator, DistanceSource, DoctorRecord, DoctorService,
    ExperienceLevel, Gender,
};

pub(super) fn doctor(id: &str, gender: Gender, experience: ExperienceLevel) -> DoctorRecord {
    DoctorRecord {
        id: id.to_string(),
        name: format!("Dr. {id}"),
        specialization: "General Practice".to_string(),
        gender,
        experience,
        clinic: "Test Clinic".to_string(),
        city: "Testville".to_string(),
        postal_code: "55401".to_string(),
        consultation_fee: 200,
        accepts_insurance: false,
        offers_telemedicine: false,
        languages: vec!["English".to_string()],
    }
}

/// Distance keyed on the destination code, for arranging ties.
pub(super) struct FixedDistances(pub Vec<(&'static str, f64)>);

impl DistanceEstimator for FixedDistances {
    fn estimate(&self, _origin: &str, destination: &str) -> DistanceEstimate {
        let km = self
            .0
            .iter()
            .find(|(code, _)| *code == destination)
            .map(|(_, km)| *km)
            .unwrap_or(100.0);
        DistanceEstimate {
            km,
            source: DistanceSource::Estimated,
        }
    }
}

pub(super) fn service(store: Arc<SqliteStore>) -> Arc<DoctorService<SqliteStore>> {
    Arc::new(DoctorService::new(store))
}
