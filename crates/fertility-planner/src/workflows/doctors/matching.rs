use std::cmp::Ordering;

use super::distance::DistanceEstimator;
use super::domain::{DoctorMatch, DoctorPreferences, DoctorRecord, Gender, GenderPreference};

const GENDER_MATCH: u8 = 20;
const GENDER_NEUTRAL: u8 = 10;
const EXPERIENCE_EXACT: u8 = 25;
const EXPERIENCE_ADJACENT: u8 = 15;
const SPECIALIZATION_EXACT: u8 = 30;
const SPECIALIZATION_RELATED: u8 = 20;
const WITHIN_RADIUS: u8 = 15;
const NEAR_RADIUS: u8 = 8;
const NEAR_RADIUS_FACTOR: f64 = 1.5;
const INSURANCE: u8 = 5;
const TELEMEDICINE: u8 = 5;
const TIE_BAND: u8 = 5;

/// Specialties that are a reasonable substitute for any fertility request.
const HIGH_RELEVANCE_SPECIALTIES: &[&str] = &[
    "reproductive endocrinology",
    "ivf specialist",
    "fertility specialist",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchScore {
    pub score: u8,
    pub reasons: Vec<String>,
}

/// Additive points across independent criteria, clamped to 100.
pub fn match_score(doctor: &DoctorRecord, distance_km: f64, prefs: &DoctorPreferences) -> MatchScore {
    let mut total: u16 = 0;
    let mut reasons = Vec::new();

    match prefs.preferred_gender {
        None | Some(GenderPreference::Any) => {
            total += u16::from(GENDER_NEUTRAL);
        }
        Some(preferred) => {
            let matches = matches!(
                (preferred, doctor.gender),
                (GenderPreference::Female, Gender::Female)
                    | (GenderPreference::Male, Gender::Male)
            );
            if matches {
                total += u16::from(GENDER_MATCH);
                reasons.push("Matches your preferred doctor gender".to_string());
            }
        }
    }

    if let Some(wanted) = prefs.experience_level {
        if wanted == doctor.experience {
            total += u16::from(EXPERIENCE_EXACT);
            reasons.push("Experience level matches your preference".to_string());
        } else if wanted.is_adjacent_to(doctor.experience) {
            total += u16::from(EXPERIENCE_ADJACENT);
            reasons.push("Experience level close to your preference".to_string());
        }
    }

    if let Some(wanted) = prefs
        .specialization
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
    {
        let offered = doctor.specialization.trim().to_ascii_lowercase();
        if offered == wanted.to_ascii_lowercase() {
            total += u16::from(SPECIALIZATION_EXACT);
            reasons.push(format!("Specializes in {}", doctor.specialization));
        } else if HIGH_RELEVANCE_SPECIALTIES.contains(&offered.as_str()) {
            total += u16::from(SPECIALIZATION_RELATED);
            reasons.push(format!(
                "{} is closely related to your request",
                doctor.specialization
            ));
        }
    }

    if let Some(radius) = prefs.max_distance.filter(|radius| *radius > 0.0) {
        if distance_km <= radius {
            total += u16::from(WITHIN_RADIUS);
            reasons.push(format!("Within {radius:.0} km ({distance_km:.1} km away)"));
        } else if distance_km <= radius * NEAR_RADIUS_FACTOR {
            total += u16::from(NEAR_RADIUS);
            reasons.push(format!(
                "Slightly beyond {radius:.0} km ({distance_km:.1} km away)"
            ));
        }
    }

    if prefs.accepts_insurance == Some(true) && doctor.accepts_insurance {
        total += u16::from(INSURANCE);
        reasons.push("Accepts insurance".to_string());
    }

    if prefs.offers_telemedicine == Some(true) && doctor.offers_telemedicine {
        total += u16::from(TELEMEDICINE);
        reasons.push("Offers telemedicine visits".to_string());
    }

    MatchScore {
        score: total.min(100) as u8,
        reasons,
    }
}

/// Score the roster from `origin` and order it for display.
pub fn rank_doctors(
    roster: &[DoctorRecord],
    origin: &str,
    prefs: &DoctorPreferences,
    estimator: &dyn DistanceEstimator,
) -> Vec<DoctorMatch> {
    let mut matches: Vec<DoctorMatch> = roster
        .iter()
        .map(|doctor| {
            let distance = estimator.estimate(origin, &doctor.postal_code);
            let MatchScore { score, reasons } = match_score(doctor, distance.km, prefs);
            DoctorMatch {
                doctor: doctor.clone(),
                distance_km: distance.km,
                distance_source: distance.source,
                match_score: score,
                reasons,
            }
        })
        .collect();

    matches.sort_by(compare_matches);
    matches
}

/// Ranking order for [`rank_doctors`].
///
/// Bands are fixed buckets of `TIE_BAND` points (90-94, 95-99, 100), not a
/// sliding window: 90 and 94 tie and fall back to distance, while 94 and 95
/// sit in different bands and the higher score wins however far away it is.
/// Inside a band the nearer doctor wins, then the higher raw score, then the
/// roster id.
pub(crate) fn compare_matches(a: &DoctorMatch, b: &DoctorMatch) -> Ordering {
    let band_a = a.match_score / TIE_BAND;
    let band_b = b.match_score / TIE_BAND;
    band_b
        .cmp(&band_a)
        .then_with(|| a.distance_km.total_cmp(&b.distance_km))
        .then_with(|| b.match_score.cmp(&a.match_score))
        .then_with(|| a.doctor.id.cmp(&b.doctor.id))
}
