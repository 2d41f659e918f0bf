//! Distance between a patient's postal code and a clinic's.
//!
//! Known postal areas resolve to centroid coordinates and a great-circle
//! distance. Anything else falls back to a coarse bucket estimate driven by
//! the numeric gap between the two codes, which is only a stand-in until a
//! geocoding provider is wired in.

use super::domain::{DistanceEstimate, DistanceSource};

pub trait DistanceEstimator: Send + Sync {
    fn estimate(&self, origin: &str, destination: &str) -> DistanceEstimate;
}

const EARTH_RADIUS_KM: f64 = 6_371.0;
const INTRA_AREA_KM_PER_STEP: f64 = 0.4;
const INTRA_AREA_CAP_KM: f64 = 25.0;

/// Three-digit postal prefix to (latitude, longitude).
const CENTROIDS: &[(&str, f64, f64)] = &[
    ("021", 42.3601, -71.0589),
    ("070", 40.7357, -74.1724),
    ("100", 40.7128, -74.0060),
    ("112", 40.6782, -73.9442),
    ("191", 39.9526, -75.1652),
    ("200", 38.9072, -77.0369),
    ("303", 33.7490, -84.3880),
    ("606", 41.8781, -87.6298),
    ("770", 29.7604, -95.3698),
    ("900", 34.0522, -118.2437),
    ("941", 37.7749, -122.4194),
    ("981", 47.6062, -122.3321),
];

#[derive(Debug, Default, Clone, Copy)]
pub struct PostalDistanceEstimator;

impl PostalDistanceEstimator {
    fn centroid(code: &str) -> Option<(f64, f64)> {
        let prefix = code.get(..3)?;
        CENTROIDS
            .iter()
            .find(|(candidate, _, _)| *candidate == prefix)
            .map(|(_, lat, lon)| (*lat, *lon))
    }
}

impl DistanceEstimator for PostalDistanceEstimator {
    fn estimate(&self, origin: &str, destination: &str) -> DistanceEstimate {
        let origin = digits(origin);
        let destination = digits(destination);

        match (Self::centroid(&origin), Self::centroid(&destination)) {
            (Some(from), Some(to)) => {
                let mut km = haversine_km(from, to);
                if origin[..3] == destination[..3] {
                    let steps = numeric_gap(&origin, &destination).unwrap_or(0) as f64;
                    km += (steps * INTRA_AREA_KM_PER_STEP).min(INTRA_AREA_CAP_KM);
                }
                DistanceEstimate {
                    km: round_tenth(km),
                    source: DistanceSource::Centroid,
                }
            }
            _ => DistanceEstimate {
                km: bucket_estimate(numeric_gap(&origin, &destination)),
                source: DistanceSource::Estimated,
            },
        }
    }
}

fn digits(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

fn numeric_gap(a: &str, b: &str) -> Option<u64> {
    let a: u64 = a.parse().ok()?;
    let b: u64 = b.parse().ok()?;
    Some(a.abs_diff(b))
}

/// Midpoints of the distance ranges the gap buckets stand for.
fn bucket_estimate(gap: Option<u64>) -> f64 {
    match gap {
        Some(0) => 2.0,
        Some(gap) if gap < 10 => 5.0,
        Some(gap) if gap < 100 => 15.0,
        Some(gap) if gap < 1_000 => 40.0,
        Some(gap) if gap < 10_000 => 150.0,
        _ => 500.0,
    }
}

fn haversine_km((lat1, lon1): (f64, f64), (lat2, lon2): (f64, f64)) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().asin()
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
