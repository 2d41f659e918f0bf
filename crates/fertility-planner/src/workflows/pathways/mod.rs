//! Treatment pathway scoring and persistence.

mod catalogue;
pub mod domain;
pub mod repository;
pub mod router;
mod rules;
pub mod service;


pub use domain::{
    priority_tier, PathwayKey, PathwayPlan, ScoreAdjustment, ScoreMetric, TreatmentPathwayOption,
};
pub use repository::PathwayRepository;
pub use router::pathway_router;
pub use rules::{parse_lower_bound, rank_pathways, score_pathways};
pub use service::{CalculateRequest, PathwayCalculation, PathwayService};
