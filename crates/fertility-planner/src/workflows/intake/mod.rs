//! Multi-phase patient intake.
//!
//! The wizard's phase and profile live server-side as an [`IntakeSession`] so
//! a client can resume from any device with only the patient code.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    IntakePhase, IntakeRequest, IntakeSession, PatientCode, PatientProfile, PatientRecord,
};
pub use repository::PatientRepository;
pub use router::intake_router;
pub use service::IntakeService;
