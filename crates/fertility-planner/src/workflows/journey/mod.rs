//! Treatment journey tracking: a journal of manual measurements and
//! milestone status over a fixed step blueprint.

pub mod blueprint;
pub mod domain;
pub mod repository;
pub mod router;
pub mod service;


pub use blueprint::JourneyBlueprint;
pub use domain::{
    EntryRequest, JournalEntries, JourneyMilestone, JourneyProgress, ManualDataEntry,
    MilestoneStatus, MilestoneUpdate, MilestoneView, StepTemplate,
};
pub use repository::JourneyRepository;
pub use router::journey_router;
pub use service::JourneyService;
