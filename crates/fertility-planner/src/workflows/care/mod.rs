//! Patient-kept care records: remote-care sessions with roster doctors, a
//! personalized dated timeline, and a numbered story board.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    CareMode, CareSessions, ChapterRequest, PersonalizedTimeline, PersonalizedTimelineItem,
    PlanRequest, RemoteCareSession, SessionRequest, SessionStatus, StoryBoard, StoryChapter,
    TimelineItemRequest,
};
pub use repository::CareRepository;
pub use router::care_router;
pub use service::CareService;
