use std::sync::Arc;

use chrono::{Days, Utc};
use tracing::info;
use uuid::Uuid;

use super::domain::{
    CareSessions, ChapterRequest, PersonalizedTimeline, PersonalizedTimelineItem, PlanRequest,
    RemoteCareSession, SessionRequest, SessionStatus, StoryBoard, StoryChapter,
    TimelineItemRequest,
};
use super::repository::CareRepository;
use crate::workflows::doctors::{standard_roster, DoctorRecord};
use crate::workflows::intake::{PatientCode, PatientRepository};
use crate::workflows::journey::JourneyBlueprint;
use crate::workflows::response::PlannerError;
use crate::workflows::timeline::{
    record_quietly, TimelineEvent, TimelineEventKind, TimelineRepository,
};

/// Remote-care sessions, the personalized timeline and the story board.
pub struct CareService<R> {
    repository: Arc<R>,
    roster: Vec<DoctorRecord>,
    blueprint: JourneyBlueprint,
}

impl<R> CareService<R>
where
    R: PatientRepository + CareRepository + TimelineRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self {
            repository,
            roster: standard_roster(),
            blueprint: JourneyBlueprint::standard(),
        }
    }

    /// Book a session. A supplied `doctorId` must name a roster doctor.
    pub fn schedule_session(
        &self,
        code: &PatientCode,
        request: SessionRequest,
    ) -> Result<RemoteCareSession, PlannerError> {
        let scheduled_for = request
            .scheduled_for
            .ok_or(PlannerError::MissingFields(vec!["scheduledFor"]))?;
        let doctor = match non_blank(request.doctor_id) {
            Some(id) => Some(
                self.roster
                    .iter()
                    .find(|doctor| doctor.id == id)
                    .ok_or_else(|| PlannerError::not_found("doctor", id.as_str()))?,
            ),
            None => None,
        };
        self.require_patient(code)?;

        let session = RemoteCareSession {
            id: Uuid::new_v4().to_string(),
            patient_code: code.clone(),
            doctor_id: doctor.map(|doctor| doctor.id.clone()),
            mode: request.mode.unwrap_or_default(),
            status: request.status.unwrap_or_default(),
            scheduled_for,
            notes: non_blank(request.notes),
            created_at: Utc::now(),
        };
        self.repository.insert_session(&session)?;
        info!(
            patient_code = %code,
            mode = session.mode.as_str(),
            status = session.status.as_str(),
            "remote care session stored"
        );

        if session.status == SessionStatus::Scheduled {
            record_quietly(
                self.repository.as_ref(),
                TimelineEvent::new(
                    code.clone(),
                    TimelineEventKind::CareSessionScheduled,
                    format!("Remote {} session scheduled", session.mode.as_str()),
                    Some(match doctor {
                        Some(doctor) => format!("{} on {}", doctor.name, session.scheduled_for.date_naive()),
                        None => session.scheduled_for.date_naive().to_string(),
                    }),
                ),
            );
        }

        Ok(session)
    }

    pub fn sessions(&self, code: &PatientCode) -> Result<CareSessions, PlannerError> {
        self.require_patient(code)?;
        Ok(CareSessions {
            patient_code: code.clone(),
            sessions: self.repository.sessions(code)?,
        })
    }

    /// Add one dated item. A supplied `stepKey` must be a journey step.
    pub fn add_timeline_item(
        &self,
        code: &PatientCode,
        request: TimelineItemRequest,
    ) -> Result<PersonalizedTimelineItem, PlannerError> {
        let title = non_blank(request.title);
        let mut missing = Vec::new();
        if title.is_none() {
            missing.push("title");
        }
        if request.target_date.is_none() {
            missing.push("targetDate");
        }
        let (Some(title), Some(target_date)) = (title, request.target_date) else {
            return Err(PlannerError::MissingFields(missing));
        };

        let step_key = match non_blank(request.step_key) {
            Some(key) => Some(
                self.blueprint
                    .step(&key)
                    .map(|step| step.key.to_string())
                    .ok_or_else(|| PlannerError::InvalidInput(format!("unknown journey step '{key}'")))?,
            ),
            None => None,
        };
        self.require_patient(code)?;

        let item = PersonalizedTimelineItem {
            id: Uuid::new_v4().to_string(),
            patient_code: code.clone(),
            step_key,
            title,
            description: non_blank(request.description),
            target_date,
            created_at: Utc::now(),
        };
        self.repository.insert_timeline_item(&item)?;
        info!(patient_code = %code, target_date = %item.target_date, "timeline item stored");
        Ok(item)
    }

    /// Lay the journey steps out from `startDate`, each one starting when the
    /// previous step's typical duration ends. Steps already on the timeline
    /// are left alone, so planning twice adds nothing.
    pub fn plan_timeline(
        &self,
        code: &PatientCode,
        request: PlanRequest,
    ) -> Result<PersonalizedTimeline, PlannerError> {
        self.require_patient(code)?;
        let start = request.start_date.unwrap_or_else(|| Utc::now().date_naive());
        let existing = self.repository.timeline_items(code)?;

        let mut offset_days: u64 = 0;
        let mut added = 0usize;
        for step in self.blueprint.steps() {
            let target_date = start
                .checked_add_days(Days::new(offset_days))
                .ok_or_else(|| PlannerError::InvalidInput(format!("start date {start} is out of range")))?;
            offset_days += u64::from(step.typical_days);

            if existing
                .iter()
                .any(|item| item.step_key.as_deref() == Some(step.key))
            {
                continue;
            }
            self.repository.insert_timeline_item(&PersonalizedTimelineItem {
                id: Uuid::new_v4().to_string(),
                patient_code: code.clone(),
                step_key: Some(step.key.to_string()),
                title: step.label.to_string(),
                description: step.guidance.first().map(|line| line.to_string()),
                target_date,
                created_at: Utc::now(),
            })?;
            added += 1;
        }
        info!(patient_code = %code, %start, added, "timeline planned from journey");

        self.timeline(code)
    }

    pub fn timeline(&self, code: &PatientCode) -> Result<PersonalizedTimeline, PlannerError> {
        self.require_patient(code)?;
        Ok(PersonalizedTimeline {
            patient_code: code.clone(),
            items: self.repository.timeline_items(code)?,
        })
    }

    /// Append the next numbered chapter.
    pub fn add_chapter(
        &self,
        code: &PatientCode,
        request: ChapterRequest,
    ) -> Result<StoryChapter, PlannerError> {
        let title = non_blank(request.title);
        let body = non_blank(request.body);
        let mut missing = Vec::new();
        if title.is_none() {
            missing.push("title");
        }
        if body.is_none() {
            missing.push("body");
        }
        let (Some(title), Some(body)) = (title, body) else {
            return Err(PlannerError::MissingFields(missing));
        };
        self.require_patient(code)?;

        let mut chapter = StoryChapter {
            id: Uuid::new_v4().to_string(),
            patient_code: code.clone(),
            chapter: 0,
            title,
            body,
            mood: non_blank(request.mood),
            created_at: Utc::now(),
        };
        chapter.chapter = self.repository.append_chapter(&chapter)?;
        info!(patient_code = %code, chapter = chapter.chapter, "story chapter stored");

        record_quietly(
            self.repository.as_ref(),
            TimelineEvent::new(
                code.clone(),
                TimelineEventKind::StoryChapterAdded,
                format!("Chapter {}: {}", chapter.chapter, chapter.title),
                chapter.mood.clone(),
            ),
        );

        Ok(chapter)
    }

    pub fn story(&self, code: &PatientCode) -> Result<StoryBoard, PlannerError> {
        self.require_patient(code)?;
        Ok(StoryBoard {
            patient_code: code.clone(),
            chapters: self.repository.chapters(code)?,
        })
    }

    fn require_patient(&self, code: &PatientCode) -> Result<(), PlannerError> {
        match self.repository.fetch_patient(code)? {
            Some(_) => Ok(()),
            None => Err(PlannerError::not_found("patient", code.as_str())),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
