use super::domain::{PersonalizedTimelineItem, RemoteCareSession, StoryChapter};
use crate::storage::StorageError;
use crate::workflows::intake::PatientCode;

pub trait CareRepository: Send + Sync {
    fn insert_session(&self, session: &RemoteCareSession) -> Result<(), StorageError>;
    /// Earliest `scheduled_for` first.
    fn sessions(&self, code: &PatientCode) -> Result<Vec<RemoteCareSession>, StorageError>;
    fn insert_timeline_item(&self, item: &PersonalizedTimelineItem) -> Result<(), StorageError>;
    /// Earliest `target_date` first.
    fn timeline_items(&self, code: &PatientCode) -> Result<Vec<PersonalizedTimelineItem>, StorageError>;
    /// Stores the chapter under the patient's next free number and returns it.
    /// The number carried on `chapter` is ignored.
    fn append_chapter(&self, chapter: &StoryChapter) -> Result<u32, StorageError>;
    /// Chapter order.
    fn chapters(&self, code: &PatientCode) -> Result<Vec<StoryChapter>, StorageError>;
}
