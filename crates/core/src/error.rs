use thiserror::Error;
use types::{Day, EntryId, GroupId, RoomId, SubjectId, TeacherId};

/// Rejected input. Nothing has been written when one of these is returned.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("group {0} not found")]
    UnknownGroup(GroupId),
    #[error("subject {0} not found")]
    UnknownSubject(SubjectId),
    #[error("teacher {0} not found")]
    UnknownTeacher(TeacherId),
    #[error("room {0} not found")]
    UnknownRoom(RoomId),
    #[error("unknown day: {0}")]
    UnknownDay(String),
    #[error("lesson {lesson} does not exist on {day}")]
    InvalidLesson { day: Day, lesson: u8 },
    #[error("lesson 0 is reserved for \"{expected}\", got \"{subject}\"")]
    ZeroLessonReserved { subject: String, expected: String },
    #[error("semester must be 1 or 2, got {0}")]
    InvalidSemester(u8),
    #[error("week {0} is the last representable week")]
    WeekOverflow(u32),
    #[error("invalid catalog: {0}")]
    Msg(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: u32 },
    #[error("{entity} references missing {target} {id}")]
    DanglingReference {
        entity: &'static str,
        target: &'static str,
        id: u32,
    },
    #[error("duplicate {entity}: {key}")]
    Duplicate { entity: &'static str, key: String },
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("schedule conflict: {0}")]
    Conflict(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl EngineError {
    pub fn missing_entry(id: EntryId) -> Self {
        EngineError::Store(StoreError::NotFound {
            entity: "schedule entry",
            id: id.0,
        })
    }
}
