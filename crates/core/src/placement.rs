//! Manual edits of either layer.

use tracing::debug;

use crate::conflict::{has_conflict, Candidate};
use crate::error::{EngineError, ValidationError};
use crate::store::ScheduleStore;
use crate::timeslot::{is_valid_lesson, ZERO_LESSON_SUBJECT};
use types::{EntryDraft, EntryId, EntryPatch, Layer, NewEntry, ScheduleEntry};

/// Checks references, the lesson number and the zero-lesson policy.
pub fn validate_draft<S: ScheduleStore + ?Sized>(
    store: &S,
    d: &EntryDraft,
) -> Result<(), ValidationError> {
    if !matches!(d.semester, 1 | 2) {
        return Err(ValidationError::InvalidSemester(d.semester));
    }
    store
        .group(d.group_id)
        .ok_or(ValidationError::UnknownGroup(d.group_id))?;
    let subject = store
        .subject(d.subject_id)
        .ok_or(ValidationError::UnknownSubject(d.subject_id))?;
    store
        .teacher(d.teacher_id)
        .ok_or(ValidationError::UnknownTeacher(d.teacher_id))?;
    store
        .room(d.room_id)
        .ok_or(ValidationError::UnknownRoom(d.room_id))?;
    if !is_valid_lesson(d.day, d.lesson_number) {
        return Err(ValidationError::InvalidLesson {
            day: d.day,
            lesson: d.lesson_number,
        });
    }
    if d.lesson_number == 0 && subject.name != ZERO_LESSON_SUBJECT {
        return Err(ValidationError::ZeroLessonReserved {
            subject: subject.name,
            expected: ZERO_LESSON_SUBJECT.to_string(),
        });
    }
    Ok(())
}

fn candidate(d: &EntryDraft, week: u32, ignore: Option<EntryId>) -> Candidate {
    Candidate {
        group: d.group_id,
        teacher: Some(d.teacher_id),
        room: Some(d.room_id),
        day: d.day,
        lesson: d.lesson_number,
        week,
        semester: d.semester,
        parity: d.week_parity,
        ignore,
    }
}

fn conflict_error(layer: Layer, d: &EntryDraft) -> EngineError {
    EngineError::Conflict(format!(
        "{} lesson {} is already taken by the group, the teacher or the room in the {:?} schedule",
        d.day, d.lesson_number, layer
    ))
}

/// Adds one entry after validation and the three-way conflict check. Current
/// entries added this way are marked as changed.
pub fn place_entry<S: ScheduleStore + ?Sized>(
    store: &mut S,
    req: NewEntry,
) -> Result<EntryId, EngineError> {
    validate_draft(store, &req.draft)?;
    if has_conflict(store, req.layer, &candidate(&req.draft, req.week, None)) {
        return Err(conflict_error(req.layer, &req.draft));
    }
    let id = match req.layer {
        Layer::Current => store.insert_current(req.draft, req.week, true)?,
        Layer::Main => store.insert_main(req.draft)?,
    };
    debug!(%id, layer = ?req.layer, "entry placed");
    Ok(id)
}

/// Swaps subject, teacher or room of a Current entry and marks it changed.
pub fn update_entry<S: ScheduleStore + ?Sized>(
    store: &mut S,
    id: EntryId,
    patch: EntryPatch,
) -> Result<ScheduleEntry, EngineError> {
    let mut entry = store
        .current_entry(id)
        .ok_or_else(|| EngineError::missing_entry(id))?;
    if let Some(s) = patch.subject_id {
        entry.subject_id = s;
    }
    if let Some(t) = patch.teacher_id {
        entry.teacher_id = t;
    }
    if let Some(r) = patch.room_id {
        entry.room_id = r;
    }
    let draft = EntryDraft {
        group_id: entry.group_id,
        subject_id: entry.subject_id,
        teacher_id: entry.teacher_id,
        room_id: entry.room_id,
        day: entry.day,
        lesson_number: entry.lesson_number,
        semester: entry.semester,
        week_parity: entry.week_parity,
    };
    validate_draft(store, &draft)?;
    if has_conflict(store, Layer::Current, &candidate(&draft, entry.week_number, Some(id))) {
        return Err(conflict_error(Layer::Current, &draft));
    }
    entry.is_changed = true;
    store.update_current(entry.clone())?;
    Ok(entry)
}

pub fn delete_entry<S: ScheduleStore + ?Sized>(
    store: &mut S,
    layer: Layer,
    id: EntryId,
) -> Result<(), EngineError> {
    match layer {
        Layer::Current => store.delete_current(id)?,
        Layer::Main => store.delete_main(id)?,
    }
    Ok(())
}
