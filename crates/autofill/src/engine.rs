use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, info, warn};

use sched_core::conflict::{clashes_in, find_free_room, Candidate};
use sched_core::report::find_conflicts;
use sched_core::timeslot::{available_pairs, lessons_in_pair, ZERO_LESSON_SUBJECT};
use sched_core::{EngineError, ScheduleStore, StoreError, ValidationError};
use types::{
    Day, EntryDraft, FillRequest, FillSummary, Group, GroupId, GroupPractice, RoomId, SubjectId,
    TeacherId, WeekParity,
};

use crate::AutoFillConfig;

/// One two-hour lesson still to be placed.
#[derive(Clone, Debug)]
struct Block {
    subject: SubjectId,
    subject_name: String,
    teacher: Option<TeacherId>,
}

fn blocks_of<S: ScheduleStore + ?Sized>(store: &S, group: GroupId) -> Vec<Block> {
    let mut out = Vec::new();
    for gs in store.group_subjects_of(group) {
        let subject_name = store
            .subject(gs.subject_id)
            .map(|s| s.name)
            .unwrap_or_default();
        for _ in 0..gs.blocks_per_week() {
            out.push(Block {
                subject: gs.subject_id,
                subject_name: subject_name.clone(),
                teacher: gs.teacher_id,
            });
        }
    }
    out
}

struct Slot {
    group: GroupId,
    subject: SubjectId,
    teacher: TeacherId,
    room: RoomId,
    day: Day,
    lesson: u8,
}

impl Slot {
    fn candidate(&self, req: &FillRequest) -> Candidate {
        Candidate {
            group: self.group,
            teacher: Some(self.teacher),
            room: Some(self.room),
            day: self.day,
            lesson: self.lesson,
            week: req.week,
            semester: req.semester,
            parity: WeekParity::Both,
            ignore: None,
        }
    }
}

/// Writes the slot to every layer the fill targets. Main entries apply to
/// both parities; Current entries start unchanged.
fn commit<S: ScheduleStore + ?Sized>(
    store: &mut S,
    req: &FillRequest,
    slot: &Slot,
) -> Result<(), StoreError> {
    let draft = EntryDraft {
        group_id: slot.group,
        subject_id: slot.subject,
        teacher_id: slot.teacher,
        room_id: slot.room,
        day: slot.day,
        lesson_number: slot.lesson,
        semester: req.semester,
        week_parity: WeekParity::Both,
    };
    if req.fill_type.touches_main() {
        store.insert_main(draft.clone())?;
    }
    if req.fill_type.touches_current() {
        store.insert_current(draft, req.week, false)?;
    }
    Ok(())
}

/// Fills the first pairs of the practice day wherever the slot is free.
/// Returns the number of lessons placed.
fn place_practice<S: ScheduleStore + ?Sized>(
    store: &mut S,
    req: &FillRequest,
    group: &Group,
    practice: &GroupPractice,
) -> Result<u32, StoreError> {
    let (Some(day), Some(subject), Some(teacher), Some(room)) = (
        practice.parsed_day(),
        practice.subject_id,
        practice.teacher_id,
        practice.room_id,
    ) else {
        warn!(group = %group.name, day = %practice.day, "practice skipped: incomplete");
        return Ok(0);
    };

    let last_pair = if group.course >= 2 { 4 } else { 2 };
    let mut added = 0;
    for pair in 1..=last_pair {
        for &lesson in lessons_in_pair(day, pair) {
            let slot = Slot {
                group: group.id,
                subject,
                teacher,
                room,
                day,
                lesson,
            };
            if clashes_in(store, req.fill_type, &slot.candidate(req)) {
                continue;
            }
            commit(store, req, &slot)?;
            added += 1;
        }
    }
    debug!(group = %group.name, %day, added, "practice placed");
    Ok(added)
}

/// Tries to place one block, moving the group's day cursor on every attempt.
fn place_block<S: ScheduleStore + ?Sized, R: Rng + ?Sized>(
    store: &mut S,
    req: &FillRequest,
    max_attempts: u32,
    group: &Group,
    block: &Block,
    practice_day: Option<Day>,
    cursor: &mut usize,
    rng: &mut R,
) -> Result<bool, StoreError> {
    for _ in 0..max_attempts {
        let day = Day::ALL[*cursor % Day::ALL.len()];
        *cursor += 1;
        if practice_day == Some(day) {
            continue;
        }

        let lesson = if day.has_zero_lesson() && block.subject_name == ZERO_LESSON_SUBJECT {
            0
        } else {
            let Some(&pair) = available_pairs(day).choose(rng) else {
                continue;
            };
            // pair 0 belongs to the zero-lesson subject only
            if pair == 0 {
                continue;
            }
            let Some(&lesson) = lessons_in_pair(day, pair).choose(rng) else {
                continue;
            };
            lesson
        };

        let Some(room) = find_free_room(store, day, lesson, req.week, req.semester, req.fill_type)
        else {
            continue;
        };
        let Some(teacher) = block.teacher else {
            continue;
        };
        let slot = Slot {
            group: group.id,
            subject: block.subject,
            teacher,
            room: room.id,
            day,
            lesson,
        };
        if clashes_in(store, req.fill_type, &slot.candidate(req)) {
            continue;
        }
        commit(store, req, &slot)?;
        debug!(group = %group.name, subject = %block.subject_name, %day, lesson, room = %room.name, "lesson placed");
        return Ok(true);
    }
    Ok(false)
}

/// Rebuilds the layers selected by `req.fill_type` for (`req.week`,
/// `req.semester`) from the teaching requirements, then appends a log row.
///
/// Existing entries of the targeted layers are deleted first. Run it inside
/// a transaction so an error leaves them in place.
pub fn auto_fill<S: ScheduleStore + ?Sized, R: Rng + ?Sized>(
    store: &mut S,
    req: &FillRequest,
    config: &AutoFillConfig,
    rng: &mut R,
) -> Result<FillSummary, EngineError> {
    if !matches!(req.semester, 1 | 2) {
        return Err(ValidationError::InvalidSemester(req.semester).into());
    }
    if req.fill_type.touches_current() {
        store.delete_current_week(req.week, req.semester);
    }
    if req.fill_type.touches_main() {
        store.delete_main_semester(req.semester);
    }

    let mut groups = store.groups();
    groups.sort_by(|a, b| (a.course, &a.name).cmp(&(b.course, &b.name)));

    let max_attempts = config.max_attempts();
    let mut summary = FillSummary::default();
    for group in &groups {
        let mut blocks = blocks_of(store, group.id);
        blocks.shuffle(rng);

        let practice = store.practice_of(group.id);
        let mut practice_day = None;
        if let Some(p) = &practice {
            summary.entries_added += place_practice(store, req, group, p)?;
            if group.course >= 2 {
                practice_day = p.parsed_day();
            }
        }

        let mut cursor = 0usize;
        for block in &blocks {
            let placed = place_block(
                store,
                req,
                max_attempts,
                group,
                block,
                practice_day,
                &mut cursor,
                rng,
            )?;
            if placed {
                summary.entries_added += 1;
            } else {
                summary.errors += 1;
                warn!(
                    group = %group.name,
                    subject = %block.subject_name,
                    max_attempts,
                    "no free slot found"
                );
            }
        }
    }

    summary.conflicts = find_conflicts(store, req.week, req.semester).len() as u32;
    store.append_log(req.week, req.semester, req.fill_type, summary);
    info!(
        week = req.week,
        semester = req.semester,
        fill_type = req.fill_type.as_str(),
        groups = groups.len(),
        entries_added = summary.entries_added,
        conflicts = summary.conflicts,
        errors = summary.errors,
        "auto-fill finished"
    );
    Ok(summary)
}
