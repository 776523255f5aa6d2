//! Persistence seam of the engine.
//!
//! The engine only talks to [`ScheduleStore`]; atomic multi-step operations
//! go through [`Transact`], which hands out a working copy and keeps it only
//! when the closure returns `Ok`.

use crate::error::StoreError;
use types::{
    AutoFillLog, Day, EntryDraft, EntryId, FillType, FillSummary, Group, GroupId, GroupPractice,
    GroupSubject, MainScheduleEntry, Room, RoomId, ScheduleEntry, Settings, Subject, SubjectId,
    Teacher, TeacherId, WeekParity,
};

/// Conjunction of optional predicates over schedule entries. `week` only
/// applies to the Current layer; `parity` only to the Main layer, where it
/// matches any overlapping parity.
#[derive(Clone, Debug, Default)]
pub struct EntryFilter {
    pub semester: Option<u8>,
    pub week: Option<u32>,
    pub parity: Option<WeekParity>,
    pub day: Option<Day>,
    pub lesson: Option<u8>,
    pub group: Option<GroupId>,
    pub teacher: Option<TeacherId>,
    pub room: Option<RoomId>,
}

impl EntryFilter {
    pub fn semester(semester: u8) -> Self {
        Self {
            semester: Some(semester),
            ..Self::default()
        }
    }

    pub fn week(mut self, week: u32) -> Self {
        self.week = Some(week);
        self
    }

    pub fn parity(mut self, parity: WeekParity) -> Self {
        self.parity = Some(parity);
        self
    }

    pub fn slot(mut self, day: Day, lesson: u8) -> Self {
        self.day = Some(day);
        self.lesson = Some(lesson);
        self
    }

    pub fn day(mut self, day: Day) -> Self {
        self.day = Some(day);
        self
    }

    pub fn group(mut self, group: GroupId) -> Self {
        self.group = Some(group);
        self
    }

    pub fn teacher(mut self, teacher: TeacherId) -> Self {
        self.teacher = Some(teacher);
        self
    }

    pub fn room(mut self, room: RoomId) -> Self {
        self.room = Some(room);
        self
    }

    fn common(
        &self,
        semester: u8,
        day: Day,
        lesson: u8,
        group: GroupId,
        teacher: TeacherId,
        room: RoomId,
    ) -> bool {
        self.semester.map_or(true, |s| s == semester)
            && self.day.map_or(true, |d| d == day)
            && self.lesson.map_or(true, |l| l == lesson)
            && self.group.map_or(true, |g| g == group)
            && self.teacher.map_or(true, |t| t == teacher)
            && self.room.map_or(true, |r| r == room)
    }

    pub fn matches_current(&self, e: &ScheduleEntry) -> bool {
        self.week.map_or(true, |w| w == e.week_number)
            && self.common(
                e.semester,
                e.day,
                e.lesson_number,
                e.group_id,
                e.teacher_id,
                e.room_id,
            )
    }

    pub fn matches_main(&self, e: &MainScheduleEntry) -> bool {
        self.parity.map_or(true, |p| p.overlaps(e.week_parity))
            && self.common(
                e.semester,
                e.day,
                e.lesson_number,
                e.group_id,
                e.teacher_id,
                e.room_id,
            )
    }
}

pub trait ScheduleStore {
    fn groups(&self) -> Vec<Group>;
    fn teachers(&self) -> Vec<Teacher>;
    fn subjects(&self) -> Vec<Subject>;
    /// Rooms in insertion order; the room finder depends on it.
    fn rooms(&self) -> Vec<Room>;

    fn group(&self, id: GroupId) -> Option<Group>;
    fn teacher(&self, id: TeacherId) -> Option<Teacher>;
    fn subject(&self, id: SubjectId) -> Option<Subject>;
    fn room(&self, id: RoomId) -> Option<Room>;

    fn group_subjects(&self) -> Vec<GroupSubject>;
    fn group_subjects_of(&self, group: GroupId) -> Vec<GroupSubject> {
        self.group_subjects()
            .into_iter()
            .filter(|gs| gs.group_id == group)
            .collect()
    }
    fn practice_of(&self, group: GroupId) -> Option<GroupPractice>;

    fn current_entries(&self, filter: &EntryFilter) -> Vec<ScheduleEntry>;
    fn main_entries(&self, filter: &EntryFilter) -> Vec<MainScheduleEntry>;
    fn current_entry(&self, id: EntryId) -> Option<ScheduleEntry>;

    fn insert_current(
        &mut self,
        draft: EntryDraft,
        week: u32,
        is_changed: bool,
    ) -> Result<EntryId, StoreError>;
    fn insert_main(&mut self, draft: EntryDraft) -> Result<EntryId, StoreError>;
    fn update_current(&mut self, entry: ScheduleEntry) -> Result<(), StoreError>;
    fn delete_current(&mut self, id: EntryId) -> Result<(), StoreError>;
    fn delete_main(&mut self, id: EntryId) -> Result<(), StoreError>;

    fn delete_current_week(&mut self, week: u32, semester: u8) -> usize;
    fn delete_current_semester(&mut self, semester: u8) -> usize;
    fn delete_main_semester(&mut self, semester: u8) -> usize;

    fn append_log(
        &mut self,
        week: u32,
        semester: u8,
        fill_type: FillType,
        summary: FillSummary,
    ) -> AutoFillLog;
    /// Newest first.
    fn recent_logs(&self, limit: usize) -> Vec<AutoFillLog>;

    fn settings(&self) -> Settings;
    fn set_settings(&mut self, settings: Settings);
}

/// A store that can run a closure atomically.
pub trait Transact: Send + Sync + 'static {
    type Tx: ScheduleStore;

    /// Runs `f` on a working copy; the copy replaces the store only when `f`
    /// returns `Ok`. Transactions are serialized.
    fn transaction<T, E>(&self, f: impl FnOnce(&mut Self::Tx) -> Result<T, E>) -> Result<T, E>;

    fn read<T>(&self, f: impl FnOnce(&Self::Tx) -> T) -> T;
}
