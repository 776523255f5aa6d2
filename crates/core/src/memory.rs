use chrono::Utc;
use parking_lot::RwLock;
use std::sync::Arc;

use crate::error::StoreError;
use crate::store::{EntryFilter, ScheduleStore, Transact};
use types::{
    AutoFillLog, Catalog, EntryDraft, EntryId, FillSummary, FillType, Group, GroupId,
    GroupPractice, GroupSubject, GroupSubjectId, LogId, MainScheduleEntry, PracticeId, Room,
    RoomId, ScheduleEntry, Settings, Subject, SubjectId, Teacher, TeacherId,
};

/// All rows of the in-memory store. Cloned wholesale per transaction.
#[derive(Clone, Debug, Default)]
pub struct Tables {
    groups: Vec<Group>,
    teachers: Vec<Teacher>,
    subjects: Vec<Subject>,
    rooms: Vec<Room>,
    group_subjects: Vec<GroupSubject>,
    practices: Vec<GroupPractice>,
    current: Vec<ScheduleEntry>,
    main: Vec<MainScheduleEntry>,
    logs: Vec<AutoFillLog>,
    settings: Settings,
    next_id: u32,
}

impl Tables {
    pub fn new() -> Self {
        Self::default()
    }

    fn alloc(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    fn check_name<'a>(
        entity: &'static str,
        mut names: impl Iterator<Item = &'a str>,
        name: &str,
    ) -> Result<(), StoreError> {
        if names.any(|n| n == name) {
            return Err(StoreError::Duplicate {
                entity,
                key: name.to_string(),
            });
        }
        Ok(())
    }

    pub fn add_group(&mut self, name: &str, course: u32) -> Result<GroupId, StoreError> {
        Self::check_name("group", self.groups.iter().map(|g| g.name.as_str()), name)?;
        let id = GroupId(self.alloc());
        self.groups.push(Group {
            id,
            name: name.to_string(),
            course,
        });
        Ok(id)
    }

    pub fn add_teacher(&mut self, name: &str) -> Result<TeacherId, StoreError> {
        Self::check_name("teacher", self.teachers.iter().map(|t| t.name.as_str()), name)?;
        let id = TeacherId(self.alloc());
        self.teachers.push(Teacher {
            id,
            name: name.to_string(),
        });
        Ok(id)
    }

    pub fn add_subject(&mut self, name: &str) -> Result<SubjectId, StoreError> {
        Self::check_name("subject", self.subjects.iter().map(|s| s.name.as_str()), name)?;
        let id = SubjectId(self.alloc());
        self.subjects.push(Subject {
            id,
            name: name.to_string(),
        });
        Ok(id)
    }

    pub fn add_room(&mut self, name: &str) -> Result<RoomId, StoreError> {
        Self::check_name("room", self.rooms.iter().map(|r| r.name.as_str()), name)?;
        let id = RoomId(self.alloc());
        self.rooms.push(Room {
            id,
            name: name.to_string(),
        });
        Ok(id)
    }

    /// Creates or replaces the requirement for (group, subject).
    pub fn upsert_group_subject(
        &mut self,
        group_id: GroupId,
        subject_id: SubjectId,
        teacher_id: Option<TeacherId>,
        hours_per_week: u32,
        semester_hours: (u32, u32),
    ) -> Result<GroupSubjectId, StoreError> {
        self.require_group("group subject", group_id)?;
        self.require_subject("group subject", subject_id)?;
        if let Some(t) = teacher_id {
            self.require_teacher("group subject", t)?;
        }
        if let Some(gs) = self
            .group_subjects
            .iter_mut()
            .find(|gs| gs.group_id == group_id && gs.subject_id == subject_id)
        {
            gs.teacher_id = teacher_id;
            gs.hours_per_week = hours_per_week;
            gs.total_hours_semester1 = semester_hours.0;
            gs.total_hours_semester2 = semester_hours.1;
            return Ok(gs.id);
        }
        let id = GroupSubjectId(self.alloc());
        self.group_subjects.push(GroupSubject {
            id,
            group_id,
            subject_id,
            teacher_id,
            hours_per_week,
            total_hours_semester1: semester_hours.0,
            total_hours_semester2: semester_hours.1,
        });
        Ok(id)
    }

    pub fn delete_group_subject(&mut self, id: GroupSubjectId) -> Result<(), StoreError> {
        let before = self.group_subjects.len();
        self.group_subjects.retain(|gs| gs.id != id);
        if self.group_subjects.len() == before {
            return Err(StoreError::NotFound {
                entity: "group subject",
                id: id.0,
            });
        }
        Ok(())
    }

    /// Creates or replaces the practice of a group; at most one per group.
    pub fn set_practice(
        &mut self,
        group_id: GroupId,
        day: &str,
        subject_id: Option<SubjectId>,
        teacher_id: Option<TeacherId>,
        room_id: Option<RoomId>,
    ) -> Result<PracticeId, StoreError> {
        self.require_group("practice", group_id)?;
        if let Some(s) = subject_id {
            self.require_subject("practice", s)?;
        }
        if let Some(t) = teacher_id {
            self.require_teacher("practice", t)?;
        }
        if let Some(r) = room_id {
            self.require_room("practice", r)?;
        }
        let existing = self.practices.iter().position(|p| p.group_id == group_id);
        let id = match existing {
            Some(i) => self.practices.remove(i).id,
            None => PracticeId(self.alloc()),
        };
        self.practices.push(GroupPractice {
            id,
            group_id,
            day: day.to_string(),
            subject_id,
            teacher_id,
            room_id,
        });
        Ok(id)
    }

    pub fn delete_practice(&mut self, group_id: GroupId) -> Result<(), StoreError> {
        let before = self.practices.len();
        self.practices.retain(|p| p.group_id != group_id);
        if self.practices.len() == before {
            return Err(StoreError::NotFound {
                entity: "practice of group",
                id: group_id.0,
            });
        }
        Ok(())
    }

    /// Replaces reference data and requirements with `catalog`. Both schedule
    /// layers are cleared since their references may no longer resolve.
    /// Settings and the auto-fill log are kept.
    pub fn load_catalog(&mut self, catalog: &Catalog) {
        self.groups = catalog.groups.clone();
        self.teachers = catalog.teachers.clone();
        self.subjects = catalog.subjects.clone();
        self.rooms = catalog.rooms.clone();
        self.group_subjects = catalog.group_subjects.clone();
        self.practices = catalog.practices.clone();
        self.current.clear();
        self.main.clear();

        let max_id = catalog
            .groups
            .iter()
            .map(|x| x.id.0)
            .chain(catalog.teachers.iter().map(|x| x.id.0))
            .chain(catalog.subjects.iter().map(|x| x.id.0))
            .chain(catalog.rooms.iter().map(|x| x.id.0))
            .chain(catalog.group_subjects.iter().map(|x| x.id.0))
            .chain(catalog.practices.iter().map(|x| x.id.0))
            .max()
            .unwrap_or(0);
        self.next_id = self.next_id.max(max_id);
    }

    pub fn catalog(&self) -> Catalog {
        Catalog {
            groups: self.groups.clone(),
            teachers: self.teachers.clone(),
            subjects: self.subjects.clone(),
            rooms: self.rooms.clone(),
            group_subjects: self.group_subjects.clone(),
            practices: self.practices.clone(),
        }
    }

    fn require_group(&self, entity: &'static str, id: GroupId) -> Result<(), StoreError> {
        if self.groups.iter().any(|g| g.id == id) {
            Ok(())
        } else {
            Err(StoreError::DanglingReference {
                entity,
                target: "group",
                id: id.0,
            })
        }
    }

    fn require_subject(&self, entity: &'static str, id: SubjectId) -> Result<(), StoreError> {
        if self.subjects.iter().any(|s| s.id == id) {
            Ok(())
        } else {
            Err(StoreError::DanglingReference {
                entity,
                target: "subject",
                id: id.0,
            })
        }
    }

    fn require_teacher(&self, entity: &'static str, id: TeacherId) -> Result<(), StoreError> {
        if self.teachers.iter().any(|t| t.id == id) {
            Ok(())
        } else {
            Err(StoreError::DanglingReference {
                entity,
                target: "teacher",
                id: id.0,
            })
        }
    }

    fn require_room(&self, entity: &'static str, id: RoomId) -> Result<(), StoreError> {
        if self.rooms.iter().any(|r| r.id == id) {
            Ok(())
        } else {
            Err(StoreError::DanglingReference {
                entity,
                target: "room",
                id: id.0,
            })
        }
    }

    fn require_refs(&self, entity: &'static str, d: &EntryDraft) -> Result<(), StoreError> {
        self.require_group(entity, d.group_id)?;
        self.require_subject(entity, d.subject_id)?;
        self.require_teacher(entity, d.teacher_id)?;
        self.require_room(entity, d.room_id)
    }
}

impl ScheduleStore for Tables {
    fn groups(&self) -> Vec<Group> {
        self.groups.clone()
    }

    fn teachers(&self) -> Vec<Teacher> {
        self.teachers.clone()
    }

    fn subjects(&self) -> Vec<Subject> {
        self.subjects.clone()
    }

    fn rooms(&self) -> Vec<Room> {
        self.rooms.clone()
    }

    fn group(&self, id: GroupId) -> Option<Group> {
        self.groups.iter().find(|g| g.id == id).cloned()
    }

    fn teacher(&self, id: TeacherId) -> Option<Teacher> {
        self.teachers.iter().find(|t| t.id == id).cloned()
    }

    fn subject(&self, id: SubjectId) -> Option<Subject> {
        self.subjects.iter().find(|s| s.id == id).cloned()
    }

    fn room(&self, id: RoomId) -> Option<Room> {
        self.rooms.iter().find(|r| r.id == id).cloned()
    }

    fn group_subjects(&self) -> Vec<GroupSubject> {
        self.group_subjects.clone()
    }

    fn practice_of(&self, group: GroupId) -> Option<GroupPractice> {
        self.practices.iter().find(|p| p.group_id == group).cloned()
    }

    fn current_entries(&self, filter: &EntryFilter) -> Vec<ScheduleEntry> {
        self.current
            .iter()
            .filter(|e| filter.matches_current(e))
            .cloned()
            .collect()
    }

    fn main_entries(&self, filter: &EntryFilter) -> Vec<MainScheduleEntry> {
        self.main
            .iter()
            .filter(|e| filter.matches_main(e))
            .cloned()
            .collect()
    }

    fn current_entry(&self, id: EntryId) -> Option<ScheduleEntry> {
        self.current.iter().find(|e| e.id == id).cloned()
    }

    fn insert_current(
        &mut self,
        draft: EntryDraft,
        week: u32,
        is_changed: bool,
    ) -> Result<EntryId, StoreError> {
        self.require_refs("schedule entry", &draft)?;
        let id = EntryId(self.alloc());
        self.current.push(ScheduleEntry {
            id,
            group_id: draft.group_id,
            subject_id: draft.subject_id,
            teacher_id: draft.teacher_id,
            room_id: draft.room_id,
            day: draft.day,
            lesson_number: draft.lesson_number,
            week_number: week,
            week_parity: draft.week_parity,
            semester: draft.semester,
            is_changed,
            created_at: Utc::now(),
        });
        Ok(id)
    }

    fn insert_main(&mut self, draft: EntryDraft) -> Result<EntryId, StoreError> {
        self.require_refs("main schedule entry", &draft)?;
        let id = EntryId(self.alloc());
        self.main.push(MainScheduleEntry {
            id,
            group_id: draft.group_id,
            subject_id: draft.subject_id,
            teacher_id: draft.teacher_id,
            room_id: draft.room_id,
            day: draft.day,
            lesson_number: draft.lesson_number,
            week_parity: draft.week_parity,
            semester: draft.semester,
            created_at: Utc::now(),
        });
        Ok(id)
    }

    fn update_current(&mut self, entry: ScheduleEntry) -> Result<(), StoreError> {
        self.require_subject("schedule entry", entry.subject_id)?;
        self.require_teacher("schedule entry", entry.teacher_id)?;
        self.require_room("schedule entry", entry.room_id)?;
        let slot = self
            .current
            .iter_mut()
            .find(|e| e.id == entry.id)
            .ok_or(StoreError::NotFound {
                entity: "schedule entry",
                id: entry.id.0,
            })?;
        *slot = entry;
        Ok(())
    }

    fn delete_current(&mut self, id: EntryId) -> Result<(), StoreError> {
        let before = self.current.len();
        self.current.retain(|e| e.id != id);
        if self.current.len() == before {
            return Err(StoreError::NotFound {
                entity: "schedule entry",
                id: id.0,
            });
        }
        Ok(())
    }

    fn delete_main(&mut self, id: EntryId) -> Result<(), StoreError> {
        let before = self.main.len();
        self.main.retain(|e| e.id != id);
        if self.main.len() == before {
            return Err(StoreError::NotFound {
                entity: "main schedule entry",
                id: id.0,
            });
        }
        Ok(())
    }

    fn delete_current_week(&mut self, week: u32, semester: u8) -> usize {
        let before = self.current.len();
        self.current
            .retain(|e| !(e.week_number == week && e.semester == semester));
        before - self.current.len()
    }

    fn delete_current_semester(&mut self, semester: u8) -> usize {
        let before = self.current.len();
        self.current.retain(|e| e.semester != semester);
        before - self.current.len()
    }

    fn delete_main_semester(&mut self, semester: u8) -> usize {
        let before = self.main.len();
        self.main.retain(|e| e.semester != semester);
        before - self.main.len()
    }

    fn append_log(
        &mut self,
        week: u32,
        semester: u8,
        fill_type: FillType,
        summary: FillSummary,
    ) -> AutoFillLog {
        let log = AutoFillLog {
            id: LogId(self.alloc()),
            week_number: week,
            semester,
            fill_type,
            entries_added: summary.entries_added,
            conflicts: summary.conflicts,
            errors: summary.errors,
            created_at: Utc::now(),
        };
        self.logs.push(log.clone());
        log
    }

    fn recent_logs(&self, limit: usize) -> Vec<AutoFillLog> {
        self.logs.iter().rev().take(limit).cloned().collect()
    }

    fn settings(&self) -> Settings {
        self.settings
    }

    fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
    }
}

/// Shared handle to an in-memory [`Tables`].
#[derive(Clone, Default)]
pub struct MemStore {
    inner: Arc<RwLock<Tables>>,
}

impl MemStore {
    pub fn new(tables: Tables) -> Self {
        Self {
            inner: Arc::new(RwLock::new(tables)),
        }
    }
}

impl Transact for MemStore {
    type Tx = Tables;

    fn transaction<T, E>(&self, f: impl FnOnce(&mut Tables) -> Result<T, E>) -> Result<T, E> {
        let mut guard = self.inner.write();
        let mut work = guard.clone();
        let out = f(&mut work)?;
        *guard = work;
        Ok(out)
    }

    fn read<T>(&self, f: impl FnOnce(&Tables) -> T) -> T {
        f(&self.inner.read())
    }
}
