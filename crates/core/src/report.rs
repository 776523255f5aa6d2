use std::collections::{BTreeMap, HashMap};

use crate::store::{EntryFilter, ScheduleStore};
use types::{Conflict, ConflictKind, Day, ScheduleEntry};

/// Id to display name lookups, resolved once per report.
pub(crate) struct Names {
    groups: HashMap<u32, String>,
    teachers: HashMap<u32, String>,
    subjects: HashMap<u32, String>,
    rooms: HashMap<u32, String>,
}

impl Names {
    pub(crate) fn load<S: ScheduleStore + ?Sized>(store: &S) -> Self {
        Self {
            groups: store.groups().into_iter().map(|g| (g.id.0, g.name)).collect(),
            teachers: store.teachers().into_iter().map(|t| (t.id.0, t.name)).collect(),
            subjects: store.subjects().into_iter().map(|s| (s.id.0, s.name)).collect(),
            rooms: store.rooms().into_iter().map(|r| (r.id.0, r.name)).collect(),
        }
    }

    fn get(map: &HashMap<u32, String>, id: u32) -> String {
        map.get(&id).cloned().unwrap_or_else(|| format!("#{id}"))
    }

    pub(crate) fn group(&self, id: u32) -> String {
        Self::get(&self.groups, id)
    }

    pub(crate) fn teacher(&self, id: u32) -> String {
        Self::get(&self.teachers, id)
    }

    pub(crate) fn subject(&self, id: u32) -> String {
        Self::get(&self.subjects, id)
    }

    pub(crate) fn room(&self, id: u32) -> String {
        Self::get(&self.rooms, id)
    }
}

type SlotKey = (Day, u8, u32);

fn bucket<'a>(
    entries: &'a [ScheduleEntry],
    key: impl Fn(&ScheduleEntry) -> u32,
) -> BTreeMap<SlotKey, Vec<&'a ScheduleEntry>> {
    let mut out: BTreeMap<SlotKey, Vec<&ScheduleEntry>> = BTreeMap::new();
    for e in entries {
        out.entry((e.day, e.lesson_number, key(e))).or_default().push(e);
    }
    out
}

/// Double-bookings in the Current layer for one week. Teacher conflicts come
/// first, then group, then room conflicts; each block is ordered by day,
/// lesson and resource id. One clashing pair of entries may show up in
/// several blocks.
pub fn find_conflicts<S: ScheduleStore + ?Sized>(store: &S, week: u32, semester: u8) -> Vec<Conflict> {
    let entries = store.current_entries(&EntryFilter::semester(semester).week(week));
    let names = Names::load(store);
    let mut conflicts = Vec::new();

    for ((day, lesson, teacher), list) in bucket(&entries, |e| e.teacher_id.0) {
        if list.len() < 2 {
            continue;
        }
        let teacher = names.teacher(teacher);
        let groups: Vec<String> = list.iter().map(|e| names.group(e.group_id.0)).collect();
        conflicts.push(Conflict {
            kind: ConflictKind::TeacherConflict,
            day,
            lesson_number: lesson,
            message: format!(
                "Teacher {teacher} teaches several groups at once: {}",
                groups.join(", ")
            ),
            resource: teacher,
            names: groups,
        });
    }

    for ((day, lesson, group), list) in bucket(&entries, |e| e.group_id.0) {
        if list.len() < 2 {
            continue;
        }
        let group = names.group(group);
        let subjects: Vec<String> = list.iter().map(|e| names.subject(e.subject_id.0)).collect();
        conflicts.push(Conflict {
            kind: ConflictKind::GroupConflict,
            day,
            lesson_number: lesson,
            message: format!("Group {group} has {} lessons at once", list.len()),
            resource: group,
            names: subjects,
        });
    }

    for ((day, lesson, room), list) in bucket(&entries, |e| e.room_id.0) {
        if list.len() < 2 {
            continue;
        }
        let room = names.room(room);
        let groups: Vec<String> = list.iter().map(|e| names.group(e.group_id.0)).collect();
        conflicts.push(Conflict {
            kind: ConflictKind::RoomConflict,
            day,
            lesson_number: lesson,
            message: format!("Room {room} is taken by {} groups at once", list.len()),
            resource: room,
            names: groups,
        });
    }

    conflicts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::Tables;
    use types::{EntryDraft, WeekParity};

    #[test]
    fn clean_week_reports_nothing() {
        let mut t = Tables::new();
        let g1 = t.add_group("101", 1).unwrap();
        let g2 = t.add_group("102", 1).unwrap();
        let s = t.add_subject("Math").unwrap();
        let t1 = t.add_teacher("T1").unwrap();
        let t2 = t.add_teacher("T2").unwrap();
        let r1 = t.add_room("A1").unwrap();
        let r2 = t.add_room("A2").unwrap();
        let d = |g, tc, r| EntryDraft {
            group_id: g,
            subject_id: s,
            teacher_id: tc,
            room_id: r,
            day: Day::Monday,
            lesson_number: 2,
            semester: 1,
            week_parity: WeekParity::Both,
        };
        t.insert_current(d(g1, t1, r1), 1, false).unwrap();
        t.insert_current(d(g2, t2, r2), 1, false).unwrap();
        assert!(find_conflicts(&t, 1, 1).is_empty());
    }

    #[test]
    fn shared_teacher_gives_one_teacher_conflict() {
        let mut t = Tables::new();
        let g1 = t.add_group("101", 1).unwrap();
        let g2 = t.add_group("102", 1).unwrap();
        let s = t.add_subject("Math").unwrap();
        let t1 = t.add_teacher("T1").unwrap();
        let r1 = t.add_room("A1").unwrap();
        let r2 = t.add_room("A2").unwrap();
        let d = |g, r| EntryDraft {
            group_id: g,
            subject_id: s,
            teacher_id: t1,
            room_id: r,
            day: Day::Monday,
            lesson_number: 2,
            semester: 1,
            week_parity: WeekParity::Both,
        };
        t.insert_current(d(g1, r1), 1, false).unwrap();
        t.insert_current(d(g2, r2), 1, false).unwrap();
        // other week and semester are out of scope
        t.insert_current(d(g1, r1), 2, false).unwrap();

        let found = find_conflicts(&t, 1, 1);
        assert_eq!(found.len(), 1);
        let c = &found[0];
        assert_eq!(c.kind, ConflictKind::TeacherConflict);
        assert_eq!(c.resource, "T1");
        assert_eq!(c.names, vec!["101".to_string(), "102".to_string()]);
        assert_eq!((c.day, c.lesson_number), (Day::Monday, 2));
    }

    #[test]
    fn identical_entries_surface_in_all_three_kinds() {
        let mut t = Tables::new();
        let g = t.add_group("101", 1).unwrap();
        let s = t.add_subject("Math").unwrap();
        let tc = t.add_teacher("T1").unwrap();
        let r = t.add_room("A1").unwrap();
        let d = EntryDraft {
            group_id: g,
            subject_id: s,
            teacher_id: tc,
            room_id: r,
            day: Day::Friday,
            lesson_number: 5,
            semester: 2,
            week_parity: WeekParity::Both,
        };
        t.insert_current(d.clone(), 3, true).unwrap();
        t.insert_current(d, 3, false).unwrap();

        let kinds: Vec<ConflictKind> = find_conflicts(&t, 3, 2).iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ConflictKind::TeacherConflict,
                ConflictKind::GroupConflict,
                ConflictKind::RoomConflict
            ]
        );
    }
}
