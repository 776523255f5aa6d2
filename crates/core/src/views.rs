//! Display rows for the schedule tables.

use crate::report::Names;
use crate::store::{EntryFilter, ScheduleStore};
use crate::timeslot::{pair_clock_time, pair_number};
use types::{EntryView, MainScheduleEntry, ScheduleEntry};

fn row(names: &Names, e: &MainScheduleEntry, is_changed: Option<bool>) -> EntryView {
    let pair = pair_number(e.day, e.lesson_number).unwrap_or(0);
    EntryView {
        id: e.id,
        group: names.group(e.group_id.0),
        subject: names.subject(e.subject_id.0),
        teacher: names.teacher(e.teacher_id.0),
        room: names.room(e.room_id.0),
        day: e.day,
        lesson_number: e.lesson_number,
        pair,
        time: pair_clock_time(e.day, pair).to_string(),
        week_parity: e.week_parity,
        is_changed,
    }
}

fn as_main(e: &ScheduleEntry) -> MainScheduleEntry {
    MainScheduleEntry {
        id: e.id,
        group_id: e.group_id,
        subject_id: e.subject_id,
        teacher_id: e.teacher_id,
        room_id: e.room_id,
        day: e.day,
        lesson_number: e.lesson_number,
        week_parity: e.week_parity,
        semester: e.semester,
        created_at: e.created_at,
    }
}

/// Current entries matching `filter`, ordered by day, lesson and group name.
pub fn current_view<S: ScheduleStore + ?Sized>(store: &S, filter: &EntryFilter) -> Vec<EntryView> {
    let names = Names::load(store);
    let mut rows: Vec<EntryView> = store
        .current_entries(filter)
        .iter()
        .map(|e| row(&names, &as_main(e), Some(e.is_changed)))
        .collect();
    sort(&mut rows);
    rows
}

pub fn main_view<S: ScheduleStore + ?Sized>(store: &S, filter: &EntryFilter) -> Vec<EntryView> {
    let names = Names::load(store);
    let mut rows: Vec<EntryView> = store
        .main_entries(filter)
        .iter()
        .map(|e| row(&names, e, None))
        .collect();
    sort(&mut rows);
    rows
}

fn sort(rows: &mut [EntryView]) {
    rows.sort_by(|a, b| {
        (a.day, a.lesson_number, &a.group).cmp(&(b.day, b.lesson_number, &b.group))
    });
}
