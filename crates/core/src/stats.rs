use crate::report::{find_conflicts, Names};
use crate::store::{EntryFilter, ScheduleStore};
use types::{
    AutoFillOverview, GroupStats, SemesterCount, SemesterOverview, Settings, SubjectLoad,
    TeacherGroupLoad, TeacherLoad, TeacherStats, WeekStatistics,
};

/// Hours covered by one scheduled entry.
pub const HOURS_PER_ENTRY: u32 = 2;

/// Hour completion of every group and load of every teacher for one week.
pub fn week_statistics<S: ScheduleStore + ?Sized>(
    store: &S,
    week: u32,
    semester: u8,
) -> WeekStatistics {
    let names = Names::load(store);
    let requirements = store.group_subjects();
    let scope = EntryFilter::semester(semester).week(week);

    let group_stats: Vec<GroupStats> = store
        .groups()
        .into_iter()
        .map(|g| {
            let entries = store.current_entries(&scope.clone().group(g.id));
            let changed = entries.iter().filter(|e| e.is_changed).count() as u32;
            let total_lessons = entries.len() as u32;
            let mine: Vec<_> = requirements.iter().filter(|gs| gs.group_id == g.id).collect();
            let total_hours: u32 = mine.iter().map(|gs| gs.hours_per_week).sum();
            let completed_hours = total_lessons * HOURS_PER_ENTRY;
            let progress = if total_hours > 0 {
                completed_hours * 100 / total_hours
            } else {
                0
            };
            GroupStats {
                group_name: g.name,
                course: g.course,
                total_lessons,
                changed_lessons: changed,
                main_lessons: total_lessons - changed,
                total_hours,
                completed_hours,
                remaining_hours: total_hours.saturating_sub(completed_hours),
                progress,
                subjects: mine
                    .iter()
                    .map(|gs| SubjectLoad {
                        subject_name: names.subject(gs.subject_id.0),
                        teacher_name: gs.teacher_id.map(|t| names.teacher(t.0)),
                        hours_per_week: gs.hours_per_week,
                        total_hours_semester1: gs.total_hours_semester1,
                        total_hours_semester2: gs.total_hours_semester2,
                    })
                    .collect(),
            }
        })
        .collect();

    let teacher_stats: Vec<TeacherStats> = store
        .teachers()
        .into_iter()
        .map(|t| {
            let lessons = store.current_entries(&scope.clone().teacher(t.id)).len() as u32;
            let mine: Vec<_> = requirements
                .iter()
                .filter(|gs| gs.teacher_id == Some(t.id))
                .collect();
            TeacherStats {
                teacher_name: t.name,
                total_lessons: lessons,
                total_hours: mine.iter().map(|gs| gs.hours_per_week).sum(),
                groups: mine
                    .iter()
                    .map(|gs| TeacherGroupLoad {
                        group_name: names.group(gs.group_id.0),
                        subject_name: names.subject(gs.subject_id.0),
                        hours_per_week: gs.hours_per_week,
                    })
                    .collect(),
            }
        })
        .collect();

    WeekStatistics {
        week,
        semester,
        total_lessons: group_stats.iter().map(|g| g.total_lessons).sum(),
        total_groups_hours: group_stats.iter().map(|g| g.total_hours).sum(),
        total_teachers_hours: teacher_stats.iter().map(|t| t.total_hours).sum(),
        total_completed_hours: group_stats.iter().map(|g| g.completed_hours).sum(),
        total_remaining_hours: group_stats.iter().map(|g| g.remaining_hours).sum(),
        group_stats,
        teacher_stats,
    }
}

/// Current-layer pairs per teacher over every stored week and semester.
pub fn teacher_load<S: ScheduleStore + ?Sized>(store: &S) -> Vec<TeacherLoad> {
    store
        .teachers()
        .into_iter()
        .map(|t| {
            let pairs = store
                .current_entries(&EntryFilter::default().teacher(t.id))
                .len() as u32;
            TeacherLoad {
                teacher_id: t.id,
                teacher_name: t.name,
                total_pairs: pairs,
                total_hours: pairs * HOURS_PER_ENTRY,
            }
        })
        .collect()
}

pub fn semester_overview<S: ScheduleStore + ?Sized>(store: &S) -> SemesterOverview {
    let settings = store.settings();
    SemesterOverview {
        current_week: settings.current_week,
        current_semester: settings.current_semester,
        semesters: [1u8, 2]
            .into_iter()
            .map(|s| SemesterCount {
                semester: s,
                entries_count: store.current_entries(&EntryFilter::semester(s)).len() as u32,
                main_entries_count: store.main_entries(&EntryFilter::semester(s)).len() as u32,
            })
            .collect(),
    }
}

/// Figures shown before launching auto-fill for the week in `settings`.
pub fn autofill_overview<S: ScheduleStore + ?Sized>(store: &S, settings: Settings) -> AutoFillOverview {
    AutoFillOverview {
        total_groups: store.groups().len() as u32,
        total_hours: store.group_subjects().iter().map(|gs| gs.hours_per_week).sum(),
        total_conflicts: find_conflicts(store, settings.current_week, settings.current_semester)
            .len() as u32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::Tables;
    use types::{Day, EntryDraft, WeekParity};

    #[test]
    fn completion_counts_two_hours_per_entry() {
        let mut t = Tables::new();
        let g = t.add_group("101", 2).unwrap();
        let math = t.add_subject("Math").unwrap();
        let art = t.add_subject("Art").unwrap();
        let t1 = t.add_teacher("T1").unwrap();
        let r = t.add_room("A1").unwrap();
        t.upsert_group_subject(g, math, Some(t1), 4, (64, 60)).unwrap();
        t.upsert_group_subject(g, art, None, 2, (0, 0)).unwrap();
        let d = |lesson| EntryDraft {
            group_id: g,
            subject_id: math,
            teacher_id: t1,
            room_id: r,
            day: Day::Tuesday,
            lesson_number: lesson,
            semester: 1,
            week_parity: WeekParity::Both,
        };
        t.insert_current(d(1), 5, false).unwrap();
        t.insert_current(d(3), 5, true).unwrap();
        t.insert_current(d(5), 6, false).unwrap();

        let s = week_statistics(&t, 5, 1);
        let gs = &s.group_stats[0];
        assert_eq!(gs.total_lessons, 2);
        assert_eq!(gs.changed_lessons, 1);
        assert_eq!(gs.main_lessons, 1);
        assert_eq!(gs.total_hours, 6);
        assert_eq!(gs.completed_hours, 4);
        assert_eq!(gs.remaining_hours, 2);
        assert_eq!(gs.progress, 66);
        assert_eq!(gs.subjects[1].teacher_name, None);
        assert_eq!(s.teacher_stats[0].total_hours, 4);
        assert_eq!(s.teacher_stats[0].groups[0].group_name, "101");
        assert_eq!(s.total_remaining_hours, 2);

        let load = teacher_load(&t);
        assert_eq!(load[0].total_pairs, 3);
        assert_eq!(load[0].total_hours, 6);

        let overview = semester_overview(&t);
        assert_eq!(overview.semesters[0].entries_count, 3);
        assert_eq!(overview.semesters[1].entries_count, 0);

        let af = autofill_overview(&t, Settings::default());
        assert_eq!(af.total_groups, 1);
        assert_eq!(af.total_hours, 6);
        assert_eq!(af.total_conflicts, 0);
    }
}
