//! Materializing the Main template into concrete weeks.

use tracing::info;

use crate::error::{EngineError, StoreError, ValidationError};
use crate::store::{EntryFilter, ScheduleStore};
use types::{Settings, WeekParity};

/// Replaces the Current entries of (`week`, `semester`) with a copy of every
/// Main entry of that semester whose parity covers `week`. Returns the number
/// of entries created.
pub fn advance_week<S: ScheduleStore + ?Sized>(
    store: &mut S,
    week: u32,
    semester: u8,
) -> Result<usize, StoreError> {
    let removed = store.delete_current_week(week, semester);
    let parity = WeekParity::of_week(week);
    let template = store.main_entries(&EntryFilter::semester(semester).parity(parity));
    for entry in &template {
        store.insert_current(entry.draft(), week, false)?;
    }
    info!(
        week,
        semester,
        ?parity,
        removed,
        created = template.len(),
        "week materialized from main schedule"
    );
    Ok(template.len())
}

/// Moves the stored week forward by one and materializes it.
pub fn next_week<S: ScheduleStore + ?Sized>(store: &mut S) -> Result<Settings, EngineError> {
    let mut settings = store.settings();
    settings.current_week = settings
        .current_week
        .checked_add(1)
        .ok_or(ValidationError::WeekOverflow(settings.current_week))?;
    store.set_settings(settings);
    advance_week(store, settings.current_week, settings.current_semester)?;
    Ok(settings)
}

/// Drops manual changes of the stored week by re-materializing it.
pub fn clear_week<S: ScheduleStore + ?Sized>(store: &mut S) -> Result<usize, StoreError> {
    let settings = store.settings();
    advance_week(store, settings.current_week, settings.current_semester)
}

/// Switches 1 <-> 2, restarts at week 1 and empties the Current layer of the
/// new semester. The Main layer is left alone.
pub fn advance_semester<S: ScheduleStore + ?Sized>(store: &mut S) -> Settings {
    let previous = store.settings();
    let semester = if previous.current_semester == 1 { 2 } else { 1 };
    let settings = Settings {
        current_week: 1,
        current_semester: semester,
    };
    store.set_settings(settings);
    let removed = store.delete_current_semester(semester);
    info!(from = previous.current_semester, to = semester, removed, "semester switched");
    settings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::Tables;
    use types::{Day, EntryDraft};

    fn with_template() -> (Tables, EntryDraft) {
        let mut t = Tables::new();
        let g = t.add_group("101", 1).unwrap();
        let s = t.add_subject("Math").unwrap();
        let tc = t.add_teacher("T1").unwrap();
        let r = t.add_room("A1").unwrap();
        let base = EntryDraft {
            group_id: g,
            subject_id: s,
            teacher_id: tc,
            room_id: r,
            day: Day::Monday,
            lesson_number: 1,
            semester: 1,
            week_parity: WeekParity::Both,
        };
        for (lesson, parity) in [
            (1, WeekParity::Both),
            (3, WeekParity::Odd),
            (5, WeekParity::Even),
            (7, WeekParity::Even),
        ] {
            t.insert_main(EntryDraft {
                lesson_number: lesson,
                week_parity: parity,
                ..base.clone()
            })
            .unwrap();
        }
        t.insert_main(EntryDraft {
            semester: 2,
            ..base.clone()
        })
        .unwrap();
        (t, base)
    }

    #[test]
    fn copies_parity_compatible_entries() {
        let (mut t, _) = with_template();
        assert_eq!(advance_week(&mut t, 4, 1).unwrap(), 3);
        let week = t.current_entries(&EntryFilter::semester(1).week(4));
        assert_eq!(week.len(), 3);
        assert!(week.iter().all(|e| !e.is_changed && e.week_number == 4));
        let mut lessons: Vec<u8> = week.iter().map(|e| e.lesson_number).collect();
        lessons.sort();
        assert_eq!(lessons, vec![1, 5, 7]);

        assert_eq!(advance_week(&mut t, 5, 1).unwrap(), 2);
    }

    #[test]
    fn rerun_replaces_previous_week() {
        let (mut t, base) = with_template();
        t.insert_current(
            EntryDraft {
                lesson_number: 9,
                ..base
            },
            3,
            true,
        )
        .unwrap();
        advance_week(&mut t, 3, 1).unwrap();
        advance_week(&mut t, 3, 1).unwrap();
        let week = t.current_entries(&EntryFilter::semester(1).week(3));
        assert_eq!(week.len(), 2);
        assert!(week.iter().all(|e| e.lesson_number != 9));
    }

    #[test]
    fn next_week_and_clear_use_settings() {
        let (mut t, _) = with_template();
        let s = next_week(&mut t).unwrap();
        assert_eq!(s.current_week, 2);
        assert_eq!(t.settings().current_week, 2);
        assert_eq!(t.current_entries(&EntryFilter::semester(1).week(2)).len(), 3);
        assert_eq!(clear_week(&mut t).unwrap(), 3);
    }

    #[test]
    fn next_week_stops_at_last_week() {
        let (mut t, _) = with_template();
        let last = Settings {
            current_week: u32::MAX,
            current_semester: 1,
        };
        t.set_settings(last);
        let err = next_week(&mut t).unwrap_err();
        assert!(matches!(
            err,
            EngineError::Validation(ValidationError::WeekOverflow(u32::MAX))
        ));
        assert_eq!(t.settings(), last);
    }

    #[test]
    fn semester_flip_resets_week_and_clears_new_semester() {
        let (mut t, base) = with_template();
        t.set_settings(Settings {
            current_week: 17,
            current_semester: 1,
        });
        t.insert_current(EntryDraft { semester: 2, ..base.clone() }, 1, false)
            .unwrap();
        t.insert_current(base, 17, false).unwrap();

        let s = advance_semester(&mut t);
        assert_eq!(s, Settings { current_week: 1, current_semester: 2 });
        assert!(t.current_entries(&EntryFilter::semester(2)).is_empty());
        assert_eq!(t.current_entries(&EntryFilter::semester(1)).len(), 1);
        assert_eq!(t.main_entries(&EntryFilter::semester(2)).len(), 1);

        assert_eq!(advance_semester(&mut t).current_semester, 1);
    }
}
