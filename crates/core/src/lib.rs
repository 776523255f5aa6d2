pub mod conflict;
pub mod error;
pub mod memory;
pub mod placement;
pub mod propagate;
pub mod report;
pub mod stats;
pub mod store;
pub mod timeslot;
pub mod views;

use async_trait::async_trait;

pub use error::{EngineError, StoreError, ValidationError};
pub use memory::{MemStore, Tables};
pub use store::{EntryFilter, ScheduleStore, Transact};
pub use types::{
    Catalog, Conflict, Day, FillRequest, FillSummary, FillType, Group, Layer, Room, Settings,
    Subject, Teacher, WeekParity,
};

pub fn validate(catalog: &Catalog) -> Result<(), ValidationError> {
    let mut errors: Vec<String> = Vec::new();

    fn chk_unique<I: ToString>(name: &str, ids: impl Iterator<Item = I>, errors: &mut Vec<String>) {
        use std::collections::HashSet;
        let mut seen = HashSet::new();
        for id in ids {
            let s = id.to_string();
            if !seen.insert(s.clone()) {
                errors.push(format!("duplicate {name}: {s}"));
            }
        }
    }
    let ids = catalog
        .groups
        .iter()
        .map(|x| x.id.0)
        .chain(catalog.teachers.iter().map(|x| x.id.0))
        .chain(catalog.subjects.iter().map(|x| x.id.0))
        .chain(catalog.rooms.iter().map(|x| x.id.0))
        .chain(catalog.group_subjects.iter().map(|x| x.id.0))
        .chain(catalog.practices.iter().map(|x| x.id.0));
    chk_unique("id", ids, &mut errors);
    chk_unique("group name", catalog.groups.iter().map(|x| &x.name), &mut errors);
    chk_unique("teacher name", catalog.teachers.iter().map(|x| &x.name), &mut errors);
    chk_unique("subject name", catalog.subjects.iter().map(|x| &x.name), &mut errors);
    chk_unique("room name", catalog.rooms.iter().map(|x| &x.name), &mut errors);
    chk_unique(
        "group subject",
        catalog
            .group_subjects
            .iter()
            .map(|gs| format!("{}/{}", gs.group_id, gs.subject_id)),
        &mut errors,
    );
    chk_unique(
        "practice for group",
        catalog.practices.iter().map(|p| p.group_id),
        &mut errors,
    );

    use std::collections::HashSet;
    let groups: HashSet<_> = catalog.groups.iter().map(|g| g.id).collect();
    let teachers: HashSet<_> = catalog.teachers.iter().map(|t| t.id).collect();
    let subjects: HashSet<_> = catalog.subjects.iter().map(|s| s.id).collect();
    let rooms: HashSet<_> = catalog.rooms.iter().map(|r| r.id).collect();

    for g in &catalog.groups {
        if g.course == 0 {
            errors.push(format!("group {} has course 0", g.name));
        }
    }

    for gs in &catalog.group_subjects {
        if !groups.contains(&gs.group_id) {
            errors.push(format!(
                "group subject {} references missing group {}",
                gs.id, gs.group_id
            ));
        }
        if !subjects.contains(&gs.subject_id) {
            errors.push(format!(
                "group subject {} references missing subject {}",
                gs.id, gs.subject_id
            ));
        }
        if let Some(t) = gs.teacher_id {
            if !teachers.contains(&t) {
                errors.push(format!(
                    "group subject {} references missing teacher {}",
                    gs.id, t
                ));
            }
        }
    }

    for p in &catalog.practices {
        if !groups.contains(&p.group_id) {
            errors.push(format!(
                "practice {} references missing group {}",
                p.id, p.group_id
            ));
        }
        if p.parsed_day().is_none() {
            errors.push(format!("practice {} has invalid day {}", p.id, p.day));
        }
        if p.subject_id.is_some_and(|s| !subjects.contains(&s)) {
            errors.push(format!("practice {} references missing subject", p.id));
        }
        if p.teacher_id.is_some_and(|t| !teachers.contains(&t)) {
            errors.push(format!("practice {} references missing teacher", p.id));
        }
        if p.room_id.is_some_and(|r| !rooms.contains(&r)) {
            errors.push(format!("practice {} references missing room", p.id));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::Msg(errors.join("; ")))
    }
}

/// Something that can run an auto-fill invocation end to end.
#[async_trait]
pub trait Filler: Send + Sync + 'static {
    async fn fill(&self, req: FillRequest) -> anyhow::Result<FillSummary>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::{GroupId, GroupPractice, GroupSubject, GroupSubjectId, PracticeId, SubjectId};

    fn catalog() -> Catalog {
        Catalog {
            groups: vec![Group {
                id: GroupId(1),
                name: "101".into(),
                course: 1,
            }],
            subjects: vec![Subject {
                id: SubjectId(2),
                name: "Math".into(),
            }],
            group_subjects: vec![GroupSubject {
                id: GroupSubjectId(3),
                group_id: GroupId(1),
                subject_id: SubjectId(2),
                teacher_id: None,
                hours_per_week: 4,
                total_hours_semester1: 0,
                total_hours_semester2: 0,
            }],
            ..Default::default()
        }
    }

    #[test]
    fn valid_catalog_passes() {
        assert_eq!(validate(&catalog()), Ok(()));
    }

    #[test]
    fn reports_every_problem() {
        let mut c = catalog();
        c.group_subjects.push(GroupSubject {
            id: GroupSubjectId(4),
            ..c.group_subjects[0].clone()
        });
        c.practices.push(GroupPractice {
            id: PracticeId(5),
            group_id: GroupId(9),
            day: "Sunday".into(),
            subject_id: None,
            teacher_id: None,
            room_id: None,
        });
        let Err(ValidationError::Msg(msg)) = validate(&c) else {
            panic!("expected errors");
        };
        assert!(msg.contains("duplicate group subject: 1/2"));
        assert!(msg.contains("practice 5 references missing group 9"));
        assert!(msg.contains("practice 5 has invalid day Sunday"));
    }
}
