use autofill::{auto_fill, AutoFillConfig};
use proptest::prelude::*;
use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha8Rng;
use sched_core::{EntryFilter, ScheduleStore, Tables};
use types::{FillRequest, FillType};

fn build(groups: &[(u32, Vec<(u32, bool)>)], rooms: usize) -> (Tables, u32) {
    let mut t = Tables::new();
    let mut expected = 0;
    for r in 0..rooms {
        t.add_room(&format!("R{r}")).unwrap();
    }
    for (gi, (course, subjects)) in groups.iter().enumerate() {
        let g = t.add_group(&format!("G{gi}"), *course).unwrap();
        for (si, (hours, has_teacher)) in subjects.iter().enumerate() {
            let s = t.add_subject(&format!("S{gi}-{si}")).unwrap();
            let teacher = if *has_teacher {
                Some(t.add_teacher(&format!("T{gi}-{si}")).unwrap())
            } else {
                None
            };
            t.upsert_group_subject(g, s, teacher, *hours, (0, 0)).unwrap();
            expected += hours / 2;
        }
    }
    (t, expected)
}

fn fill_type() -> impl Strategy<Value = FillType> {
    prop_oneof![
        Just(FillType::Current),
        Just(FillType::Main),
        Just(FillType::Both)
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn every_block_is_placed_or_counted(
        groups in prop::collection::vec(
            (1u32..=4, prop::collection::vec((0u32..=9, any::<bool>()), 0..4)),
            1..4,
        ),
        rooms in 0usize..3,
        ft in fill_type(),
        seed in any::<u64>(),
    ) {
        let (mut t, expected) = build(&groups, rooms);
        let req = FillRequest { week: 3, semester: 2, fill_type: ft, seed: None };
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let s = auto_fill(&mut t, &req, &AutoFillConfig::default(), &mut rng).unwrap();

        prop_assert_eq!(s.entries_added + s.errors, expected);
        if ft.touches_current() {
            let current = t.current_entries(&EntryFilter::semester(2).week(3));
            prop_assert_eq!(current.len() as u32, s.entries_added);
            prop_assert!(current.iter().all(|e| !e.is_changed));
            // none of the generated subjects owns lesson 0
            prop_assert!(current.iter().all(|e| e.lesson_number != 0));
        }
        if ft.touches_main() {
            let main = t.main_entries(&EntryFilter::semester(2));
            prop_assert_eq!(main.len() as u32, s.entries_added);
            prop_assert!(main.iter().all(|e| e.lesson_number != 0));
        }
        prop_assert_eq!(s.conflicts, 0);
    }
}
