//! Days, pairs and lessons.
//!
//! A lesson is the smallest schedulable unit; two consecutive lessons form a
//! pair. Pair 0 holds the single zero lesson and only exists on Monday and
//! Thursday. Saturday stops after pair 4.

use types::{Day, LessonInfo, PairInfo};

/// The only subject allowed on lesson 0.
pub const ZERO_LESSON_SUBJECT: &str = "Important topics discussion";

const PAIRS_SATURDAY: &[u8] = &[1, 2, 3, 4];
const PAIRS_WITH_ZERO: &[u8] = &[0, 1, 2, 3, 4, 5, 6];
const PAIRS_WEEKDAY: &[u8] = &[1, 2, 3, 4, 5, 6];

const LESSONS: [&[u8]; 7] = [&[0], &[1, 2], &[3, 4], &[5, 6], &[7, 8], &[9, 10], &[11, 12]];

// Clock ranges per pair, indexed by pair number. Empty means the pair does
// not exist for that kind of day.
const TIMES_SATURDAY: [&str; 7] = [
    "",
    "8:00-9:25",
    "9:30-10:55",
    "11:00-12:25",
    "12:30-13:55",
    "",
    "",
];
const TIMES_MON_THU: [&str; 7] = [
    "8:30-9:10",
    "9:15-10:40",
    "11:20-12:45",
    "13:25-14:50",
    "15:00-16:25",
    "16:30-17:55",
    "18:00-19:25",
];
const TIMES_WEEKDAY: [&str; 7] = [
    "",
    "8:30-9:55",
    "10:35-12:00",
    "12:40-14:05",
    "14:15-15:40",
    "15:45-17:10",
    "17:15-18:40",
];

pub fn available_pairs(day: Day) -> &'static [u8] {
    if day == Day::Saturday {
        PAIRS_SATURDAY
    } else if day.has_zero_lesson() {
        PAIRS_WITH_ZERO
    } else {
        PAIRS_WEEKDAY
    }
}

pub fn is_available_pair(day: Day, pair: u8) -> bool {
    available_pairs(day).contains(&pair)
}

/// Pair holding `lesson` on `day`, or `None` when the lesson does not exist
/// that day.
pub fn pair_number(day: Day, lesson: u8) -> Option<u8> {
    let pair = lesson.div_ceil(2);
    is_available_pair(day, pair).then_some(pair)
}

/// Lessons of `pair` on `day`; empty when the pair does not exist that day.
pub fn lessons_in_pair(day: Day, pair: u8) -> &'static [u8] {
    if is_available_pair(day, pair) {
        LESSONS[pair as usize]
    } else {
        &[]
    }
}

pub fn is_valid_lesson(day: Day, lesson: u8) -> bool {
    pair_number(day, lesson).is_some()
}

/// Every lesson number that exists on `day`, in order.
pub fn lessons_of_day(day: Day) -> Vec<u8> {
    available_pairs(day)
        .iter()
        .flat_map(|&p| lessons_in_pair(day, p).iter().copied())
        .collect()
}

/// Clock range of a pair, or an empty string when the pair is not held on
/// `day`. Pair 0 has no time outside Monday and Thursday, and Saturday pairs 5
/// and 6 do not fall back to weekday times.
pub fn pair_clock_time(day: Day, pair: u8) -> &'static str {
    if !is_available_pair(day, pair) {
        return "";
    }
    let table = if day == Day::Saturday {
        &TIMES_SATURDAY
    } else if day.has_zero_lesson() {
        &TIMES_MON_THU
    } else {
        &TIMES_WEEKDAY
    };
    table[pair as usize]
}

pub fn lesson_clock_time(day: Day, lesson: u8) -> &'static str {
    pair_number(day, lesson)
        .map(|p| pair_clock_time(day, p))
        .unwrap_or("")
}

pub fn pair_name(pair: u8) -> String {
    format!("Pair {pair}")
}

pub fn pairs_of_day(day: Day) -> Vec<PairInfo> {
    available_pairs(day)
        .iter()
        .map(|&pair| PairInfo {
            pair,
            name: pair_name(pair),
            lessons: lessons_in_pair(day, pair).to_vec(),
            time: pair_clock_time(day, pair).to_string(),
        })
        .collect()
}

pub fn lessons_of_pair(day: Day, pair: u8) -> Vec<LessonInfo> {
    lessons_in_pair(day, pair)
        .iter()
        .map(|&lesson| LessonInfo {
            lesson,
            time: lesson_clock_time(day, lesson).to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn any_day() -> impl Strategy<Value = Day> {
        proptest::sample::select(Day::ALL.to_vec())
    }

    #[test]
    fn pairs_per_day() {
        assert_eq!(available_pairs(Day::Saturday), &[1, 2, 3, 4]);
        assert_eq!(available_pairs(Day::Monday), &[0, 1, 2, 3, 4, 5, 6]);
        assert_eq!(available_pairs(Day::Thursday), &[0, 1, 2, 3, 4, 5, 6]);
        assert_eq!(available_pairs(Day::Friday), &[1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn lesson_to_pair() {
        assert_eq!(pair_number(Day::Monday, 0), Some(0));
        assert_eq!(pair_number(Day::Tuesday, 0), None);
        assert_eq!(pair_number(Day::Tuesday, 4), Some(2));
        assert_eq!(pair_number(Day::Wednesday, 12), Some(6));
        assert_eq!(pair_number(Day::Saturday, 8), Some(4));
        assert_eq!(pair_number(Day::Saturday, 9), None);
        assert_eq!(pair_number(Day::Friday, 13), None);
    }

    #[test]
    fn clock_table() {
        assert_eq!(pair_clock_time(Day::Monday, 0), "8:30-9:10");
        assert_eq!(pair_clock_time(Day::Thursday, 6), "18:00-19:25");
        assert_eq!(pair_clock_time(Day::Saturday, 1), "8:00-9:25");
        assert_eq!(pair_clock_time(Day::Tuesday, 2), "10:35-12:00");
        assert_eq!(lesson_clock_time(Day::Friday, 10), "15:45-17:10");
        assert_eq!(pair_clock_time(Day::Saturday, 5), "");
        assert_eq!(pair_clock_time(Day::Wednesday, 0), "");
        assert_eq!(pair_clock_time(Day::Monday, 7), "");
    }

    #[test]
    fn day_listing() {
        let pairs = pairs_of_day(Day::Saturday);
        assert_eq!(pairs.len(), 4);
        assert_eq!(pairs[0].name, "Pair 1");
        assert_eq!(pairs[3].lessons, vec![7, 8]);
        assert_eq!(lessons_of_day(Day::Monday).len(), 13);
        assert!(lessons_of_pair(Day::Saturday, 6).is_empty());
    }

    proptest! {
        #[test]
        fn lesson_pair_round_trip(day in any_day(), lesson in 0u8..16) {
            match pair_number(day, lesson) {
                Some(pair) => {
                    prop_assert!(lessons_in_pair(day, pair).contains(&lesson));
                    prop_assert!(lessons_of_day(day).contains(&lesson));
                }
                None => prop_assert!(!lessons_of_day(day).contains(&lesson)),
            }
        }

        #[test]
        fn clock_time_empty_outside_table(day in any_day(), pair in 0u8..10) {
            let time = pair_clock_time(day, pair);
            prop_assert_eq!(time.is_empty(), !available_pairs(day).contains(&pair));
        }
    }
}
