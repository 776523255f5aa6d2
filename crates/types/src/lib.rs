use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(
            Clone,
            Copy,
            Debug,
            Serialize,
            Deserialize,
            ToSchema,
            JsonSchema,
            Eq,
            PartialEq,
            Hash,
            PartialOrd,
            Ord,
        )]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}
id_newtype!(TeacherId);
id_newtype!(GroupId);
id_newtype!(RoomId);
id_newtype!(SubjectId);
id_newtype!(GroupSubjectId);
id_newtype!(PracticeId);
id_newtype!(EntryId);
id_newtype!(LogId);

/// Teaching days. Sunday is never scheduled.
#[derive(
    Clone, Copy, Debug, Serialize, Deserialize, ToSchema, JsonSchema, Eq, PartialEq, Hash, PartialOrd, Ord,
)]
#[serde(rename_all = "lowercase")]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Day {
    /// Round-robin order used by auto-fill.
    pub const ALL: [Day; 6] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
        Day::Saturday,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Day::Monday => "Monday",
            Day::Tuesday => "Tuesday",
            Day::Wednesday => "Wednesday",
            Day::Thursday => "Thursday",
            Day::Friday => "Friday",
            Day::Saturday => "Saturday",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// Monday and Thursday carry the extra zero lesson.
    pub fn has_zero_lesson(self) -> bool {
        matches!(self, Day::Monday | Day::Thursday)
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseDayError(pub String);

impl fmt::Display for ParseDayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown day: {}", self.0)
    }
}

impl std::error::Error for ParseDayError {}

impl FromStr for Day {
    type Err = ParseDayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "monday" | "mon" => Ok(Day::Monday),
            "tuesday" | "tue" => Ok(Day::Tuesday),
            "wednesday" | "wed" => Ok(Day::Wednesday),
            "thursday" | "thu" => Ok(Day::Thursday),
            "friday" | "fri" => Ok(Day::Friday),
            "saturday" | "sat" => Ok(Day::Saturday),
            _ => Err(ParseDayError(s.to_string())),
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema, JsonSchema, Eq, PartialEq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum WeekParity {
    Odd,
    Even,
    #[default]
    Both,
}

impl WeekParity {
    pub fn of_week(week: u32) -> Self {
        if week % 2 == 0 {
            WeekParity::Even
        } else {
            WeekParity::Odd
        }
    }

    /// `Both` intersects everything.
    pub fn overlaps(self, other: WeekParity) -> bool {
        self == other || self == WeekParity::Both || other == WeekParity::Both
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema, JsonSchema, Eq, PartialEq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Layer {
    Current,
    Main,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema, JsonSchema, Eq, PartialEq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum FillType {
    Current,
    Main,
    #[default]
    Both,
}

impl FillType {
    pub fn touches_current(self) -> bool {
        matches!(self, FillType::Current | FillType::Both)
    }

    pub fn touches_main(self) -> bool {
        matches!(self, FillType::Main | FillType::Both)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FillType::Current => "current",
            FillType::Main => "main",
            FillType::Both => "both",
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema, PartialEq, Eq)]
pub struct Group {
    pub id: GroupId,
    pub name: String,
    pub course: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema, PartialEq, Eq)]
pub struct Teacher {
    pub id: TeacherId,
    pub name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema, PartialEq, Eq)]
pub struct Subject {
    pub id: SubjectId,
    pub name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema, PartialEq, Eq)]
pub struct Room {
    pub id: RoomId,
    pub name: String,
}

/// Weekly teaching requirement of one subject for one group.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GroupSubject {
    pub id: GroupSubjectId,
    pub group_id: GroupId,
    pub subject_id: SubjectId,
    #[serde(default)]
    pub teacher_id: Option<TeacherId>,
    #[serde(default)]
    pub hours_per_week: u32,
    #[serde(default)]
    pub total_hours_semester1: u32,
    #[serde(default)]
    pub total_hours_semester2: u32,
}

impl GroupSubject {
    /// Lessons are two-hour blocks; an odd remainder is dropped.
    pub fn blocks_per_week(&self) -> u32 {
        self.hours_per_week / 2
    }
}

/// Fixed weekly practice day of a group. `day` is kept as entered; an
/// unparseable day disables the practice for auto-fill.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GroupPractice {
    pub id: PracticeId,
    pub group_id: GroupId,
    pub day: String,
    #[serde(default)]
    pub subject_id: Option<SubjectId>,
    #[serde(default)]
    pub teacher_id: Option<TeacherId>,
    #[serde(default)]
    pub room_id: Option<RoomId>,
}

impl GroupPractice {
    pub fn parsed_day(&self) -> Option<Day> {
        self.day.parse().ok()
    }
}

/// Group, subject, teacher, room and slot shared by both layers.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EntryDraft {
    pub group_id: GroupId,
    pub subject_id: SubjectId,
    pub teacher_id: TeacherId,
    pub room_id: RoomId,
    pub day: Day,
    pub lesson_number: u8,
    pub semester: u8,
    #[serde(default)]
    pub week_parity: WeekParity,
}

/// Manual placement request. `week` is only read for the Current layer,
/// `draft.week_parity` only for the Main layer.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewEntry {
    pub layer: Layer,
    #[serde(flatten)]
    pub draft: EntryDraft,
    #[serde(default = "first_week")]
    pub week: u32,
}

fn first_week() -> u32 {
    1
}

/// Fields of a Current entry that can be edited in place.
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EntryPatch {
    #[serde(default)]
    pub subject_id: Option<SubjectId>,
    #[serde(default)]
    pub teacher_id: Option<TeacherId>,
    #[serde(default)]
    pub room_id: Option<RoomId>,
}

/// Entry of the Current layer (one concrete week).
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEntry {
    pub id: EntryId,
    pub group_id: GroupId,
    pub subject_id: SubjectId,
    pub teacher_id: TeacherId,
    pub room_id: RoomId,
    pub day: Day,
    pub lesson_number: u8,
    pub week_number: u32,
    pub week_parity: WeekParity,
    pub semester: u8,
    pub is_changed: bool,
    pub created_at: DateTime<Utc>,
}

/// Entry of the Main layer (recurring template keyed by parity).
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MainScheduleEntry {
    pub id: EntryId,
    pub group_id: GroupId,
    pub subject_id: SubjectId,
    pub teacher_id: TeacherId,
    pub room_id: RoomId,
    pub day: Day,
    pub lesson_number: u8,
    pub week_parity: WeekParity,
    pub semester: u8,
    pub created_at: DateTime<Utc>,
}

impl MainScheduleEntry {
    pub fn draft(&self) -> EntryDraft {
        EntryDraft {
            group_id: self.group_id,
            subject_id: self.subject_id,
            teacher_id: self.teacher_id,
            room_id: self.room_id,
            day: self.day,
            lesson_number: self.lesson_number,
            semester: self.semester,
            week_parity: self.week_parity,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AutoFillLog {
    pub id: LogId,
    pub week_number: u32,
    pub semester: u8,
    pub fill_type: FillType,
    pub entries_added: u32,
    pub conflicts: u32,
    pub errors: u32,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub current_week: u32,
    pub current_semester: u8,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            current_week: 1,
            current_semester: 1,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FillRequest {
    pub week: u32,
    pub semester: u8,
    #[serde(default, rename = "type")]
    pub fill_type: FillType,
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema, JsonSchema, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FillSummary {
    pub entries_added: u32,
    pub conflicts: u32,
    pub errors: u32,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema, JsonSchema, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ConflictKind {
    TeacherConflict,
    GroupConflict,
    RoomConflict,
}

/// One double-booking found in a Current week. `resource` names the
/// teacher, group or room that is double-booked; `names` lists the colliding
/// groups (teacher and room conflicts) or subjects (group conflicts).
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Conflict {
    #[serde(rename = "type")]
    pub kind: ConflictKind,
    pub day: Day,
    pub lesson_number: u8,
    pub resource: String,
    pub names: Vec<String>,
    pub message: String,
}

/// Reference data plus teaching requirements, as loaded at startup.
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    #[serde(default)]
    pub groups: Vec<Group>,
    #[serde(default)]
    pub teachers: Vec<Teacher>,
    #[serde(default)]
    pub subjects: Vec<Subject>,
    #[serde(default)]
    pub rooms: Vec<Room>,
    #[serde(default)]
    pub group_subjects: Vec<GroupSubject>,
    #[serde(default)]
    pub practices: Vec<GroupPractice>,
}

/// Schedule entry with references resolved to display names.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EntryView {
    pub id: EntryId,
    pub group: String,
    pub subject: String,
    pub teacher: String,
    pub room: String,
    pub day: Day,
    pub lesson_number: u8,
    pub pair: u8,
    pub time: String,
    pub week_parity: WeekParity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_changed: Option<bool>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema)]
pub struct PairInfo {
    pub pair: u8,
    pub name: String,
    pub lessons: Vec<u8>,
    pub time: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema)]
pub struct LessonInfo {
    pub lesson: u8,
    pub time: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubjectLoad {
    pub subject_name: String,
    pub teacher_name: Option<String>,
    pub hours_per_week: u32,
    pub total_hours_semester1: u32,
    pub total_hours_semester2: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GroupStats {
    pub group_name: String,
    pub course: u32,
    pub total_lessons: u32,
    pub changed_lessons: u32,
    pub main_lessons: u32,
    pub total_hours: u32,
    pub completed_hours: u32,
    pub remaining_hours: u32,
    pub progress: u32,
    pub subjects: Vec<SubjectLoad>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeacherGroupLoad {
    pub group_name: String,
    pub subject_name: String,
    pub hours_per_week: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeacherStats {
    pub teacher_name: String,
    pub total_lessons: u32,
    pub total_hours: u32,
    pub groups: Vec<TeacherGroupLoad>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct WeekStatistics {
    pub week: u32,
    pub semester: u8,
    pub total_lessons: u32,
    pub total_groups_hours: u32,
    pub total_teachers_hours: u32,
    pub total_completed_hours: u32,
    pub total_remaining_hours: u32,
    pub group_stats: Vec<GroupStats>,
    pub teacher_stats: Vec<TeacherStats>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeacherLoad {
    pub teacher_id: TeacherId,
    pub teacher_name: String,
    pub total_pairs: u32,
    pub total_hours: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SemesterCount {
    pub semester: u8,
    pub entries_count: u32,
    pub main_entries_count: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SemesterOverview {
    pub current_week: u32,
    pub current_semester: u8,
    pub semesters: Vec<SemesterCount>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AutoFillOverview {
    pub total_groups: u32,
    pub total_hours: u32,
    pub total_conflicts: u32,
}
