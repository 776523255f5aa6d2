//! Double-booking checks against the Current and Main layers.

use crate::store::{EntryFilter, ScheduleStore};
use types::{Day, EntryId, FillType, GroupId, Layer, Room, RoomId, TeacherId, WeekParity};

/// A placement under consideration. A missing teacher or room never clashes.
#[derive(Clone, Debug)]
pub struct Candidate {
    pub group: GroupId,
    pub teacher: Option<TeacherId>,
    pub room: Option<RoomId>,
    pub day: Day,
    pub lesson: u8,
    pub week: u32,
    pub semester: u8,
    pub parity: WeekParity,
    /// Entry being edited; it does not collide with itself.
    pub ignore: Option<EntryId>,
}

impl Candidate {
    fn collides(&self, group: GroupId, teacher: TeacherId, room: RoomId) -> bool {
        group == self.group || Some(teacher) == self.teacher || Some(room) == self.room
    }

    fn filter(&self, layer: Layer) -> EntryFilter {
        let f = EntryFilter::semester(self.semester).slot(self.day, self.lesson);
        match layer {
            Layer::Current => f.week(self.week),
            Layer::Main => f.parity(self.parity),
        }
    }
}

/// True if the candidate shares its slot with an entry of `layer` that has
/// the same group, the same teacher or the same room.
pub fn has_conflict<S: ScheduleStore + ?Sized>(store: &S, layer: Layer, c: &Candidate) -> bool {
    let filter = c.filter(layer);
    match layer {
        Layer::Current => store
            .current_entries(&filter)
            .iter()
            .filter(|e| Some(e.id) != c.ignore)
            .any(|e| c.collides(e.group_id, e.teacher_id, e.room_id)),
        Layer::Main => store
            .main_entries(&filter)
            .iter()
            .filter(|e| Some(e.id) != c.ignore)
            .any(|e| c.collides(e.group_id, e.teacher_id, e.room_id)),
    }
}

/// Checks every layer `fill` writes to; the candidate must be clear in all.
pub fn clashes_in<S: ScheduleStore + ?Sized>(store: &S, fill: FillType, c: &Candidate) -> bool {
    (fill.touches_main() && has_conflict(store, Layer::Main, c))
        || (fill.touches_current() && has_conflict(store, Layer::Current, c))
}

fn room_taken<S: ScheduleStore + ?Sized>(store: &S, layer: Layer, room: RoomId, c: &Candidate) -> bool {
    let filter = c.filter(layer).room(room);
    match layer {
        Layer::Current => !store.current_entries(&filter).is_empty(),
        Layer::Main => !store.main_entries(&filter).is_empty(),
    }
}

/// First room, in store order, that is unoccupied at the slot in every layer
/// `fill` writes to.
pub fn find_free_room<S: ScheduleStore + ?Sized>(
    store: &S,
    day: Day,
    lesson: u8,
    week: u32,
    semester: u8,
    fill: FillType,
) -> Option<Room> {
    let probe = Candidate {
        group: GroupId(0),
        teacher: None,
        room: None,
        day,
        lesson,
        week,
        semester,
        parity: WeekParity::Both,
        ignore: None,
    };
    store.rooms().into_iter().find(|r| {
        !(fill.touches_main() && room_taken(store, Layer::Main, r.id, &probe))
            && !(fill.touches_current() && room_taken(store, Layer::Current, r.id, &probe))
    })
}
