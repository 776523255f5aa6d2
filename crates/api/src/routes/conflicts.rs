use axum::{
    extract::{Query, State},
    Json,
};
use sched_core::report::find_conflicts;
use sched_core::{Conflict, ScheduleStore, Transact};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::state::AppState;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct WeekQuery {
    pub week: Option<u32>,
    pub semester: Option<u8>,
}

#[utoipa::path(
    get,
    path = "/v1/conflicts",
    params(WeekQuery),
    responses((status = 200, description = "Double-bookings of the week", body = [Conflict]))
)]
pub async fn conflicts(
    State(state): State<AppState>,
    Query(q): Query<WeekQuery>,
) -> Json<Vec<Conflict>> {
    Json(state.store.read(|t| {
        let s = t.settings();
        find_conflicts(
            t,
            q.week.unwrap_or(s.current_week),
            q.semester.unwrap_or(s.current_semester),
        )
    }))
}
