use axum::{
    extract::{Query, State},
    Json,
};
use sched_core::stats::{semester_overview, teacher_load, week_statistics};
use sched_core::{ScheduleStore, Transact};
use types::{SemesterOverview, TeacherLoad, WeekStatistics};

use crate::routes::conflicts::WeekQuery;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/v1/statistics",
    params(WeekQuery),
    responses((status = 200, description = "Hour completion per group and teacher", body = WeekStatistics))
)]
pub async fn statistics(
    State(state): State<AppState>,
    Query(q): Query<WeekQuery>,
) -> Json<WeekStatistics> {
    Json(state.store.read(|t| {
        let s = t.settings();
        week_statistics(
            t,
            q.week.unwrap_or(s.current_week),
            q.semester.unwrap_or(s.current_semester),
        )
    }))
}

#[utoipa::path(
    get,
    path = "/v1/teacher-load",
    responses((status = 200, description = "Pairs per teacher over all weeks", body = [TeacherLoad]))
)]
pub async fn load(State(state): State<AppState>) -> Json<Vec<TeacherLoad>> {
    Json(state.store.read(|t| teacher_load(t)))
}

#[utoipa::path(
    get,
    path = "/v1/semester-stats",
    responses((status = 200, description = "Entry counts per semester", body = SemesterOverview))
)]
pub async fn semesters(State(state): State<AppState>) -> Json<SemesterOverview> {
    Json(state.store.read(|t| semester_overview(t)))
}
