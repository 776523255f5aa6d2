use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use sched_core::placement::{delete_entry, place_entry, update_entry};
use sched_core::views::{current_view, main_view};
use sched_core::{EntryFilter, ScheduleStore, Transact};
use serde::{Deserialize, Serialize};
use types::{
    Day, EntryId, EntryPatch, EntryView, GroupId, Layer, NewEntry, ScheduleEntry, WeekParity,
};
use utoipa::{IntoParams, ToSchema};

use crate::error::{ApiError, ErrorBody};
use crate::state::AppState;

/// Week and semester fall back to the stored settings.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CurrentQuery {
    pub week: Option<u32>,
    pub semester: Option<u8>,
    pub day: Option<Day>,
    pub group: Option<u32>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MainQuery {
    pub semester: Option<u8>,
    pub day: Option<Day>,
    /// Keeps entries whose parity overlaps this one.
    pub parity: Option<WeekParity>,
    pub group: Option<u32>,
}

#[derive(Serialize, ToSchema)]
pub struct Created {
    pub id: EntryId,
}

#[utoipa::path(
    get,
    path = "/v1/schedule/current",
    params(CurrentQuery),
    responses((status = 200, description = "Current entries with names and times", body = [EntryView]))
)]
pub async fn current(
    State(state): State<AppState>,
    Query(q): Query<CurrentQuery>,
) -> Json<Vec<EntryView>> {
    Json(state.store.read(|t| {
        let s = t.settings();
        let mut f = EntryFilter::semester(q.semester.unwrap_or(s.current_semester))
            .week(q.week.unwrap_or(s.current_week));
        f.day = q.day;
        f.group = q.group.map(GroupId);
        current_view(t, &f)
    }))
}

#[utoipa::path(
    get,
    path = "/v1/schedule/main",
    params(MainQuery),
    responses((status = 200, description = "Main template entries with names and times", body = [EntryView]))
)]
pub async fn main_template(
    State(state): State<AppState>,
    Query(q): Query<MainQuery>,
) -> Json<Vec<EntryView>> {
    Json(state.store.read(|t| {
        let mut f = EntryFilter::semester(q.semester.unwrap_or(t.settings().current_semester));
        f.day = q.day;
        f.parity = q.parity;
        f.group = q.group.map(GroupId);
        main_view(t, &f)
    }))
}

#[utoipa::path(
    post,
    path = "/v1/schedule",
    request_body = NewEntry,
    responses(
        (status = 201, description = "Entry created", body = Created),
        (status = 400, description = "Validation failed", body = ErrorBody),
        (status = 409, description = "Slot taken", body = ErrorBody)
    )
)]
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<NewEntry>,
) -> Result<(StatusCode, Json<Created>), ApiError> {
    let id = state.store.transaction(|t| place_entry(t, req))?;
    Ok((StatusCode::CREATED, Json(Created { id })))
}

#[utoipa::path(
    put,
    path = "/v1/schedule/{id}",
    params(("id" = u32, Path, description = "Current entry id")),
    request_body = EntryPatch,
    responses(
        (status = 200, description = "Updated entry", body = ScheduleEntry),
        (status = 404, description = "No such entry", body = ErrorBody),
        (status = 409, description = "Slot taken", body = ErrorBody)
    )
)]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    Json(patch): Json<EntryPatch>,
) -> Result<Json<ScheduleEntry>, ApiError> {
    let entry = state
        .store
        .transaction(|t| update_entry(t, EntryId(id), patch))?;
    Ok(Json(entry))
}

#[utoipa::path(
    delete,
    path = "/v1/schedule/{id}",
    params(("id" = u32, Path, description = "Current entry id")),
    responses((status = 204, description = "Deleted"), (status = 404, description = "No such entry", body = ErrorBody))
)]
pub async fn remove_current(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Result<StatusCode, ApiError> {
    state
        .store
        .transaction(|t| delete_entry(t, Layer::Current, EntryId(id)))?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/v1/schedule/main/{id}",
    params(("id" = u32, Path, description = "Main entry id")),
    responses((status = 204, description = "Deleted"), (status = 404, description = "No such entry", body = ErrorBody))
)]
pub async fn remove_main(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Result<StatusCode, ApiError> {
    state
        .store
        .transaction(|t| delete_entry(t, Layer::Main, EntryId(id)))?;
    Ok(StatusCode::NO_CONTENT)
}
