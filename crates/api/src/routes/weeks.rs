use axum::{extract::State, Json};
use sched_core::propagate::{advance_semester, clear_week, next_week};
use sched_core::{EngineError, ScheduleStore, Settings, StoreError, Transact};
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WeekChange {
    pub settings: Settings,
    pub entries: usize,
}

#[utoipa::path(
    post,
    path = "/v1/weeks/next",
    responses(
        (status = 200, description = "Week advanced and filled from the main schedule", body = WeekChange),
        (status = 400, description = "Stored week cannot be advanced", body = crate::error::ErrorBody)
    )
)]
pub async fn next(State(state): State<AppState>) -> Result<Json<WeekChange>, ApiError> {
    let change = state.store.transaction(|t| {
        let settings = next_week(t)?;
        let entries = t
            .current_entries(
                &sched_core::EntryFilter::semester(settings.current_semester)
                    .week(settings.current_week),
            )
            .len();
        Ok::<_, EngineError>(WeekChange { settings, entries })
    })?;
    Ok(Json(change))
}

#[utoipa::path(
    post,
    path = "/v1/weeks/clear",
    responses((status = 200, description = "Manual changes of the week dropped", body = WeekChange))
)]
pub async fn clear(State(state): State<AppState>) -> Result<Json<WeekChange>, ApiError> {
    let change = state.store.transaction(|t| {
        let entries = clear_week(t)?;
        Ok::<_, StoreError>(WeekChange {
            settings: t.settings(),
            entries,
        })
    })?;
    Ok(Json(change))
}

#[utoipa::path(
    post,
    path = "/v1/semesters/next",
    responses((status = 200, description = "Semester switched, week reset to 1", body = Settings))
)]
pub async fn next_semester(State(state): State<AppState>) -> Result<Json<Settings>, ApiError> {
    let settings = state
        .store
        .transaction(|t| Ok::<_, StoreError>(advance_semester(t)))?;
    Ok(Json(settings))
}
