use axum::{extract::State, Json};
use sched_core::{ScheduleStore, Settings, Transact, ValidationError};

use crate::error::ApiError;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/v1/settings",
    responses((status = 200, description = "Current week and semester", body = Settings))
)]
pub async fn get_settings(State(state): State<AppState>) -> Json<Settings> {
    Json(state.store.read(|t| t.settings()))
}

#[utoipa::path(
    post,
    path = "/v1/settings",
    request_body = Settings,
    responses(
        (status = 200, description = "Stored", body = Settings),
        (status = 400, description = "Week 0 or unknown semester", body = crate::error::ErrorBody)
    )
)]
pub async fn set_settings(
    State(state): State<AppState>,
    Json(settings): Json<Settings>,
) -> Result<Json<Settings>, ApiError> {
    if !matches!(settings.current_semester, 1 | 2) {
        return Err(ValidationError::InvalidSemester(settings.current_semester).into());
    }
    if settings.current_week == 0 {
        return Err(ApiError::bad_request("week numbers start at 1"));
    }
    state.store.transaction(|t| {
        t.set_settings(settings);
        Ok::<_, ApiError>(())
    })?;
    Ok(Json(settings))
}
