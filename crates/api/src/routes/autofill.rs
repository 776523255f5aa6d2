use axum::{extract::State, http::StatusCode, Json};
use sched_core::stats::autofill_overview;
use sched_core::{ScheduleStore, Transact, ValidationError};
use serde::Serialize;
use types::{AutoFillLog, AutoFillOverview, FillRequest};
use utoipa::ToSchema;

use crate::error::{ApiError, ErrorBody};
use crate::state::AppState;

const LOG_PAGE: usize = 50;

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobCreated {
    pub job_id: String,
    pub status: &'static str,
}

#[utoipa::path(
    post,
    path = "/v1/autofill",
    request_body = FillRequest,
    responses(
        (status = 202, description = "Auto-fill job enqueued", body = JobCreated),
        (status = 400, description = "Invalid week or semester", body = ErrorBody)
    )
)]
pub async fn start(
    State(state): State<AppState>,
    Json(req): Json<FillRequest>,
) -> Result<(StatusCode, Json<JobCreated>), ApiError> {
    if !matches!(req.semester, 1 | 2) {
        return Err(ValidationError::InvalidSemester(req.semester).into());
    }
    if req.week == 0 {
        return Err(ApiError::bad_request("week numbers start at 1"));
    }
    let id = state.jobs.enqueue(req);
    Ok((
        StatusCode::ACCEPTED,
        Json(JobCreated {
            job_id: id.0,
            status: "queued",
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/v1/autofill/logs",
    responses((status = 200, description = "Latest auto-fill runs, newest first", body = [AutoFillLog]))
)]
pub async fn logs(State(state): State<AppState>) -> Json<Vec<AutoFillLog>> {
    Json(state.store.read(|t| t.recent_logs(LOG_PAGE)))
}

#[utoipa::path(
    get,
    path = "/v1/autofill/overview",
    responses((status = 200, description = "Groups, required hours and open conflicts", body = AutoFillOverview))
)]
pub async fn overview(State(state): State<AppState>) -> Json<AutoFillOverview> {
    Json(state.store.read(|t| autofill_overview(t, t.settings())))
}
