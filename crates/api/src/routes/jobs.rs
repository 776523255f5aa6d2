use axum::{
    extract::{Path, State},
    Json,
};
use jobs::JobStatus;
use types::FillSummary;

use crate::error::{ApiError, ErrorBody};
use crate::state::AppState;

#[utoipa::path(
        get,
        path = "/v1/jobs/{id}",
        params(("id" = String, Path, description = "Job ID")),
        responses(
            (status = 200, description = "Job status", body = JobStatus),
            (status = 404, description = "Unknown job", body = ErrorBody)
        )
    )]
pub async fn status(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<JobStatus>, ApiError> {
    state
        .jobs
        .get(&id)
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("job {id} not found")))
}

#[utoipa::path(
        get,
        path = "/v1/jobs/{id}/result",
        params(("id" = String, Path, description = "Job ID")),
        responses(
            (status = 200, description = "Auto-fill summary (if ready)", body = FillSummary),
            (status = 404, description = "Unknown or unfinished job", body = ErrorBody)
        )
    )]
pub async fn result(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<FillSummary>, ApiError> {
    match state.jobs.get(&id) {
        Some(JobStatus::Done { result }) => Ok(Json(result)),
        Some(JobStatus::Failed { message }) => Err(ApiError::bad_request(message)),
        Some(_) => Err(ApiError::not_found(format!("job {id} is not finished"))),
        None => Err(ApiError::not_found(format!("job {id} not found"))),
    }
}
