use axum::{extract::Path, Json};
use sched_core::timeslot::{lessons_of_pair, pairs_of_day};
use types::{Day, LessonInfo, PairInfo};

use crate::error::ApiError;

fn parse_day(raw: &str) -> Result<Day, ApiError> {
    raw.parse().map_err(|e: types::ParseDayError| ApiError::bad_request(e.to_string()))
}

#[utoipa::path(
    get,
    path = "/v1/pairs/{day}",
    params(("day" = String, Path, description = "Day name, e.g. monday")),
    responses((status = 200, description = "Pairs held on the day", body = [PairInfo]))
)]
pub async fn pairs(Path(day): Path<String>) -> Result<Json<Vec<PairInfo>>, ApiError> {
    Ok(Json(pairs_of_day(parse_day(&day)?)))
}

#[utoipa::path(
    get,
    path = "/v1/pairs/{day}/{pair}/lessons",
    params(
        ("day" = String, Path, description = "Day name"),
        ("pair" = u8, Path, description = "Pair number")
    ),
    responses((status = 200, description = "Lessons of the pair; empty if the pair is not held", body = [LessonInfo]))
)]
pub async fn lessons(Path((day, pair)): Path<(String, u8)>) -> Result<Json<Vec<LessonInfo>>, ApiError> {
    Ok(Json(lessons_of_pair(parse_day(&day)?, pair)))
}
