use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use sched_core::{validate, Catalog, StoreError, Transact, ValidationError};
use serde::{Deserialize, Serialize};
use tracing::info;
use types::{GroupId, GroupSubjectId, PracticeId, RoomId, SubjectId, TeacherId};
use utoipa::ToSchema;

use crate::error::{ApiError, ErrorBody};
use crate::state::AppState;

#[derive(Serialize, ToSchema)]
pub struct ValidationReport {
    pub ok: bool,
    #[serde(default)]
    pub errors: Vec<String>,
}

fn report(catalog: &Catalog) -> ValidationReport {
    match validate(catalog) {
        Ok(()) => ValidationReport {
            ok: true,
            errors: vec![],
        },
        Err(ValidationError::Msg(msg)) => ValidationReport {
            ok: false,
            errors: msg
                .split(';')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        },
        Err(other) => ValidationReport {
            ok: false,
            errors: vec![other.to_string()],
        },
    }
}

#[utoipa::path(
    post,
    path = "/v1/validate",
    request_body = Catalog,
    responses(
    (status = 200, description = "Validation result", body = ValidationReport)
    )
)]
pub async fn validate_handler(Json(catalog): Json<Catalog>) -> Json<ValidationReport> {
    Json(report(&catalog))
}

#[utoipa::path(
    get,
    path = "/v1/catalog",
    responses((status = 200, description = "Reference data and requirements", body = Catalog))
)]
pub async fn get_catalog(State(state): State<AppState>) -> Json<Catalog> {
    Json(state.store.read(|t| t.catalog()))
}

#[utoipa::path(
    put,
    path = "/v1/catalog",
    request_body = Catalog,
    responses(
        (status = 200, description = "Catalog replaced; both schedule layers cleared", body = ValidationReport),
        (status = 422, description = "Catalog rejected", body = ValidationReport)
    )
)]
pub async fn put_catalog(
    State(state): State<AppState>,
    Json(catalog): Json<Catalog>,
) -> Result<(StatusCode, Json<ValidationReport>), ApiError> {
    let rep = report(&catalog);
    if !rep.ok {
        return Ok((StatusCode::UNPROCESSABLE_ENTITY, Json(rep)));
    }
    state.store.transaction(|t| {
        t.load_catalog(&catalog);
        Ok::<_, StoreError>(())
    })?;
    info!(
        groups = catalog.groups.len(),
        requirements = catalog.group_subjects.len(),
        "catalog replaced"
    );
    Ok((StatusCode::OK, Json(rep)))
}

#[derive(Deserialize, ToSchema)]
pub struct NewGroup {
    pub name: String,
    pub course: u32,
}

#[derive(Deserialize, ToSchema)]
pub struct NewNamed {
    pub name: String,
}

#[derive(Serialize, ToSchema)]
pub struct CreatedId {
    pub id: u32,
}

#[utoipa::path(
    post,
    path = "/v1/groups",
    request_body = NewGroup,
    responses((status = 201, description = "Group created", body = CreatedId), (status = 409, description = "Name taken", body = ErrorBody))
)]
pub async fn add_group(
    State(state): State<AppState>,
    Json(req): Json<NewGroup>,
) -> Result<(StatusCode, Json<CreatedId>), ApiError> {
    if req.course == 0 {
        return Err(ApiError::bad_request("course starts at 1"));
    }
    let GroupId(id) = state
        .store
        .transaction(|t| t.add_group(&req.name, req.course))?;
    Ok((StatusCode::CREATED, Json(CreatedId { id })))
}

#[utoipa::path(
    post,
    path = "/v1/teachers",
    request_body = NewNamed,
    responses((status = 201, description = "Teacher created", body = CreatedId), (status = 409, description = "Name taken", body = ErrorBody))
)]
pub async fn add_teacher(
    State(state): State<AppState>,
    Json(req): Json<NewNamed>,
) -> Result<(StatusCode, Json<CreatedId>), ApiError> {
    let TeacherId(id) = state.store.transaction(|t| t.add_teacher(&req.name))?;
    Ok((StatusCode::CREATED, Json(CreatedId { id })))
}

#[utoipa::path(
    post,
    path = "/v1/subjects",
    request_body = NewNamed,
    responses((status = 201, description = "Subject created", body = CreatedId), (status = 409, description = "Name taken", body = ErrorBody))
)]
pub async fn add_subject(
    State(state): State<AppState>,
    Json(req): Json<NewNamed>,
) -> Result<(StatusCode, Json<CreatedId>), ApiError> {
    let SubjectId(id) = state.store.transaction(|t| t.add_subject(&req.name))?;
    Ok((StatusCode::CREATED, Json(CreatedId { id })))
}

#[utoipa::path(
    post,
    path = "/v1/rooms",
    request_body = NewNamed,
    responses((status = 201, description = "Room created", body = CreatedId), (status = 409, description = "Name taken", body = ErrorBody))
)]
pub async fn add_room(
    State(state): State<AppState>,
    Json(req): Json<NewNamed>,
) -> Result<(StatusCode, Json<CreatedId>), ApiError> {
    let RoomId(id) = state.store.transaction(|t| t.add_room(&req.name))?;
    Ok((StatusCode::CREATED, Json(CreatedId { id })))
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GroupSubjectIn {
    pub group_id: GroupId,
    pub subject_id: SubjectId,
    #[serde(default)]
    pub teacher_id: Option<TeacherId>,
    pub hours_per_week: u32,
    #[serde(default)]
    pub total_hours_semester1: u32,
    #[serde(default)]
    pub total_hours_semester2: u32,
}

#[utoipa::path(
    put,
    path = "/v1/group-subjects",
    request_body = GroupSubjectIn,
    responses((status = 200, description = "Requirement stored for (group, subject)", body = CreatedId), (status = 400, description = "Unknown reference", body = ErrorBody))
)]
pub async fn upsert_group_subject(
    State(state): State<AppState>,
    Json(req): Json<GroupSubjectIn>,
) -> Result<Json<CreatedId>, ApiError> {
    let GroupSubjectId(id) = state.store.transaction(|t| {
        t.upsert_group_subject(
            req.group_id,
            req.subject_id,
            req.teacher_id,
            req.hours_per_week,
            (req.total_hours_semester1, req.total_hours_semester2),
        )
    })?;
    Ok(Json(CreatedId { id }))
}

#[utoipa::path(
    delete,
    path = "/v1/group-subjects/{id}",
    params(("id" = u32, Path, description = "Requirement id")),
    responses((status = 204, description = "Deleted"), (status = 404, description = "No such requirement", body = ErrorBody))
)]
pub async fn delete_group_subject(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Result<StatusCode, ApiError> {
    state
        .store
        .transaction(|t| t.delete_group_subject(GroupSubjectId(id)))?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PracticeIn {
    pub group_id: GroupId,
    pub day: String,
    #[serde(default)]
    pub subject_id: Option<SubjectId>,
    #[serde(default)]
    pub teacher_id: Option<TeacherId>,
    #[serde(default)]
    pub room_id: Option<RoomId>,
}

#[utoipa::path(
    put,
    path = "/v1/practices",
    request_body = PracticeIn,
    responses((status = 200, description = "Practice of the group set", body = CreatedId), (status = 400, description = "Unknown day or reference", body = ErrorBody))
)]
pub async fn set_practice(
    State(state): State<AppState>,
    Json(req): Json<PracticeIn>,
) -> Result<Json<CreatedId>, ApiError> {
    if req.day.parse::<types::Day>().is_err() {
        return Err(ValidationError::UnknownDay(req.day).into());
    }
    let PracticeId(id) = state.store.transaction(|t| {
        t.set_practice(req.group_id, &req.day, req.subject_id, req.teacher_id, req.room_id)
    })?;
    Ok(Json(CreatedId { id }))
}

#[utoipa::path(
    delete,
    path = "/v1/practices/{group}",
    params(("group" = u32, Path, description = "Group id")),
    responses((status = 204, description = "Deleted"), (status = 404, description = "Group has no practice", body = ErrorBody))
)]
pub async fn delete_practice(
    State(state): State<AppState>,
    Path(group): Path<u32>,
) -> Result<StatusCode, ApiError> {
    state
        .store
        .transaction(|t| t.delete_practice(GroupId(group)))?;
    Ok(StatusCode::NO_CONTENT)
}
