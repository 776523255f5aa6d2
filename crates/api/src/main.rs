mod config;
mod error;
mod state;
mod telemetry;
pub mod routes {
    pub mod autofill;
    pub mod catalog;
    pub mod conflicts;
    pub mod health;
    pub mod jobs;
    pub mod schedule;
    pub mod settings;
    pub mod stats;
    pub mod timeslots;
    pub mod weeks;
}
#[cfg(test)]
mod tests;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::net::SocketAddr;

use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
        paths(
            routes::health::health,
            routes::settings::get_settings,
            routes::settings::set_settings,
            routes::timeslots::pairs,
            routes::timeslots::lessons,
            routes::schedule::current,
            routes::schedule::main_template,
            routes::schedule::create,
            routes::schedule::update,
            routes::schedule::remove_current,
            routes::schedule::remove_main,
            routes::autofill::start,
            routes::autofill::logs,
            routes::autofill::overview,
            routes::jobs::status,
            routes::jobs::result,
            routes::conflicts::conflicts,
            routes::weeks::next,
            routes::weeks::clear,
            routes::weeks::next_semester,
            routes::stats::statistics,
            routes::stats::load,
            routes::stats::semesters,
            routes::catalog::validate_handler,
            routes::catalog::get_catalog,
            routes::catalog::put_catalog,
            routes::catalog::add_group,
            routes::catalog::add_teacher,
            routes::catalog::add_subject,
            routes::catalog::add_room,
            routes::catalog::upsert_group_subject,
            routes::catalog::delete_group_subject,
            routes::catalog::set_practice,
            routes::catalog::delete_practice,
        ),
        components(schemas(
            types::Group, types::Teacher, types::Subject, types::Room, types::GroupSubject,
            types::GroupPractice, types::Catalog, types::Day, types::WeekParity, types::Layer,
            types::FillType, types::EntryDraft, types::NewEntry, types::EntryPatch,
            types::ScheduleEntry, types::MainScheduleEntry, types::EntryView, types::AutoFillLog,
            types::Settings, types::FillRequest, types::FillSummary, types::ConflictKind,
            types::Conflict, types::PairInfo, types::LessonInfo, types::SubjectLoad,
            types::GroupStats, types::TeacherGroupLoad, types::TeacherStats,
            types::WeekStatistics, types::TeacherLoad, types::SemesterCount,
            types::SemesterOverview, types::AutoFillOverview,
            types::TeacherId, types::GroupId, types::RoomId, types::SubjectId,
            types::GroupSubjectId, types::PracticeId, types::EntryId, types::LogId,
            jobs::JobId, jobs::JobStatus,
            error::ErrorBody,
            routes::autofill::JobCreated,
            routes::schedule::Created,
            routes::weeks::WeekChange,
            routes::catalog::ValidationReport,
            routes::catalog::NewGroup,
            routes::catalog::NewNamed,
            routes::catalog::CreatedId,
            routes::catalog::GroupSubjectIn,
            routes::catalog::PracticeIn,
        )),
        tags(
            (name = "timetable", description = "Timetable scheduling API")
        )
    )]
struct ApiDoc;

fn router(app_state: state::AppState) -> Router {
    Router::new()
        .route("/v1/health", get(routes::health::health))
        .route(
            "/v1/settings",
            get(routes::settings::get_settings).post(routes::settings::set_settings),
        )
        .route("/v1/pairs/:day", get(routes::timeslots::pairs))
        .route("/v1/pairs/:day/:pair/lessons", get(routes::timeslots::lessons))
        .route("/v1/schedule", post(routes::schedule::create))
        .route("/v1/schedule/current", get(routes::schedule::current))
        .route("/v1/schedule/main", get(routes::schedule::main_template))
        .route("/v1/schedule/main/:id", delete(routes::schedule::remove_main))
        .route(
            "/v1/schedule/:id",
            put(routes::schedule::update).delete(routes::schedule::remove_current),
        )
        .route("/v1/autofill", post(routes::autofill::start))
        .route("/v1/autofill/logs", get(routes::autofill::logs))
        .route("/v1/autofill/overview", get(routes::autofill::overview))
        .route("/v1/jobs/:id", get(routes::jobs::status))
        .route("/v1/jobs/:id/result", get(routes::jobs::result))
        .route("/v1/conflicts", get(routes::conflicts::conflicts))
        .route("/v1/weeks/next", post(routes::weeks::next))
        .route("/v1/weeks/clear", post(routes::weeks::clear))
        .route("/v1/semesters/next", post(routes::weeks::next_semester))
        .route("/v1/statistics", get(routes::stats::statistics))
        .route("/v1/teacher-load", get(routes::stats::load))
        .route("/v1/semester-stats", get(routes::stats::semesters))
        .route("/v1/validate", post(routes::catalog::validate_handler))
        .route(
            "/v1/catalog",
            get(routes::catalog::get_catalog).put(routes::catalog::put_catalog),
        )
        .route("/v1/groups", post(routes::catalog::add_group))
        .route("/v1/teachers", post(routes::catalog::add_teacher))
        .route("/v1/subjects", post(routes::catalog::add_subject))
        .route("/v1/rooms", post(routes::catalog::add_room))
        .route("/v1/group-subjects", put(routes::catalog::upsert_group_subject))
        .route(
            "/v1/group-subjects/:id",
            delete(routes::catalog::delete_group_subject),
        )
        .route("/v1/practices", put(routes::catalog::set_practice))
        .route("/v1/practices/:group", delete(routes::catalog::delete_practice))
        .merge(SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))
        .layer(telemetry::stack())
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = config::Config::from_env()?;
    telemetry::init(config.log_format);

    let app_state = state::AppState::from_config(&config)?;
    let app = router(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!(%addr, "listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
