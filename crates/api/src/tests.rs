use autofill::AutoFillConfig;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use sched_core::{Catalog, Tables};
use serde_json::{json, Value};
use std::time::Duration;
use tower::ServiceExt;

use crate::router;
use crate::state::AppState;

fn catalog() -> Value {
    json!({
        "groups": [
            {"id": 1, "name": "101", "course": 1},
            {"id": 6, "name": "102", "course": 1}
        ],
        "teachers": [{"id": 2, "name": "T1"}],
        "subjects": [{"id": 3, "name": "Math"}, {"id": 8, "name": "Algebra"}],
        "rooms": [{"id": 4, "name": "A1"}, {"id": 7, "name": "A2"}],
        "groupSubjects": [
            {"id": 5, "groupId": 1, "subjectId": 3, "teacherId": 2, "hoursPerWeek": 4}
        ]
    })
}

fn app() -> Router {
    let catalog: Catalog = serde_json::from_value(catalog()).unwrap();
    let mut tables = Tables::new();
    tables.load_catalog(&catalog);
    router(AppState::new(tables, AutoFillConfig::default()))
}

async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let body = match body {
        Some(v) => Body::from(v.to_string()),
        None => Body::empty(),
    };
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(body)
        .unwrap();
    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, value)
}

fn entry(group: u32, room: u32, subject: u32, lesson: u8) -> Value {
    json!({
        "layer": "current",
        "groupId": group,
        "subjectId": subject,
        "teacherId": 2,
        "roomId": room,
        "day": "monday",
        "lessonNumber": lesson,
        "semester": 1,
        "week": 1
    })
}

#[tokio::test]
async fn health_and_docs() {
    let app = app();
    assert_eq!(
        call(&app, "GET", "/v1/health", None).await,
        (StatusCode::OK, Value::String("ok".into()))
    );
    let (status, doc) = call(&app, "GET", "/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"]["/v1/autofill"].is_object());
}

#[tokio::test]
async fn pair_tables() {
    let app = app();
    let (status, pairs) = call(&app, "GET", "/v1/pairs/saturday", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(pairs.as_array().map(Vec::len), Some(4));
    assert_eq!(pairs[0]["time"], "8:00-9:25");

    let (_, lessons) = call(&app, "GET", "/v1/pairs/thursday/0/lessons", None).await;
    assert_eq!(lessons, json!([{"lesson": 0, "time": "8:30-9:10"}]));

    let (status, _) = call(&app, "GET", "/v1/pairs/sunday", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn busy_teacher_is_rejected() {
    let app = app();
    let (status, created) = call(&app, "POST", "/v1/schedule", Some(entry(6, 7, 3, 2))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(created["id"].is_u64());

    let (status, err) = call(&app, "POST", "/v1/schedule", Some(entry(1, 4, 3, 2))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(err["code"], "SCHEDULE_CONFLICT");

    let (_, rows) = call(&app, "GET", "/v1/schedule/current", None).await;
    let rows = rows.as_array().cloned().unwrap_or_default();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["group"], "102");
    assert_eq!(rows[0]["isChanged"], true);
    assert_eq!(rows[0]["time"], "9:15-10:40");
}

#[tokio::test]
async fn zero_lesson_is_reserved() {
    let app = app();
    let (status, err) = call(&app, "POST", "/v1/schedule", Some(entry(1, 4, 8, 0))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["code"], "INVALID_INPUT");
    let (_, rows) = call(&app, "GET", "/v1/schedule/current", None).await;
    assert_eq!(rows, json!([]));
}

#[tokio::test]
async fn edit_and_delete_entries() {
    let app = app();
    let (_, created) = call(&app, "POST", "/v1/schedule", Some(entry(1, 4, 3, 3))).await;
    let id = created["id"].as_u64().unwrap();

    let (status, updated) = call(
        &app,
        "PUT",
        &format!("/v1/schedule/{id}"),
        Some(json!({"roomId": 7})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["roomId"], 7);

    let uri = format!("/v1/schedule/{id}");
    assert_eq!(call(&app, "DELETE", &uri, None).await.0, StatusCode::NO_CONTENT);
    assert_eq!(call(&app, "DELETE", &uri, None).await.0, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn autofill_runs_as_job() {
    let app = app();
    let (status, job) = call(
        &app,
        "POST",
        "/v1/autofill",
        Some(json!({"week": 1, "semester": 1, "type": "current", "seed": 5})),
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);
    let id = job["jobId"].as_str().unwrap().to_string();

    let mut done = false;
    for _ in 0..500 {
        let (_, st) = call(&app, "GET", &format!("/v1/jobs/{id}"), None).await;
        if st["status"] == "Done" {
            done = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert!(done);

    let (_, result) = call(&app, "GET", &format!("/v1/jobs/{id}/result"), None).await;
    assert_eq!(result, json!({"entriesAdded": 2, "conflicts": 0, "errors": 0}));

    let (_, logs) = call(&app, "GET", "/v1/autofill/logs", None).await;
    assert_eq!(logs[0]["entriesAdded"], 2);
    let (_, conflicts) = call(&app, "GET", "/v1/conflicts?week=1&semester=1", None).await;
    assert_eq!(conflicts, json!([]));
    let (_, stats) = call(&app, "GET", "/v1/statistics", None).await;
    assert_eq!(stats["groupStats"][0]["completedHours"], 4);

    let (status, _) = call(&app, "GET", "/v1/jobs/missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = call(
        &app,
        "POST",
        "/v1/autofill",
        Some(json!({"week": 1, "semester": 4})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn weeks_follow_the_main_template() {
    let app = app();
    let mut main = entry(1, 4, 3, 5);
    main["layer"] = json!("main");
    main["weekParity"] = json!("even");
    assert_eq!(
        call(&app, "POST", "/v1/schedule", Some(main)).await.0,
        StatusCode::CREATED
    );

    let (_, next) = call(&app, "POST", "/v1/weeks/next", None).await;
    assert_eq!(next["settings"]["currentWeek"], 2);
    assert_eq!(next["entries"], 1);

    let (_, cleared) = call(&app, "POST", "/v1/weeks/clear", None).await;
    assert_eq!(cleared["entries"], 1);

    let (_, sem) = call(&app, "POST", "/v1/semesters/next", None).await;
    assert_eq!(sem, json!({"currentWeek": 1, "currentSemester": 2}));
    let (_, overview) = call(&app, "GET", "/v1/semester-stats", None).await;
    assert_eq!(overview["semesters"][0]["mainEntriesCount"], 1);

    let last = json!({"currentWeek": u32::MAX, "currentSemester": 2});
    assert_eq!(
        call(&app, "POST", "/v1/settings", Some(last.clone())).await.0,
        StatusCode::OK
    );
    let (status, err) = call(&app, "POST", "/v1/weeks/next", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["code"], "INVALID_INPUT");
    assert_eq!(call(&app, "GET", "/v1/settings", None).await.1, last);
}

#[tokio::test]
async fn catalog_edits() {
    let app = app();
    let mut bad = catalog();
    bad["groupSubjects"][0]["teacherId"] = json!(99);
    let (status, rep) = call(&app, "PUT", "/v1/catalog", Some(bad)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(rep["ok"], false);

    let (status, created) = call(&app, "POST", "/v1/teachers", Some(json!({"name": "T2"}))).await;
    assert_eq!(status, StatusCode::CREATED);
    let t2 = created["id"].clone();
    let (status, _) = call(&app, "POST", "/v1/teachers", Some(json!({"name": "T2"}))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = call(
        &app,
        "PUT",
        "/v1/group-subjects",
        Some(json!({"groupId": 6, "subjectId": 8, "teacherId": t2, "hoursPerWeek": 2})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = call(
        &app,
        "PUT",
        "/v1/practices",
        Some(json!({"groupId": 6, "day": "Someday"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, cat) = call(&app, "GET", "/v1/catalog", None).await;
    assert_eq!(cat["groupSubjects"].as_array().map(Vec::len), Some(2));
    assert_eq!(cat["teachers"].as_array().map(Vec::len), Some(2));

    let (status, rep) = call(&app, "PUT", "/v1/catalog", Some(catalog())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(rep["ok"], true);
    let (_, cat) = call(&app, "GET", "/v1/catalog", None).await;
    assert_eq!(cat["teachers"].as_array().map(Vec::len), Some(1));
}
