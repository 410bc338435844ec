#![cfg(feature = "http_api")]

use axum::{
    body::{self, Body},
    http::{Request, StatusCode},
    response::Response,
};
use serde_json::{Value, json};
use tower::util::ServiceExt;
use wbs_scheduler::{Task, http_api};

fn new_router() -> axum::Router {
    http_api::router(http_api::AppState::new())
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn body_json(response: Response) -> Value {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn project() -> Value {
    json!({
        "ticket_id": "TCK-9",
        "developer": "dana",
        "ba": "sam",
        "start_date": "2024-01-01"
    })
}

#[tokio::test]
async fn endpoints_require_a_generated_schedule() {
    let app = new_router();
    let response = app.clone().oneshot(get("/tasks")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"], "not_found");

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn generate_rejects_incomplete_project() {
    let app = new_router();
    let response = app
        .oneshot(json_request(
            "POST",
            "/schedule",
            json!({ "ticket_id": "TCK-9", "developer": "dana" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "invalid_request");
}

#[tokio::test]
async fn schedule_lifecycle_via_http_api() {
    let app = new_router();

    let response = app
        .clone()
        .oneshot(json_request("POST", "/schedule", project()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let view = body_json(response).await;
    assert_eq!(view["tasks"].as_array().unwrap().len(), 6);
    assert_eq!(view["summary"]["total"], 6.0);

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/tasks/design/effort",
            json!({ "effort": "2.5" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let tasks: Vec<Task> = serde_json::from_value(body_json(response).await).unwrap();
    let golive = tasks.iter().find(|t| t.id == "golive").unwrap();
    assert_eq!(golive.end_date.unwrap().to_string(), "2024-01-10");

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/tasks/coding/effort",
            json!({ "effort": "abc" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.clone().oneshot(get("/tasks/coding")).await.unwrap();
    let coding: Task = serde_json::from_value(body_json(response).await).unwrap();
    assert_eq!(coding.effort, 0.1);

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/tasks/coding/progress",
            json!({ "percent_complete": "40%" }),
        ))
        .await
        .unwrap();
    let coding: Task = serde_json::from_value(body_json(response).await).unwrap();
    assert_eq!(coding.percent_complete, "40%");

    let response = app.clone().oneshot(get("/unscheduled")).await.unwrap();
    assert_eq!(body_json(response).await, json!([]));
}

#[tokio::test]
async fn unknown_task_is_not_found() {
    let app = new_router();
    app.clone()
        .oneshot(json_request("POST", "/schedule", project()))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(json_request("PUT", "/tasks/nope/effort", json!({ "effort": 2 })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.oneshot(get("/tasks/nope")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn wbs_export_returns_csv() {
    let app = new_router();
    app.clone()
        .oneshot(json_request("POST", "/schedule", project()))
        .await
        .unwrap();
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/export/wbs")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.starts_with("Task Name,"));
    assert!(text.contains("TCK-9"));
}

#[tokio::test]
async fn oversized_effort_leaves_tasks_unscheduled() {
    let app = new_router();
    app.clone()
        .oneshot(json_request("POST", "/schedule", project()))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/tasks/design/effort",
            json!({ "effort": 1.0e8 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get("/unscheduled")).await.unwrap();
    let body = body_json(response).await;
    assert_eq!(body.as_array().unwrap().len(), 6);
    assert_eq!(body[0]["id"], "design");
    assert_eq!(body[0]["issue"]["kind"], "date_out_of_range");
}
