use std::{net::SocketAddr, sync::Arc};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::{
    EffortSummary, MIN_EFFORT, ProjectInfo, Schedule, ScheduleError, Task, UnscheduledTask,
};

/// Shared host state. `None` until a schedule has been generated.
#[derive(Clone, Default)]
pub struct AppState {
    schedule: Arc<RwLock<Option<Schedule>>>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_schedule(schedule: Schedule) -> Self {
        Self {
            schedule: Arc::new(RwLock::new(Some(schedule))),
        }
    }

    fn schedule(&self) -> Arc<RwLock<Option<Schedule>>> {
        self.schedule.clone()
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

#[derive(Debug)]
enum ApiError {
    NotFound(String),
    Invalid(String),
}

impl ApiError {
    fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    fn no_schedule() -> Self {
        ApiError::not_found("no schedule has been generated")
    }
}

impl From<ScheduleError> for ApiError {
    fn from(value: ScheduleError) -> Self {
        match value {
            ScheduleError::TaskNotFound(_) => ApiError::NotFound(value.to_string()),
            ScheduleError::Project(_) => ApiError::Invalid(value.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound(message) => {
                let body = Json(ErrorBody {
                    error: "not_found",
                    message,
                });
                (StatusCode::NOT_FOUND, body).into_response()
            }
            ApiError::Invalid(message) => {
                let body = Json(ErrorBody {
                    error: "invalid_request",
                    message,
                });
                (StatusCode::BAD_REQUEST, body).into_response()
            }
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ScheduleView {
    pub project: ProjectInfo,
    pub tasks: Vec<Task>,
    pub summary: EffortSummary,
    pub unscheduled: Vec<UnscheduledTask>,
}

impl ScheduleView {
    fn of(schedule: &Schedule) -> Self {
        Self {
            project: schedule.project().clone(),
            tasks: schedule.tasks().to_vec(),
            summary: schedule.summary(),
            unscheduled: schedule.unscheduled(),
        }
    }
}

/// Effort arrives as whatever the form sent; anything unparsable becomes
/// the minimum effort.
#[derive(Debug, Deserialize)]
struct EffortPayload {
    #[serde(default)]
    effort: Value,
}

impl EffortPayload {
    fn days(&self) -> f64 {
        match &self.effort {
            Value::Number(n) => n.as_f64().unwrap_or(MIN_EFFORT),
            Value::String(s) => s.trim().parse().unwrap_or(MIN_EFFORT),
            _ => MIN_EFFORT,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ProgressPayload {
    percent_complete: String,
}

#[derive(Debug, Deserialize)]
struct ResourcePayload {
    resource_name: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/schedule", get(get_schedule).post(generate))
        .route("/tasks", get(list_tasks))
        .route("/tasks/:id", get(get_task))
        .route("/tasks/:id/effort", put(update_effort))
        .route("/tasks/:id/progress", put(update_progress))
        .route("/tasks/:id/resource", put(update_resource))
        .route("/summary", get(get_summary))
        .route("/unscheduled", get(list_unscheduled))
        .route("/export/wbs", post(export_wbs))
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, state: AppState) -> std::io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "HTTP API listening");
    axum::serve(listener, app).await
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn generate(
    State(state): State<AppState>,
    Json(project): Json<ProjectInfo>,
) -> Result<(StatusCode, Json<ScheduleView>), ApiError> {
    let schedule = Schedule::generate(project)?;
    let view = ScheduleView::of(&schedule);
    *state.schedule().write() = Some(schedule);
    Ok((StatusCode::CREATED, Json(view)))
}

async fn get_schedule(State(state): State<AppState>) -> Result<Json<ScheduleView>, ApiError> {
    let shared = state.schedule();
    let guard = shared.read();
    let schedule = guard.as_ref().ok_or_else(ApiError::no_schedule)?;
    Ok(Json(ScheduleView::of(schedule)))
}

async fn list_tasks(State(state): State<AppState>) -> Result<Json<Vec<Task>>, ApiError> {
    let shared = state.schedule();
    let guard = shared.read();
    let schedule = guard.as_ref().ok_or_else(ApiError::no_schedule)?;
    Ok(Json(schedule.tasks().to_vec()))
}

async fn get_task(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> Result<Json<Task>, ApiError> {
    let shared = state.schedule();
    let guard = shared.read();
    let schedule = guard.as_ref().ok_or_else(ApiError::no_schedule)?;
    schedule
        .find_task(&task_id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("task '{task_id}' not found")))
}

async fn update_effort(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
    Json(payload): Json<EffortPayload>,
) -> Result<Json<Vec<Task>>, ApiError> {
    let shared = state.schedule();
    let mut guard = shared.write();
    let schedule = guard.as_mut().ok_or_else(ApiError::no_schedule)?;
    let tasks = schedule.update_effort(&task_id, payload.days())?;
    Ok(Json(tasks.to_vec()))
}

async fn update_progress(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
    Json(payload): Json<ProgressPayload>,
) -> Result<Json<Task>, ApiError> {
    let shared = state.schedule();
    let mut guard = shared.write();
    let schedule = guard.as_mut().ok_or_else(ApiError::no_schedule)?;
    let task = schedule.set_percent_complete(&task_id, payload.percent_complete)?;
    Ok(Json(task.clone()))
}

async fn update_resource(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
    Json(payload): Json<ResourcePayload>,
) -> Result<Json<Task>, ApiError> {
    let shared = state.schedule();
    let mut guard = shared.write();
    let schedule = guard.as_mut().ok_or_else(ApiError::no_schedule)?;
    let task = schedule.set_resource_name(&task_id, payload.resource_name)?;
    Ok(Json(task.clone()))
}

async fn get_summary(State(state): State<AppState>) -> Result<Json<EffortSummary>, ApiError> {
    let shared = state.schedule();
    let guard = shared.read();
    let schedule = guard.as_ref().ok_or_else(ApiError::no_schedule)?;
    Ok(Json(schedule.summary()))
}

async fn list_unscheduled(
    State(state): State<AppState>,
) -> Result<Json<Vec<UnscheduledTask>>, ApiError> {
    let shared = state.schedule();
    let guard = shared.read();
    let schedule = guard.as_ref().ok_or_else(ApiError::no_schedule)?;
    Ok(Json(schedule.unscheduled()))
}

/// WBS sheet as CSV text.
async fn export_wbs(State(state): State<AppState>) -> Result<Response, ApiError> {
    let shared = state.schedule();
    let guard = shared.read();
    let schedule = guard.as_ref().ok_or_else(ApiError::no_schedule)?;
    let mut buffer = Vec::new();
    crate::export::write_wbs_csv(&mut buffer, schedule.project(), schedule.tasks())
        .map_err(|err| ApiError::Invalid(err.to_string()))?;
    Ok(([("content-type", "text/csv")], buffer).into_response())
}
