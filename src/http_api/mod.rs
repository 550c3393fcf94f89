use std::{net::SocketAddr, sync::Arc};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::{Local, NaiveDateTime};
use parking_lot::RwLock;
use serde::Serialize;
use serde_json::json;
use tracing::info;

use crate::{RefreshSummary, Schedule, ScheduleEntry, ScheduleError, ScheduleMetadata, TaskRecord};

type Clock = Arc<dyn Fn() -> NaiveDateTime + Send + Sync>;

#[derive(Clone)]
pub struct AppState {
    schedule: Arc<RwLock<Schedule>>,
    clock: Clock,
}

impl AppState {
    pub fn new(schedule: Schedule) -> Self {
        Self::with_shared(Arc::new(RwLock::new(schedule)))
    }

    pub fn with_shared(schedule: Arc<RwLock<Schedule>>) -> Self {
        Self {
            schedule,
            clock: Arc::new(|| Local::now().naive_local()),
        }
    }

    /// Replace the wall clock every request reads `now` from.
    pub fn with_clock(
        mut self,
        clock: impl Fn() -> NaiveDateTime + Send + Sync + 'static,
    ) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    fn schedule(&self) -> Arc<RwLock<Schedule>> {
        self.schedule.clone()
    }

    fn now(&self) -> NaiveDateTime {
        (self.clock)()
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
    Conflict(String),
    Invalid(String),
    InvalidGraph(String),
    OutOfRange(String),
}

impl ApiError {
    fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }
}

impl From<ScheduleError> for ApiError {
    fn from(value: ScheduleError) -> Self {
        let message = value.to_string();
        match value {
            ScheduleError::InvalidDependencyGraph { .. } => ApiError::InvalidGraph(message),
            ScheduleError::InvalidTask(_) => ApiError::Invalid(message),
            ScheduleError::ScheduleOutOfRange { .. } => ApiError::OutOfRange(message),
            ScheduleError::TaskNotFound(_) => ApiError::NotFound(message),
            ScheduleError::AlreadyCompleted(_) | ScheduleError::NotMarkable { .. } => {
                ApiError::Conflict(message)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, "not_found", message),
            ApiError::Conflict(message) => (StatusCode::CONFLICT, "conflict", message),
            ApiError::Invalid(message) => (StatusCode::BAD_REQUEST, "invalid_request", message),
            ApiError::InvalidGraph(message) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "invalid_dependency_graph",
                message,
            ),
            ApiError::OutOfRange(message) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "schedule_out_of_range",
                message,
            ),
        };
        (status, Json(ErrorBody { error, message })).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/metadata", get(get_metadata))
        .route("/tasks", get(list_tasks).post(create_task))
        .route("/tasks/:name/done", post(mark_done).delete(unmark_done))
        .route("/schedule", get(get_schedule))
        .route("/refresh", post(refresh_schedule))
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, schedule: Schedule) -> std::io::Result<()> {
    let state = AppState::new(schedule);
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "http api listening");
    axum::serve(listener, app).await
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn get_metadata(State(state): State<AppState>) -> Json<ScheduleMetadata> {
    let schedule = state.schedule();
    let metadata = {
        let guard = schedule.read();
        guard.metadata().clone()
    };
    Json(metadata)
}

async fn list_tasks(State(state): State<AppState>) -> Json<Vec<TaskRecord>> {
    let schedule = state.schedule();
    let tasks = {
        let guard = schedule.read();
        guard.tasks().to_vec()
    };
    Json(tasks)
}

async fn create_task(
    State(state): State<AppState>,
    Json(task): Json<TaskRecord>,
) -> Result<(StatusCode, Json<TaskRecord>), ApiError> {
    let schedule = state.schedule();
    {
        let mut guard = schedule.write();
        guard.add_task(task.clone())?;
    }
    Ok((StatusCode::CREATED, Json(task)))
}

async fn get_schedule(State(state): State<AppState>) -> Result<Json<Vec<ScheduleEntry>>, ApiError> {
    let now = state.now();
    let schedule = state.schedule();
    let entries = {
        let guard = schedule.read();
        guard.compute(now)?
    };
    Ok(Json(entries))
}

async fn mark_done(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Vec<ScheduleEntry>>, ApiError> {
    let now = state.now();
    let schedule = state.schedule();
    let entries = {
        let mut guard = schedule.write();
        guard.mark_done(&name, now)?;
        guard.compute(now)?
    };
    Ok(Json(entries))
}

async fn unmark_done(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<StatusCode, ApiError> {
    let schedule = state.schedule();
    let removed = {
        let mut guard = schedule.write();
        guard.unmark(&name)
    };
    if !removed {
        return Err(ApiError::not_found(format!("task '{name}' is not marked done")));
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn refresh_schedule(State(state): State<AppState>) -> Result<Json<RefreshSummary>, ApiError> {
    let now = state.now();
    let schedule = state.schedule();
    let summary = {
        let guard = schedule.read();
        guard.refresh(now)?
    };
    Ok(Json(summary))
}
