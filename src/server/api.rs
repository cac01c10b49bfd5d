use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{FromRequestParts, Path, State, rejection::JsonRejection},
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
    routing::{get, patch, post},
};
use taskboard_common::{NewTask, TaskPatch, TaskUpdate, USER_HEADER, User};

use super::db::{DbHandle, StoreError};

// ── Shared application state ──────────────────────────────────────────

pub struct AppState {
    pub db: DbHandle,
}

pub type SharedState = Arc<AppState>;

// ── Error handling ────────────────────────────────────────────────────

#[derive(Debug)]
pub enum ApiError {
    Unauthorized,
    Forbidden(String),
    NotFound(String),
    BadRequest(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                format!("Missing {} header", USER_HEADER),
            ),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        (status, Json(serde_json::json!({"error": message}))).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => ApiError::NotFound(err.to_string()),
            StoreError::Forbidden(_) => ApiError::Forbidden(err.to_string()),
            StoreError::Invalid(msg) => ApiError::BadRequest(msg),
            StoreError::Storage(e) => {
                tracing::error!(error = %format!("{:#}", e), "storage failure");
                ApiError::Internal(e.to_string())
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

// ── Caller identity ───────────────────────────────────────────────────

/// The user a request acts for, taken from the `x-user-id` header.
pub struct Caller(pub User);

impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get(USER_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or(ApiError::Unauthorized)?;
        Ok(Caller(User::new(user_id)))
    }
}

// ── Router ────────────────────────────────────────────────────────────

pub fn api_router() -> Router<SharedState> {
    Router::new()
        .route("/api/columns", get(list_columns))
        .route("/api/tasks", post(create_task))
        .route("/api/tasks/{id}", patch(update_task).delete(delete_task))
        .route("/health", get(health_check))
}

// ── Handlers ──────────────────────────────────────────────────────────

async fn health_check() -> &'static str {
    "ok"
}

async fn list_columns(
    State(state): State<SharedState>,
    Caller(user): Caller,
) -> Result<impl IntoResponse, ApiError> {
    let columns = state.db.call(move |db| db.list_columns(&user.id)).await?;
    Ok(Json(columns))
}

async fn create_task(
    State(state): State<SharedState>,
    Caller(user): Caller,
    body: Result<Json<NewTask>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = body?;
    let task = state
        .db
        .call(move |db| db.create_task(&user.id, &req))
        .await?;
    tracing::debug!(task_id = %task.id, column = %task.column_id, "task created");
    Ok((StatusCode::CREATED, Json(task)))
}

async fn update_task(
    State(state): State<SharedState>,
    Caller(user): Caller,
    Path(id): Path<String>,
    body: Result<Json<TaskPatch>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(patch) = body?;
    let update = TaskUpdate {
        id,
        title: patch.title,
        description: patch.description,
        column_id: patch.column_id,
    };
    let task = state
        .db
        .call(move |db| db.update_task(&user.id, &update))
        .await?;
    Ok(Json(task))
}

async fn delete_task(
    State(state): State<SharedState>,
    Caller(user): Caller,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .db
        .call(move |db| db.delete_task(&user.id, &id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
