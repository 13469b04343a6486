use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Local;
use serde::Deserialize;
use serde_json::json;

use super::AppState;
use crate::calendar::{self, weekday_from_index};
use crate::db::{settings_repo, task_repo};
use crate::error::PearlError;
use crate::models::date::parse_month;
use crate::models::{NewTask, SettingsPatch, TaskPatch};
use crate::output;
use crate::recurrence::preview::PreviewRequest;
use crate::stats;

type ApiResult = Result<Response, PearlError>;

fn ok(data: serde_json::Value) -> Response {
    Json(output::json::success(data)).into_response()
}

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, PearlError> {
    payload
        .map(|Json(value)| value)
        .map_err(|e| PearlError::validation(e.body_text()))
}

pub async fn root() -> &'static str {
    "Task Management API"
}

pub async fn health(State(state): State<AppState>) -> ApiResult {
    let (tasks, database) = state
        .with_store(|store| {
            let tasks = task_repo::count_tasks(store.conn())?;
            Ok((tasks, store.path().map(|p| p.display().to_string())))
        })
        .await?;
    Ok(ok(json!({
        "status": "ok",
        "tasks": tasks,
        "database": database,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    })))
}

pub async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not Found")
}

// ─── tasks ─────────────────────────────────────────────────────────

pub async fn list_tasks(State(state): State<AppState>) -> ApiResult {
    let tasks = state
        .with_store(|store| task_repo::list_tasks(store.conn()))
        .await?;
    Ok(ok(json!(tasks)))
}

pub async fn get_task(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult {
    let task = state
        .with_store(move |store| task_repo::get_task_by_id(store.conn(), &id))
        .await?;
    Ok(ok(json!(task)))
}

pub async fn create_task(
    State(state): State<AppState>,
    payload: Result<Json<NewTask>, JsonRejection>,
) -> ApiResult {
    let draft = body(payload)?.validate()?;
    let task = state
        .with_store(move |store| task_repo::create_task(store.conn(), &draft))
        .await?;
    Ok((StatusCode::CREATED, Json(output::json::success(json!(task)))).into_response())
}

pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<TaskPatch>, JsonRejection>,
) -> ApiResult {
    task_repo::validate_id(&id)?;
    let changes = body(payload)?.validate()?;
    let task = state
        .with_store(move |store| task_repo::update_task(store.conn(), &id, &changes))
        .await?;
    Ok(ok(json!(task)))
}

pub async fn delete_task(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult {
    let task = state
        .with_store(move |store| task_repo::delete_task(store.conn(), &id))
        .await?;
    Ok(ok(json!({
        "message": "Task deleted successfully",
        "deleted": task
    })))
}

// ─── settings ──────────────────────────────────────────────────────

pub async fn get_settings(State(state): State<AppState>) -> ApiResult {
    let settings = state
        .with_store(|store| settings_repo::get_or_create_settings(store.conn()))
        .await?;
    Ok(ok(json!(settings)))
}

pub async fn update_settings(
    State(state): State<AppState>,
    payload: Result<Json<SettingsPatch>, JsonRejection>,
) -> ApiResult {
    let changes = body(payload)?.validate()?;
    let settings = state
        .with_store(move |store| settings_repo::update_settings(store.conn(), &changes))
        .await?;
    Ok(ok(json!(settings)))
}

// ─── views ─────────────────────────────────────────────────────────

pub async fn preview_recurrence(payload: Result<Json<PreviewRequest>, JsonRejection>) -> ApiResult {
    let preview = body(payload)?.run()?;
    Ok(ok(json!(preview)))
}

#[derive(Debug, Deserialize)]
pub struct CalendarQuery {
    pub month: Option<String>,
    pub start_of_week: Option<u8>,
}

pub async fn calendar(
    State(state): State<AppState>,
    query: Result<Query<CalendarQuery>, QueryRejection>,
) -> ApiResult {
    let Query(query) = query.map_err(|e| PearlError::validation(e.body_text()))?;
    let reference = match query.month.as_deref() {
        Some(month) => parse_month(month)?,
        None => Local::now().date_naive(),
    };

    let view = state
        .with_store(move |store| {
            let index = match query.start_of_week {
                Some(index) => index,
                None => settings_repo::get_or_create_settings(store.conn())?.start_day_of_week,
            };
            let start_of_week = weekday_from_index(index).ok_or_else(|| {
                PearlError::validation(format!(
                    "start_of_week must be between 0 and 6, got {index}"
                ))
            })?;
            let tasks = task_repo::list_tasks(store.conn())?;
            Ok(calendar::month_view(reference, start_of_week, &tasks))
        })
        .await?;
    Ok(ok(json!(view)))
}

pub async fn statistics(State(state): State<AppState>) -> ApiResult {
    let tasks = state
        .with_store(|store| task_repo::list_tasks(store.conn()))
        .await?;
    Ok(ok(json!(stats::compute(&tasks))))
}
