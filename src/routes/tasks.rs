//!
//! # Task Routes
//!
//! Owner-scoped task CRUD. Every operation filters by the authenticated
//! identity, so another user's task is indistinguishable from a missing one.

use crate::{
    auth::AuthSession,
    error::AppError,
    models::{Task, TaskInput, TaskListQuery, TaskUpdate},
    state::AppState,
};
use actix_web::{delete, get, patch, post, web, HttpResponse, Responder};
use serde_json::Value;
use uuid::Uuid;

use crate::store::{SortDirection, TaskListOptions, TaskSort, TaskSortKey};

const TASK_UPDATE_FIELDS: [&str; 2] = ["description", "completed"];

fn parse_task_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::InvalidId)
}

/// Parses `field:direction`. `desc` reverses; anything else, including an
/// absent direction, is ascending. An unknown field means no explicit sort.
fn parse_sort(raw: &str) -> Option<TaskSort> {
    let mut parts = raw.splitn(2, ':');
    let key = match parts.next().unwrap_or("") {
        "description" => TaskSortKey::Description,
        "completed" => TaskSortKey::Completed,
        "createdAt" => TaskSortKey::CreatedAt,
        "updatedAt" => TaskSortKey::UpdatedAt,
        _ => return None,
    };
    let direction = if parts.next() == Some("desc") {
        SortDirection::Desc
    } else {
        SortDirection::Asc
    };
    Some(TaskSort { key, direction })
}

/// Create a task owned by the authenticated user.
///
/// Any `owner` value in the payload is ignored; ownership always comes from
/// the session.
#[post("")]
pub async fn create_task(
    state: web::Data<AppState>,
    session: AuthSession,
    payload: web::Json<TaskInput>,
) -> Result<impl Responder, AppError> {
    let task = Task::new(payload.into_inner(), session.user.id)?;
    let task = state.store.insert_task(task).await?;

    Ok(HttpResponse::Created().json(task))
}

/// List the authenticated user's tasks.
///
/// Query parameters: `completed` (boolean filter), `sortBy=field:direction`,
/// `limit` and `skip` for pagination. Malformed values fail the query-string
/// deserialization with a 400 before this handler runs.
#[get("")]
pub async fn list_tasks(
    state: web::Data<AppState>,
    session: AuthSession,
    query: web::Query<TaskListQuery>,
) -> Result<impl Responder, AppError> {
    let query = query.into_inner();
    let options = TaskListOptions {
        completed: query.completed,
        sort: query.sort_by.as_deref().and_then(parse_sort),
        limit: query.limit.map(|v| v as usize),
        skip: query.skip.map(|v| v as usize),
    };

    let tasks = state.store.list_tasks(session.user.id, options).await?;
    Ok(HttpResponse::Ok().json(tasks))
}

/// Fetch one task by id, scoped to the authenticated owner.
#[get("/{id}")]
pub async fn get_task(
    state: web::Data<AppState>,
    session: AuthSession,
    path: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let id = parse_task_id(&path)?;

    let task = state
        .store
        .find_task(session.user.id, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".into()))?;

    Ok(HttpResponse::Ok().json(task))
}

/// Update one task. The raw key set is checked against the
/// `{description, completed}` allow-list before the id is even looked at.
#[patch("/{id}")]
pub async fn update_task(
    state: web::Data<AppState>,
    session: AuthSession,
    path: web::Path<String>,
    payload: web::Json<Value>,
) -> Result<impl Responder, AppError> {
    let body = payload.into_inner();
    let fields = body.as_object().ok_or(AppError::InvalidOperation)?;
    if fields
        .keys()
        .any(|key| !TASK_UPDATE_FIELDS.contains(&key.as_str()))
    {
        return Err(AppError::InvalidOperation);
    }

    let id = parse_task_id(&path)?;
    let update: TaskUpdate =
        serde_json::from_value(body).map_err(|e| AppError::Validation(e.to_string()))?;

    let mut task = state
        .store
        .find_task(session.user.id, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".into()))?;

    task.apply_update(update)?;
    let task = state.store.save_task(task).await?;

    Ok(HttpResponse::Ok().json(task))
}

/// Delete one task, returning the removed document.
#[delete("/{id}")]
pub async fn delete_task(
    state: web::Data<AppState>,
    session: AuthSession,
    path: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let id = parse_task_id(&path)?;

    let task = state
        .store
        .delete_task(session.user.id, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".into()))?;

    Ok(HttpResponse::Ok().json(task))
}
