//! Task endpoint handlers.

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::{get, patch},
    Router,
};
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{
    NewTask, TaskPriority, TaskResponse, TaskStatistics, TaskStatus, TaskUpdate,
};
use crate::errors::{AppError, AppResult};
use crate::types::{Created, MessageResponse};

/// Reference to an owning user inside a task body
#[derive(Debug, Deserialize, ToSchema)]
pub struct UserRef {
    pub id: Option<Uuid>,
}

/// Task creation request body
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    /// Short task title
    #[validate(length(min = 1, message = "Title is required"))]
    #[schema(example = "Complete project proposal")]
    pub title: String,
    /// Optional free-text description
    pub description: Option<String>,
    /// Initial status, defaults to PENDING
    pub status: Option<TaskStatus>,
    /// Priority, defaults to MEDIUM
    pub priority: Option<TaskPriority>,
    /// Optional due timestamp (RFC 3339)
    pub due_date: Option<DateTime<Utc>>,
    /// Owning user reference
    pub user: Option<UserRef>,
}

/// Task update request body. Omitted status/priority fall back to the
/// creation defaults, mirroring a full overwrite of the record.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<DateTime<Utc>>,
}

/// Title search query parameters
#[derive(Debug, Deserialize)]
pub struct TitleQuery {
    pub title: String,
}

/// Description search query parameters
#[derive(Debug, Deserialize)]
pub struct DescriptionQuery {
    pub description: String,
}

/// Due-range query parameters
#[derive(Debug, Deserialize)]
pub struct DueBetweenQuery {
    #[serde(rename = "startDate")]
    pub start_date: String,
    #[serde(rename = "endDate")]
    pub end_date: String,
}

/// Query parameters for creating a task under a user
#[derive(Debug, Deserialize)]
pub struct CreateForUserQuery {
    pub title: String,
    pub description: Option<String>,
    pub priority: Option<String>,
}

/// Status update query parameters
#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    pub status: String,
}

/// Priority update query parameters
#[derive(Debug, Deserialize)]
pub struct PriorityQuery {
    pub priority: String,
}

/// Due-date update query parameters
#[derive(Debug, Deserialize)]
pub struct DueDateQuery {
    #[serde(rename = "dueDate")]
    pub due_date: String,
}

/// Create task routes
pub fn task_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_tasks).post(create_task))
        .route("/overdue", get(overdue_tasks))
        .route("/due-between", get(tasks_due_between))
        .route("/search/title", get(search_by_title))
        .route("/search/description", get(search_by_description))
        .route(
            "/user/:user_id",
            get(tasks_by_user).post(create_task_for_user),
        )
        .route("/user/:user_id/status/:status", get(tasks_by_user_and_status))
        .route("/user/:user_id/high-priority", get(high_priority_tasks))
        .route("/user/:user_id/statistics", get(task_statistics))
        .route("/status/:status", get(tasks_by_status))
        .route("/priority/:priority", get(tasks_by_priority))
        .route("/:id", get(get_task).put(update_task).delete(delete_task))
        .route("/:id/status", patch(update_task_status))
        .route("/:id/priority", patch(update_task_priority))
        .route("/:id/complete", patch(complete_task))
        .route("/:id/due-date", patch(set_task_due_date))
}

fn parse_status(value: &str) -> AppResult<TaskStatus> {
    value.parse().map_err(AppError::Validation)
}

fn parse_priority(value: &str) -> AppResult<TaskPriority> {
    value.parse().map_err(AppError::Validation)
}

/// Parse an ISO-8601 timestamp. Accepts RFC 3339 and the offset-less
/// form (`2024-01-15T10:00:00`), which is read as UTC.
fn parse_timestamp(value: &str) -> AppResult<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| Utc.from_utc_datetime(&naive))
        .map_err(|_| AppError::validation(format!("Invalid timestamp: {}", value)))
}

fn to_responses(tasks: Vec<crate::domain::Task>) -> Json<Vec<TaskResponse>> {
    Json(tasks.into_iter().map(TaskResponse::from).collect())
}

/// List all tasks
#[utoipa::path(
    get,
    path = "/api/tasks",
    tag = "Tasks",
    responses(
        (status = 200, description = "All tasks", body = [TaskResponse])
    )
)]
pub async fn list_tasks(State(state): State<AppState>) -> AppResult<Json<Vec<TaskResponse>>> {
    let tasks = state.task_service.list_tasks().await?;

    Ok(to_responses(tasks))
}

/// Get task by ID
#[utoipa::path(
    get,
    path = "/api/tasks/{id}",
    tag = "Tasks",
    params(("id" = Uuid, Path, description = "Task identifier")),
    responses(
        (status = 200, description = "Task found", body = TaskResponse),
        (status = 404, description = "No task with that id")
    )
)]
pub async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<TaskResponse>> {
    let task = state
        .task_service
        .find_by_id(id)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(TaskResponse::from(task)))
}

/// Tasks owned by a user
#[utoipa::path(
    get,
    path = "/api/tasks/user/{user_id}",
    tag = "Tasks",
    params(("user_id" = Uuid, Path, description = "User identifier")),
    responses(
        (status = 200, description = "Tasks for the user", body = [TaskResponse])
    )
)]
pub async fn tasks_by_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<Vec<TaskResponse>>> {
    let tasks = state.task_service.find_by_user(user_id).await?;

    Ok(to_responses(tasks))
}

/// Tasks in a given status
#[utoipa::path(
    get,
    path = "/api/tasks/status/{status}",
    tag = "Tasks",
    params(("status" = String, Path, description = "Task status")),
    responses(
        (status = 200, description = "Tasks in the status", body = [TaskResponse]),
        (status = 400, description = "Unknown status value", body = MessageResponse)
    )
)]
pub async fn tasks_by_status(
    State(state): State<AppState>,
    Path(status): Path<String>,
) -> AppResult<Json<Vec<TaskResponse>>> {
    let status = parse_status(&status)?;
    let tasks = state.task_service.find_by_status(status).await?;

    Ok(to_responses(tasks))
}

/// Tasks with a given priority
#[utoipa::path(
    get,
    path = "/api/tasks/priority/{priority}",
    tag = "Tasks",
    params(("priority" = String, Path, description = "Task priority")),
    responses(
        (status = 200, description = "Tasks with the priority", body = [TaskResponse]),
        (status = 400, description = "Unknown priority value", body = MessageResponse)
    )
)]
pub async fn tasks_by_priority(
    State(state): State<AppState>,
    Path(priority): Path<String>,
) -> AppResult<Json<Vec<TaskResponse>>> {
    let priority = parse_priority(&priority)?;
    let tasks = state.task_service.find_by_priority(priority).await?;

    Ok(to_responses(tasks))
}

/// Tasks owned by a user in a given status
#[utoipa::path(
    get,
    path = "/api/tasks/user/{user_id}/status/{status}",
    tag = "Tasks",
    params(
        ("user_id" = Uuid, Path, description = "User identifier"),
        ("status" = String, Path, description = "Task status")
    ),
    responses(
        (status = 200, description = "Matching tasks", body = [TaskResponse]),
        (status = 400, description = "Unknown status value", body = MessageResponse)
    )
)]
pub async fn tasks_by_user_and_status(
    State(state): State<AppState>,
    Path((user_id, status)): Path<(Uuid, String)>,
) -> AppResult<Json<Vec<TaskResponse>>> {
    let status = parse_status(&status)?;
    let tasks = state
        .task_service
        .find_by_user_and_status(user_id, status)
        .await?;

    Ok(to_responses(tasks))
}

/// Tasks whose due date has passed and that are not completed
#[utoipa::path(
    get,
    path = "/api/tasks/overdue",
    tag = "Tasks",
    responses(
        (status = 200, description = "Overdue tasks", body = [TaskResponse])
    )
)]
pub async fn overdue_tasks(State(state): State<AppState>) -> AppResult<Json<Vec<TaskResponse>>> {
    let tasks = state.task_service.find_overdue_tasks().await?;

    Ok(to_responses(tasks))
}

/// Create a new task
#[utoipa::path(
    post,
    path = "/api/tasks",
    tag = "Tasks",
    request_body = CreateTaskRequest,
    responses(
        (status = 201, description = "Task created", body = TaskResponse),
        (status = 400, description = "Missing or unknown user", body = MessageResponse)
    )
)]
pub async fn create_task(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateTaskRequest>,
) -> AppResult<Created<TaskResponse>> {
    let task = state
        .task_service
        .create_task(NewTask {
            title: payload.title,
            description: payload.description,
            status: payload.status,
            priority: payload.priority,
            due_date: payload.due_date,
            user_id: payload.user.and_then(|user| user.id),
        })
        .await?;

    Ok(Created(TaskResponse::from(task)))
}

/// Create a task for a specific user
#[utoipa::path(
    post,
    path = "/api/tasks/user/{user_id}",
    tag = "Tasks",
    params(
        ("user_id" = Uuid, Path, description = "User identifier"),
        ("title" = String, Query, description = "Task title"),
        ("description" = Option<String>, Query, description = "Task description"),
        ("priority" = Option<String>, Query, description = "Task priority, defaults to MEDIUM")
    ),
    responses(
        (status = 201, description = "Task created", body = TaskResponse),
        (status = 400, description = "Unknown user or priority", body = MessageResponse)
    )
)]
pub async fn create_task_for_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Query(query): Query<CreateForUserQuery>,
) -> AppResult<Created<TaskResponse>> {
    let priority = query
        .priority
        .as_deref()
        .map(parse_priority)
        .transpose()?;

    let task = state
        .task_service
        .create_task_for_user(user_id, query.title, query.description, priority)
        .await?;

    Ok(Created(TaskResponse::from(task)))
}

/// Update an existing task
#[utoipa::path(
    put,
    path = "/api/tasks/{id}",
    tag = "Tasks",
    params(("id" = Uuid, Path, description = "Task identifier")),
    request_body = UpdateTaskRequest,
    responses(
        (status = 200, description = "Task updated", body = TaskResponse),
        (status = 400, description = "Unknown task", body = MessageResponse)
    )
)]
pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateTaskRequest>,
) -> AppResult<Json<TaskResponse>> {
    let task = state
        .task_service
        .update_task(
            id,
            TaskUpdate {
                title: payload.title,
                description: payload.description,
                status: payload.status.unwrap_or_default(),
                priority: payload.priority.unwrap_or_default(),
                due_date: payload.due_date,
            },
        )
        .await?;

    Ok(Json(TaskResponse::from(task)))
}

/// Update a task's status
#[utoipa::path(
    patch,
    path = "/api/tasks/{id}/status",
    tag = "Tasks",
    params(
        ("id" = Uuid, Path, description = "Task identifier"),
        ("status" = String, Query, description = "New status")
    ),
    responses(
        (status = 200, description = "Status updated", body = TaskResponse),
        (status = 400, description = "Unknown task or status", body = MessageResponse)
    )
)]
pub async fn update_task_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<StatusQuery>,
) -> AppResult<Json<TaskResponse>> {
    let status = parse_status(&query.status)?;
    let task = state.task_service.update_task_status(id, status).await?;

    Ok(Json(TaskResponse::from(task)))
}

/// Update a task's priority
#[utoipa::path(
    patch,
    path = "/api/tasks/{id}/priority",
    tag = "Tasks",
    params(
        ("id" = Uuid, Path, description = "Task identifier"),
        ("priority" = String, Query, description = "New priority")
    ),
    responses(
        (status = 200, description = "Priority updated", body = TaskResponse),
        (status = 400, description = "Unknown task or priority", body = MessageResponse)
    )
)]
pub async fn update_task_priority(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<PriorityQuery>,
) -> AppResult<Json<TaskResponse>> {
    let priority = parse_priority(&query.priority)?;
    let task = state.task_service.update_task_priority(id, priority).await?;

    Ok(Json(TaskResponse::from(task)))
}

/// Mark a task completed
#[utoipa::path(
    patch,
    path = "/api/tasks/{id}/complete",
    tag = "Tasks",
    params(("id" = Uuid, Path, description = "Task identifier")),
    responses(
        (status = 200, description = "Task completed", body = TaskResponse),
        (status = 400, description = "Unknown task", body = MessageResponse)
    )
)]
pub async fn complete_task(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<TaskResponse>> {
    let task = state.task_service.complete_task(id).await?;

    Ok(Json(TaskResponse::from(task)))
}

/// Set a task's due date
#[utoipa::path(
    patch,
    path = "/api/tasks/{id}/due-date",
    tag = "Tasks",
    params(
        ("id" = Uuid, Path, description = "Task identifier"),
        ("dueDate" = String, Query, description = "New due timestamp (ISO-8601)")
    ),
    responses(
        (status = 200, description = "Due date updated", body = TaskResponse),
        (status = 400, description = "Unknown task or bad timestamp", body = MessageResponse)
    )
)]
pub async fn set_task_due_date(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<DueDateQuery>,
) -> AppResult<Json<TaskResponse>> {
    let due_date = parse_timestamp(&query.due_date)?;
    let task = state.task_service.set_task_due_date(id, due_date).await?;

    Ok(Json(TaskResponse::from(task)))
}

/// Delete a task
#[utoipa::path(
    delete,
    path = "/api/tasks/{id}",
    tag = "Tasks",
    params(("id" = Uuid, Path, description = "Task identifier")),
    responses(
        (status = 200, description = "Task deleted", body = MessageResponse),
        (status = 400, description = "Unknown task", body = MessageResponse)
    )
)]
pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    state.task_service.delete_task(id).await?;

    Ok(Json(MessageResponse::new("Task deleted successfully")))
}

/// Search tasks by title
#[utoipa::path(
    get,
    path = "/api/tasks/search/title",
    tag = "Tasks",
    params(("title" = String, Query, description = "Title fragment")),
    responses(
        (status = 200, description = "Matching tasks", body = [TaskResponse])
    )
)]
pub async fn search_by_title(
    State(state): State<AppState>,
    Query(query): Query<TitleQuery>,
) -> AppResult<Json<Vec<TaskResponse>>> {
    let tasks = state.task_service.search_by_title(&query.title).await?;

    Ok(to_responses(tasks))
}

/// Search tasks by description
#[utoipa::path(
    get,
    path = "/api/tasks/search/description",
    tag = "Tasks",
    params(("description" = String, Query, description = "Description fragment")),
    responses(
        (status = 200, description = "Matching tasks", body = [TaskResponse])
    )
)]
pub async fn search_by_description(
    State(state): State<AppState>,
    Query(query): Query<DescriptionQuery>,
) -> AppResult<Json<Vec<TaskResponse>>> {
    let tasks = state
        .task_service
        .search_by_description(&query.description)
        .await?;

    Ok(to_responses(tasks))
}

/// Tasks due within an inclusive range, soonest first
#[utoipa::path(
    get,
    path = "/api/tasks/due-between",
    tag = "Tasks",
    params(
        ("startDate" = String, Query, description = "Range start (ISO-8601)"),
        ("endDate" = String, Query, description = "Range end (ISO-8601)")
    ),
    responses(
        (status = 200, description = "Tasks due in the range", body = [TaskResponse]),
        (status = 400, description = "Bad timestamp", body = MessageResponse)
    )
)]
pub async fn tasks_due_between(
    State(state): State<AppState>,
    Query(query): Query<DueBetweenQuery>,
) -> AppResult<Json<Vec<TaskResponse>>> {
    let start = parse_timestamp(&query.start_date)?;
    let end = parse_timestamp(&query.end_date)?;
    let tasks = state.task_service.find_tasks_due_between(start, end).await?;

    Ok(to_responses(tasks))
}

/// High-priority tasks for a user, newest first
#[utoipa::path(
    get,
    path = "/api/tasks/user/{user_id}/high-priority",
    tag = "Tasks",
    params(("user_id" = Uuid, Path, description = "User identifier")),
    responses(
        (status = 200, description = "High-priority tasks", body = [TaskResponse])
    )
)]
pub async fn high_priority_tasks(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<Vec<TaskResponse>>> {
    let tasks = state
        .task_service
        .find_high_priority_tasks_by_user(user_id)
        .await?;

    Ok(to_responses(tasks))
}

/// Per-status task counts for a user
#[utoipa::path(
    get,
    path = "/api/tasks/user/{user_id}/statistics",
    tag = "Tasks",
    params(("user_id" = Uuid, Path, description = "User identifier")),
    responses(
        (status = 200, description = "Task statistics", body = TaskStatistics)
    )
)]
pub async fn task_statistics(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<TaskStatistics>> {
    let stats = state.task_service.task_statistics_for_user(user_id).await?;

    Ok(Json(stats))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamps_parse_with_and_without_offset() {
        assert!(parse_timestamp("2024-01-15T10:00:00Z").is_ok());
        assert!(parse_timestamp("2024-01-15T10:00:00+02:00").is_ok());
        assert!(parse_timestamp("2024-01-15T10:00:00").is_ok());
        assert!(parse_timestamp("2024-01-15T10:00:00.123").is_ok());
        assert!(parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn offsetless_timestamps_are_read_as_utc() {
        let parsed = parse_timestamp("2024-01-15T10:00:00").unwrap();
        assert_eq!(parsed.to_rfc3339(), "2024-01-15T10:00:00+00:00");
    }
}
