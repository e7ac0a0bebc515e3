//! Integration tests for API endpoints.
//!
//! The router runs against the real service layer; only the repositories
//! are replaced with in-memory fakes, so the business rules under test
//! are the production ones.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use sea_orm::DatabaseConnection;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use taskhub::api::{create_router, AppState};
use taskhub::domain::{NewUser, Task, TaskPriority, TaskStatus, User};
use taskhub::errors::{AppError, AppResult};
use taskhub::infra::{TaskRepository, UserRepository};
use taskhub::services::{TaskManager, UserManager};

// =============================================================================
// In-memory repositories
// =============================================================================

#[derive(Default)]
struct InMemoryUsers {
    rows: Mutex<Vec<User>>,
}

#[async_trait]
impl UserRepository for InMemoryUsers {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.rows.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.username.eq_ignore_ascii_case(username))
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        Ok(self.rows.lock().unwrap().clone())
    }

    async fn search_by_full_name(&self, fragment: &str) -> AppResult<Vec<User>> {
        let needle = fragment.to_lowercase();
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|u| u.full_name.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn username_exists(&self, username: &str) -> AppResult<bool> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .any(|u| u.username.eq_ignore_ascii_case(username)))
    }

    async fn email_exists(&self, email: &str) -> AppResult<bool> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .any(|u| u.email.eq_ignore_ascii_case(email)))
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(self.rows.lock().unwrap().len() as u64)
    }

    async fn create(&self, new_user: NewUser) -> AppResult<User> {
        let user = User {
            id: Uuid::new_v4(),
            username: new_user.username,
            email: new_user.email,
            full_name: new_user.full_name,
            created_at: Utc::now(),
        };
        self.rows.lock().unwrap().push(user.clone());
        Ok(user)
    }

    async fn update(&self, updated: User) -> AppResult<User> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|u| u.id == updated.id)
            .ok_or_else(|| AppError::missing(format!("User not found with id: {}", updated.id)))?;
        row.username = updated.username;
        row.email = updated.email;
        row.full_name = updated.full_name;
        Ok(row.clone())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|u| u.id != id);
        if rows.len() == before {
            return Err(AppError::missing(format!("User not found with id: {}", id)));
        }
        Ok(())
    }
}

#[derive(Default)]
struct InMemoryTasks {
    rows: Mutex<Vec<Task>>,
}

impl InMemoryTasks {
    fn matching<F: Fn(&Task) -> bool>(&self, predicate: F) -> Vec<Task> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .filter(|t| predicate(t))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl TaskRepository for InMemoryTasks {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Task>> {
        Ok(self.rows.lock().unwrap().iter().find(|t| t.id == id).cloned())
    }

    async fn list(&self) -> AppResult<Vec<Task>> {
        Ok(self.rows.lock().unwrap().clone())
    }

    async fn find_by_user(&self, user_id: Uuid) -> AppResult<Vec<Task>> {
        Ok(self.matching(|t| t.user_id == user_id))
    }

    async fn find_by_status(&self, status: TaskStatus) -> AppResult<Vec<Task>> {
        Ok(self.matching(|t| t.status == status))
    }

    async fn find_by_priority(&self, priority: TaskPriority) -> AppResult<Vec<Task>> {
        Ok(self.matching(|t| t.priority == priority))
    }

    async fn find_by_user_and_status(
        &self,
        user_id: Uuid,
        status: TaskStatus,
    ) -> AppResult<Vec<Task>> {
        Ok(self.matching(|t| t.user_id == user_id && t.status == status))
    }

    async fn find_overdue(&self, now: DateTime<Utc>) -> AppResult<Vec<Task>> {
        Ok(self.matching(|t| {
            t.due_date.map(|due| due < now).unwrap_or(false) && t.status != TaskStatus::Completed
        }))
    }

    async fn find_by_user_and_priority(
        &self,
        user_id: Uuid,
        priority: TaskPriority,
    ) -> AppResult<Vec<Task>> {
        let mut tasks = self.matching(|t| t.user_id == user_id && t.priority == priority);
        tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(tasks)
    }

    async fn search_by_title(&self, fragment: &str) -> AppResult<Vec<Task>> {
        let needle = fragment.to_lowercase();
        Ok(self.matching(|t| t.title.to_lowercase().contains(&needle)))
    }

    async fn search_by_description(&self, fragment: &str) -> AppResult<Vec<Task>> {
        let needle = fragment.to_lowercase();
        Ok(self.matching(|t| {
            t.description
                .as_ref()
                .map(|d| d.to_lowercase().contains(&needle))
                .unwrap_or(false)
        }))
    }

    async fn find_due_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<Vec<Task>> {
        let mut tasks = self.matching(|t| {
            t.due_date
                .map(|due| due >= start && due <= end)
                .unwrap_or(false)
        });
        tasks.sort_by_key(|t| t.due_date);
        Ok(tasks)
    }

    async fn count_by_user(&self, user_id: Uuid) -> AppResult<u64> {
        Ok(self.matching(|t| t.user_id == user_id).len() as u64)
    }

    async fn count_by_user_and_status(
        &self,
        user_id: Uuid,
        status: TaskStatus,
    ) -> AppResult<u64> {
        Ok(self
            .matching(|t| t.user_id == user_id && t.status == status)
            .len() as u64)
    }

    async fn create(
        &self,
        title: String,
        description: Option<String>,
        status: TaskStatus,
        priority: TaskPriority,
        due_date: Option<DateTime<Utc>>,
        user_id: Uuid,
    ) -> AppResult<Task> {
        let task = Task {
            id: Uuid::new_v4(),
            title,
            description,
            status,
            priority,
            due_date,
            user_id,
            created_at: Utc::now(),
        };
        self.rows.lock().unwrap().push(task.clone());
        Ok(task)
    }

    async fn update(&self, updated: Task) -> AppResult<Task> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|t| t.id == updated.id)
            .ok_or_else(|| AppError::missing(format!("Task not found with id: {}", updated.id)))?;
        *row = updated.clone();
        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|t| t.id != id);
        if rows.len() == before {
            return Err(AppError::missing(format!("Task not found with id: {}", id)));
        }
        Ok(())
    }
}

// =============================================================================
// Test helpers
// =============================================================================

fn state() -> AppState {
    let users = Arc::new(InMemoryUsers::default());
    let tasks = Arc::new(InMemoryTasks::default());

    AppState::new(
        Arc::new(UserManager::new(users.clone())),
        Arc::new(TaskManager::new(tasks, users)),
        DatabaseConnection::default(),
    )
}

fn app() -> Router {
    create_router(state())
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = match body {
        Some(json) => Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::String(
            String::from_utf8_lossy(&bytes).into_owned(),
        ))
    };

    (status, value)
}

async fn create_user(app: &Router, username: &str, email: &str, full_name: &str) -> Value {
    let (status, body) = send(
        app,
        "POST",
        "/api/users",
        Some(json!({
            "username": username,
            "email": email,
            "fullName": full_name,
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED, "user creation failed: {}", body);
    body
}

fn iso(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

// =============================================================================
// User endpoints
// =============================================================================

#[tokio::test]
async fn create_user_assigns_identifier() {
    let app = app();

    let user = create_user(&app, "john_doe", "john@x.com", "John Doe").await;

    assert!(user["id"].is_string());
    assert_eq!(user["username"], "john_doe");
    assert_eq!(user["fullName"], "John Doe");
}

#[tokio::test]
async fn duplicate_username_is_rejected_ignoring_case() {
    let app = app();
    create_user(&app, "john_doe", "john@x.com", "John Doe").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/users",
        Some(json!({
            "username": "JOHN_DOE",
            "email": "other@x.com",
            "fullName": "Other John",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Username already exists: JOHN_DOE");
}

#[tokio::test]
async fn duplicate_email_is_rejected_ignoring_case() {
    let app = app();
    create_user(&app, "john_doe", "john@x.com", "John Doe").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/users",
        Some(json!({
            "username": "second",
            "email": "John@X.com",
            "fullName": "Second",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .starts_with("Email already exists"));
}

#[tokio::test]
async fn invalid_email_fails_validation() {
    let app = app();

    let (status, body) = send(
        &app,
        "POST",
        "/api/users",
        Some(json!({
            "username": "john_doe",
            "email": "not-an-email",
            "fullName": "John Doe",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid email format");
}

#[tokio::test]
async fn get_user_by_id_returns_404_when_absent() {
    let app = app();

    let (status, _) = send(&app, "GET", &format!("/api/users/{}", Uuid::new_v4()), None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn username_lookup_ignores_case() {
    let app = app();
    create_user(&app, "john_doe", "john@x.com", "John Doe").await;

    let (status, body) = send(&app, "GET", "/api/users/username/JOHN_DOE", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "john_doe");
}

#[tokio::test]
async fn check_username_returns_bare_boolean() {
    let app = app();
    create_user(&app, "john_doe", "john@x.com", "John Doe").await;

    let (status, body) = send(&app, "GET", "/api/users/check-username/john_doe", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::Bool(true));

    let (_, body) = send(&app, "GET", "/api/users/check-username/nobody", None).await;
    assert_eq!(body, Value::Bool(false));
}

#[tokio::test]
async fn user_count_and_search() {
    let app = app();
    create_user(&app, "john_doe", "john@x.com", "John Doe").await;
    create_user(&app, "jane_smith", "jane@x.com", "Jane Smith").await;

    let (_, count) = send(&app, "GET", "/api/users/count", None).await;
    assert_eq!(count, json!(2));

    let (status, matches) = send(&app, "GET", "/api/users/search?name=jane", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(matches.as_array().unwrap().len(), 1);
    assert_eq!(matches[0]["username"], "jane_smith");
}

#[tokio::test]
async fn update_with_unchanged_fields_never_conflicts_with_itself() {
    let app = app();
    let user = create_user(&app, "john_doe", "john@x.com", "John Doe").await;
    let id = user["id"].as_str().unwrap();

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/users/{}", id),
        Some(json!({
            "username": "john_doe",
            "email": "john@x.com",
            "fullName": "Johnny Doe",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["fullName"], "Johnny Doe");
}

#[tokio::test]
async fn update_unknown_user_returns_400_with_message() {
    let app = app();
    let id = Uuid::new_v4();

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/users/{}", id),
        Some(json!({
            "username": "ghost",
            "email": "ghost@x.com",
            "fullName": "Ghost",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], format!("User not found with id: {}", id));
}

#[tokio::test]
async fn delete_user_round_trip() {
    let app = app();
    let user = create_user(&app, "john_doe", "john@x.com", "John Doe").await;
    let id = user["id"].as_str().unwrap().to_string();

    let (status, body) = send(&app, "DELETE", &format!("/api/users/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User deleted successfully");

    // A second delete fails and leaves nothing behind
    let (status, _) = send(&app, "DELETE", &format!("/api/users/{}", id), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, count) = send(&app, "GET", "/api/users/count", None).await;
    assert_eq!(count, json!(0));
}

// =============================================================================
// Task endpoints
// =============================================================================

#[tokio::test]
async fn task_without_user_is_rejected() {
    let app = app();

    let (status, body) = send(
        &app,
        "POST",
        "/api/tasks",
        Some(json!({"title": "Orphan task"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Task must be associated with a user");
}

#[tokio::test]
async fn task_for_unknown_user_is_rejected_and_not_persisted() {
    let app = app();
    let ghost = Uuid::new_v4();

    let (status, body) = send(
        &app,
        "POST",
        "/api/tasks",
        Some(json!({"title": "T1", "user": {"id": ghost}})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], format!("User not found with id: {}", ghost));

    let (_, tasks) = send(&app, "GET", "/api/tasks", None).await;
    assert!(tasks.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn task_creation_defaults_status_and_priority() {
    let app = app();
    let user = create_user(&app, "john_doe", "john@x.com", "John Doe").await;

    let (status, task) = send(
        &app,
        "POST",
        "/api/tasks",
        Some(json!({"title": "T1", "user": {"id": user["id"]}})),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(task["status"], "PENDING");
    assert_eq!(task["priority"], "MEDIUM");
    assert_eq!(task["userId"], user["id"]);
}

#[tokio::test]
async fn unknown_status_value_is_a_validation_error() {
    let app = app();

    let (status, body) = send(&app, "GET", "/api/tasks/status/DONE", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid task status: DONE");
}

#[tokio::test]
async fn overdue_flow_matches_the_lifecycle() {
    let app = app();
    let user = create_user(&app, "john_doe", "john@x.com", "John Doe").await;

    // Create a HIGH priority task, push its due date into the past
    let (_, task) = send(
        &app,
        "POST",
        "/api/tasks",
        Some(json!({"title": "T1", "priority": "HIGH", "user": {"id": user["id"]}})),
    )
    .await;
    let task_id = task["id"].as_str().unwrap().to_string();

    let yesterday = iso(Utc::now() - Duration::days(1));
    let (status, _) = send(
        &app,
        "PATCH",
        &format!("/api/tasks/{}/due-date?dueDate={}", task_id, yesterday),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, overdue) = send(&app, "GET", "/api/tasks/overdue", None).await;
    assert!(overdue
        .as_array()
        .unwrap()
        .iter()
        .any(|t| t["id"] == task["id"]));

    // Completing the task removes it from the overdue view
    let (status, completed) = send(
        &app,
        "PATCH",
        &format!("/api/tasks/{}/complete", task_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(completed["status"], "COMPLETED");

    let (_, overdue) = send(&app, "GET", "/api/tasks/overdue", None).await;
    assert!(overdue.as_array().unwrap().is_empty());

    // The completed task still shows up under its status
    let (_, done) = send(&app, "GET", "/api/tasks/status/COMPLETED", None).await;
    assert!(done
        .as_array()
        .unwrap()
        .iter()
        .any(|t| t["id"] == task["id"]));
}

#[tokio::test]
async fn completed_to_pending_transition_is_permitted() {
    let app = app();
    let user = create_user(&app, "john_doe", "john@x.com", "John Doe").await;

    let (_, task) = send(
        &app,
        "POST",
        "/api/tasks",
        Some(json!({"title": "T1", "user": {"id": user["id"]}})),
    )
    .await;
    let task_id = task["id"].as_str().unwrap().to_string();

    send(&app, "PATCH", &format!("/api/tasks/{}/complete", task_id), None).await;

    let (status, reopened) = send(
        &app,
        "PATCH",
        &format!("/api/tasks/{}/status?status=PENDING", task_id),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(reopened["status"], "PENDING");
}

#[tokio::test]
async fn create_task_for_user_via_query_params() {
    let app = app();
    let user = create_user(&app, "john_doe", "john@x.com", "John Doe").await;
    let user_id = user["id"].as_str().unwrap();

    let (status, task) = send(
        &app,
        "POST",
        &format!(
            "/api/tasks/user/{}?title=Review%20code&description=Check%20the%20PR&priority=URGENT",
            user_id
        ),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(task["title"], "Review code");
    assert_eq!(task["priority"], "URGENT");
    assert_eq!(task["status"], "PENDING");
}

#[tokio::test]
async fn statistics_reflect_transitions() {
    let app = app();
    let user = create_user(&app, "john_doe", "john@x.com", "John Doe").await;
    let user_id = user["id"].as_str().unwrap().to_string();

    for title in ["T1", "T2", "T3"] {
        send(
            &app,
            "POST",
            "/api/tasks",
            Some(json!({"title": title, "user": {"id": user["id"]}})),
        )
        .await;
    }

    let (_, tasks) = send(&app, "GET", &format!("/api/tasks/user/{}", user_id), None).await;
    let first_id = tasks[0]["id"].as_str().unwrap().to_string();
    send(&app, "PATCH", &format!("/api/tasks/{}/complete", first_id), None).await;

    let (status, stats) = send(
        &app,
        "GET",
        &format!("/api/tasks/user/{}/statistics", user_id),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["total"], 3);
    assert_eq!(stats["pending"], 2);
    assert_eq!(stats["inProgress"], 0);
    assert_eq!(stats["completed"], 1);
    assert_eq!(stats["cancelled"], 0);
}

#[tokio::test]
async fn due_between_is_inclusive_and_sorted() {
    let app = app();
    let user = create_user(&app, "john_doe", "john@x.com", "John Doe").await;
    let user_id = user["id"].as_str().unwrap().to_string();

    let now = Utc::now();
    let offsets = [3i64, 1, 5];
    for (i, days) in offsets.iter().enumerate() {
        let (_, task) = send(
            &app,
            "POST",
            &format!("/api/tasks/user/{}?title=T{}", user_id, i),
            None,
        )
        .await;
        let task_id = task["id"].as_str().unwrap().to_string();
        let due = iso(now + Duration::days(*days));
        send(
            &app,
            "PATCH",
            &format!("/api/tasks/{}/due-date?dueDate={}", task_id, due),
            None,
        )
        .await;
    }

    // Offset-less ISO timestamps are accepted and read as UTC
    let start = (now + Duration::days(1) - Duration::hours(1))
        .naive_utc()
        .format("%Y-%m-%dT%H:%M:%S")
        .to_string();
    let end = (now + Duration::days(3) + Duration::hours(1))
        .naive_utc()
        .format("%Y-%m-%dT%H:%M:%S")
        .to_string();

    let (status, tasks) = send(
        &app,
        "GET",
        &format!("/api/tasks/due-between?startDate={}&endDate={}", start, end),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let titles: Vec<_> = tasks
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["title"].as_str().unwrap().to_string())
        .collect();
    // Due in 1 day sorts before due in 3 days; due in 5 days is outside
    assert_eq!(titles, vec!["T1", "T0"]);
}

#[tokio::test]
async fn title_search_ignores_case() {
    let app = app();
    let user = create_user(&app, "john_doe", "john@x.com", "John Doe").await;
    let user_id = user["id"].as_str().unwrap();

    send(
        &app,
        "POST",
        &format!("/api/tasks/user/{}?title=Fix%20payment%20bug", user_id),
        None,
    )
    .await;

    let (status, tasks) = send(&app, "GET", "/api/tasks/search/title?title=PAYMENT", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(tasks.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn high_priority_endpoint_filters_to_high() {
    let app = app();
    let user = create_user(&app, "john_doe", "john@x.com", "John Doe").await;
    let user_id = user["id"].as_str().unwrap().to_string();

    for priority in ["HIGH", "LOW", "HIGH", "URGENT"] {
        send(
            &app,
            "POST",
            "/api/tasks",
            Some(json!({"title": "T", "priority": priority, "user": {"id": user["id"]}})),
        )
        .await;
    }

    let (status, tasks) = send(
        &app,
        "GET",
        &format!("/api/tasks/user/{}/high-priority", user_id),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let tasks = tasks.as_array().unwrap();
    assert_eq!(tasks.len(), 2);
    assert!(tasks.iter().all(|t| t["priority"] == "HIGH"));
}

#[tokio::test]
async fn delete_unknown_task_returns_400_and_store_is_unchanged() {
    let app = app();
    let user = create_user(&app, "john_doe", "john@x.com", "John Doe").await;

    send(
        &app,
        "POST",
        "/api/tasks",
        Some(json!({"title": "T1", "user": {"id": user["id"]}})),
    )
    .await;

    let ghost = Uuid::new_v4();
    let (status, body) = send(&app, "DELETE", &format!("/api/tasks/{}", ghost), None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], format!("Task not found with id: {}", ghost));

    let (_, tasks) = send(&app, "GET", "/api/tasks", None).await;
    assert_eq!(tasks.as_array().unwrap().len(), 1);
}

// =============================================================================
// Dashboard
// =============================================================================

#[tokio::test]
async fn dashboard_aggregates_counts() {
    let app = app();
    let user = create_user(&app, "john_doe", "john@x.com", "John Doe").await;

    for title in ["T1", "T2"] {
        send(
            &app,
            "POST",
            "/api/tasks",
            Some(json!({"title": title, "user": {"id": user["id"]}})),
        )
        .await;
    }

    let (_, tasks) = send(&app, "GET", "/api/tasks", None).await;
    let first_id = tasks[0]["id"].as_str().unwrap().to_string();
    send(&app, "PATCH", &format!("/api/tasks/{}/complete", first_id), None).await;

    let (status, dashboard) = send(&app, "GET", "/api/dashboard", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(dashboard["totalUsers"], 1);
    assert_eq!(dashboard["totalTasks"], 2);
    assert_eq!(dashboard["completedTasks"], 1);
    assert_eq!(dashboard["overdueTasks"], 0);
}

// =============================================================================
// Seeding
// =============================================================================

#[tokio::test]
async fn seeding_populates_an_empty_store_exactly_once() {
    let state = state();

    taskhub::commands::seed::run(&state).await.unwrap();

    assert_eq!(state.user_service.user_count().await.unwrap(), 4);

    let tasks = state.task_service.list_tasks().await.unwrap();
    assert_eq!(tasks.len(), 12);

    // One sample task is already overdue, two are completed
    assert_eq!(state.task_service.find_overdue_tasks().await.unwrap().len(), 1);
    assert_eq!(
        state
            .task_service
            .find_by_status(TaskStatus::Completed)
            .await
            .unwrap()
            .len(),
        2
    );

    // A second run must not touch a populated store
    taskhub::commands::seed::run(&state).await.unwrap();
    assert_eq!(state.user_service.user_count().await.unwrap(), 4);
    assert_eq!(state.task_service.list_tasks().await.unwrap().len(), 12);
}

// =============================================================================
// Root
// =============================================================================

#[tokio::test]
async fn root_returns_welcome_message() {
    let app = app();

    let (status, body) = send(&app, "GET", "/", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("Welcome to TaskHub".to_string()));
}
