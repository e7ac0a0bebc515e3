//! Task service - Handles task-related business logic.
//!
//! Guards referential integrity (every task belongs to an existing user)
//! and derives the computed views: overdue tasks and per-user statistics.
//! Status transitions are deliberately unguarded; any status may be set
//! to any other.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{NewTask, Task, TaskPriority, TaskStatistics, TaskStatus, TaskUpdate};
use crate::errors::{AppError, AppResult};
use crate::infra::{TaskRepository, UserRepository};

/// Task service trait for dependency injection.
#[async_trait]
pub trait TaskService: Send + Sync {
    /// Create a task; fails with a validation error when no owner is
    /// given and a business error when the owner does not exist
    async fn create_task(&self, task: NewTask) -> AppResult<Task>;

    /// Convenience creation for a known user
    async fn create_task_for_user(
        &self,
        user_id: Uuid,
        title: String,
        description: Option<String>,
        priority: Option<TaskPriority>,
    ) -> AppResult<Task>;

    /// Find task by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Task>>;

    /// List all tasks
    async fn list_tasks(&self) -> AppResult<Vec<Task>>;

    /// Tasks owned by a user
    async fn find_by_user(&self, user_id: Uuid) -> AppResult<Vec<Task>>;

    /// Tasks in a given status
    async fn find_by_status(&self, status: TaskStatus) -> AppResult<Vec<Task>>;

    /// Tasks with a given priority
    async fn find_by_priority(&self, priority: TaskPriority) -> AppResult<Vec<Task>>;

    /// Tasks owned by a user in a given status
    async fn find_by_user_and_status(
        &self,
        user_id: Uuid,
        status: TaskStatus,
    ) -> AppResult<Vec<Task>>;

    /// Tasks whose due date has passed and that are not completed,
    /// evaluated at call time
    async fn find_overdue_tasks(&self) -> AppResult<Vec<Task>>;

    /// High-priority tasks for a user, newest first
    async fn find_high_priority_tasks_by_user(&self, user_id: Uuid) -> AppResult<Vec<Task>>;

    /// Overwrite a task's mutable fields; the owner is untouched
    async fn update_task(&self, id: Uuid, update: TaskUpdate) -> AppResult<Task>;

    /// Set a task's status
    async fn update_task_status(&self, id: Uuid, status: TaskStatus) -> AppResult<Task>;

    /// Set a task's priority
    async fn update_task_priority(&self, id: Uuid, priority: TaskPriority) -> AppResult<Task>;

    /// Set a task's due date
    async fn set_task_due_date(&self, id: Uuid, due_date: DateTime<Utc>) -> AppResult<Task>;

    /// Mark a task completed
    async fn complete_task(&self, id: Uuid) -> AppResult<Task>;

    /// Delete a task; fails if the id is unknown
    async fn delete_task(&self, id: Uuid) -> AppResult<()>;

    /// Case-insensitive substring search over titles
    async fn search_by_title(&self, fragment: &str) -> AppResult<Vec<Task>>;

    /// Case-insensitive substring search over descriptions
    async fn search_by_description(&self, fragment: &str) -> AppResult<Vec<Task>>;

    /// Tasks due within the inclusive range, soonest first
    async fn find_tasks_due_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<Vec<Task>>;

    /// Per-status task counts for a user
    async fn task_statistics_for_user(&self, user_id: Uuid) -> AppResult<TaskStatistics>;
}

/// Concrete implementation of TaskService using the repository pattern.
///
/// Holds the user repository as well, for the referential integrity
/// check on creation.
pub struct TaskManager {
    tasks: Arc<dyn TaskRepository>,
    users: Arc<dyn UserRepository>,
}

impl TaskManager {
    /// Create new task service instance
    pub fn new(tasks: Arc<dyn TaskRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { tasks, users }
    }

    /// Fetch a task or fail with the business-level not-found error
    async fn fetch_task(&self, id: Uuid) -> AppResult<Task> {
        self.tasks
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::missing(format!("Task not found with id: {}", id)))
    }

    /// Ensure the referenced user exists before attaching a task to it
    async fn ensure_user_exists(&self, user_id: Uuid) -> AppResult<()> {
        if self.users.find_by_id(user_id).await?.is_none() {
            return Err(AppError::missing(format!(
                "User not found with id: {}",
                user_id
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl TaskService for TaskManager {
    async fn create_task(&self, task: NewTask) -> AppResult<Task> {
        let user_id = task
            .user_id
            .ok_or_else(|| AppError::validation("Task must be associated with a user"))?;

        self.ensure_user_exists(user_id).await?;

        self.tasks
            .create(
                task.title,
                task.description,
                task.status.unwrap_or_default(),
                task.priority.unwrap_or_default(),
                task.due_date,
                user_id,
            )
            .await
    }

    async fn create_task_for_user(
        &self,
        user_id: Uuid,
        title: String,
        description: Option<String>,
        priority: Option<TaskPriority>,
    ) -> AppResult<Task> {
        self.ensure_user_exists(user_id).await?;

        self.tasks
            .create(
                title,
                description,
                TaskStatus::default(),
                priority.unwrap_or_default(),
                None,
                user_id,
            )
            .await
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Task>> {
        self.tasks.find_by_id(id).await
    }

    async fn list_tasks(&self) -> AppResult<Vec<Task>> {
        self.tasks.list().await
    }

    async fn find_by_user(&self, user_id: Uuid) -> AppResult<Vec<Task>> {
        self.tasks.find_by_user(user_id).await
    }

    async fn find_by_status(&self, status: TaskStatus) -> AppResult<Vec<Task>> {
        self.tasks.find_by_status(status).await
    }

    async fn find_by_priority(&self, priority: TaskPriority) -> AppResult<Vec<Task>> {
        self.tasks.find_by_priority(priority).await
    }

    async fn find_by_user_and_status(
        &self,
        user_id: Uuid,
        status: TaskStatus,
    ) -> AppResult<Vec<Task>> {
        self.tasks.find_by_user_and_status(user_id, status).await
    }

    async fn find_overdue_tasks(&self) -> AppResult<Vec<Task>> {
        self.tasks.find_overdue(Utc::now()).await
    }

    async fn find_high_priority_tasks_by_user(&self, user_id: Uuid) -> AppResult<Vec<Task>> {
        self.tasks
            .find_by_user_and_priority(user_id, TaskPriority::High)
            .await
    }

    async fn update_task(&self, id: Uuid, update: TaskUpdate) -> AppResult<Task> {
        let existing = self.fetch_task(id).await?;

        self.tasks
            .update(Task {
                id,
                title: update.title,
                description: update.description,
                status: update.status,
                priority: update.priority,
                due_date: update.due_date,
                user_id: existing.user_id,
                created_at: existing.created_at,
            })
            .await
    }

    async fn update_task_status(&self, id: Uuid, status: TaskStatus) -> AppResult<Task> {
        let mut task = self.fetch_task(id).await?;
        task.status = status;
        self.tasks.update(task).await
    }

    async fn update_task_priority(&self, id: Uuid, priority: TaskPriority) -> AppResult<Task> {
        let mut task = self.fetch_task(id).await?;
        task.priority = priority;
        self.tasks.update(task).await
    }

    async fn set_task_due_date(&self, id: Uuid, due_date: DateTime<Utc>) -> AppResult<Task> {
        let mut task = self.fetch_task(id).await?;
        task.due_date = Some(due_date);
        self.tasks.update(task).await
    }

    async fn complete_task(&self, id: Uuid) -> AppResult<Task> {
        self.update_task_status(id, TaskStatus::Completed).await
    }

    async fn delete_task(&self, id: Uuid) -> AppResult<()> {
        if self.tasks.find_by_id(id).await?.is_none() {
            return Err(AppError::missing(format!("Task not found with id: {}", id)));
        }

        self.tasks.delete(id).await
    }

    async fn search_by_title(&self, fragment: &str) -> AppResult<Vec<Task>> {
        self.tasks.search_by_title(fragment).await
    }

    async fn search_by_description(&self, fragment: &str) -> AppResult<Vec<Task>> {
        self.tasks.search_by_description(fragment).await
    }

    async fn find_tasks_due_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<Vec<Task>> {
        self.tasks.find_due_between(start, end).await
    }

    async fn task_statistics_for_user(&self, user_id: Uuid) -> AppResult<TaskStatistics> {
        // One count per bucket; independent queries run concurrently
        let (total, pending, in_progress, completed, cancelled) = tokio::try_join!(
            self.tasks.count_by_user(user_id),
            self.tasks
                .count_by_user_and_status(user_id, TaskStatus::Pending),
            self.tasks
                .count_by_user_and_status(user_id, TaskStatus::InProgress),
            self.tasks
                .count_by_user_and_status(user_id, TaskStatus::Completed),
            self.tasks
                .count_by_user_and_status(user_id, TaskStatus::Cancelled),
        )?;

        Ok(TaskStatistics {
            total,
            pending,
            in_progress,
            completed,
            cancelled,
        })
    }
}
