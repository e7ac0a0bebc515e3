//! Task repository implementation.
//!
//! Derived finders are expressed as explicit query-builder filters; the
//! overdue predicate is `due_date < now AND status != COMPLETED`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, Func, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::task::{self, ActiveModel, Entity as TaskEntity};
use crate::domain::{Task, TaskPriority, TaskStatus};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Task repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Find task by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Task>>;

    /// List all tasks
    async fn list(&self) -> AppResult<Vec<Task>>;

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

    /// Tasks due before `now` and not completed
    async fn find_overdue(&self, now: DateTime<Utc>) -> AppResult<Vec<Task>>;

    /// Tasks owned by a user with a given priority, newest first
    async fn find_by_user_and_priority(
        &self,
        user_id: Uuid,
        priority: TaskPriority,
    ) -> AppResult<Vec<Task>>;

    /// Case-insensitive substring match over titles
    async fn search_by_title(&self, fragment: &str) -> AppResult<Vec<Task>>;

    /// Case-insensitive substring match over descriptions
    async fn search_by_description(&self, fragment: &str) -> AppResult<Vec<Task>>;

    /// Tasks due within the inclusive range, soonest first
    async fn find_due_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<Vec<Task>>;

    /// Number of tasks owned by a user
    async fn count_by_user(&self, user_id: Uuid) -> AppResult<u64>;

    /// Number of tasks owned by a user in a given status
    async fn count_by_user_and_status(
        &self,
        user_id: Uuid,
        status: TaskStatus,
    ) -> AppResult<u64>;

    /// Create a new task
    async fn create(
        &self,
        title: String,
        description: Option<String>,
        status: TaskStatus,
        priority: TaskPriority,
        due_date: Option<DateTime<Utc>>,
        user_id: Uuid,
    ) -> AppResult<Task>;

    /// Overwrite the mutable fields of an existing task
    async fn update(&self, task: Task) -> AppResult<Task>;

    /// Delete task by ID
    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of TaskRepository
pub struct TaskStore {
    db: DatabaseConnection,
}

impl TaskStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// `lower(column) LIKE %lower(fragment)%` filter expression
fn contains_ignore_case(column: task::Column, fragment: &str) -> SimpleExpr {
    Expr::expr(Func::lower(Expr::col(column))).like(format!("%{}%", fragment.to_lowercase()))
}

#[async_trait]
impl TaskRepository for TaskStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Task>> {
        let result = TaskEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Task::from))
    }

    async fn list(&self) -> AppResult<Vec<Task>> {
        let models = TaskEntity::find()
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Task::from).collect())
    }

    async fn find_by_user(&self, user_id: Uuid) -> AppResult<Vec<Task>> {
        let models = TaskEntity::find()
            .filter(task::Column::UserId.eq(user_id))
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Task::from).collect())
    }

    async fn find_by_status(&self, status: TaskStatus) -> AppResult<Vec<Task>> {
        let models = TaskEntity::find()
            .filter(task::Column::Status.eq(status.as_str()))
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Task::from).collect())
    }

    async fn find_by_priority(&self, priority: TaskPriority) -> AppResult<Vec<Task>> {
        let models = TaskEntity::find()
            .filter(task::Column::Priority.eq(priority.as_str()))
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Task::from).collect())
    }

    async fn find_by_user_and_status(
        &self,
        user_id: Uuid,
        status: TaskStatus,
    ) -> AppResult<Vec<Task>> {
        let models = TaskEntity::find()
            .filter(task::Column::UserId.eq(user_id))
            .filter(task::Column::Status.eq(status.as_str()))
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Task::from).collect())
    }

    async fn find_overdue(&self, now: DateTime<Utc>) -> AppResult<Vec<Task>> {
        let models = TaskEntity::find()
            .filter(task::Column::DueDate.lt(now))
            .filter(task::Column::Status.ne(TaskStatus::Completed.as_str()))
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Task::from).collect())
    }

    async fn find_by_user_and_priority(
        &self,
        user_id: Uuid,
        priority: TaskPriority,
    ) -> AppResult<Vec<Task>> {
        let models = TaskEntity::find()
            .filter(task::Column::UserId.eq(user_id))
            .filter(task::Column::Priority.eq(priority.as_str()))
            .order_by_desc(task::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Task::from).collect())
    }

    async fn search_by_title(&self, fragment: &str) -> AppResult<Vec<Task>> {
        let models = TaskEntity::find()
            .filter(contains_ignore_case(task::Column::Title, fragment))
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Task::from).collect())
    }

    async fn search_by_description(&self, fragment: &str) -> AppResult<Vec<Task>> {
        let models = TaskEntity::find()
            .filter(contains_ignore_case(task::Column::Description, fragment))
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Task::from).collect())
    }

    async fn find_due_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<Vec<Task>> {
        let models = TaskEntity::find()
            .filter(task::Column::DueDate.between(start, end))
            .order_by_asc(task::Column::DueDate)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Task::from).collect())
    }

    async fn count_by_user(&self, user_id: Uuid) -> AppResult<u64> {
        TaskEntity::find()
            .filter(task::Column::UserId.eq(user_id))
            .count(&self.db)
            .await
            .map_err(AppError::from)
    }

    async fn count_by_user_and_status(
        &self,
        user_id: Uuid,
        status: TaskStatus,
    ) -> AppResult<u64> {
        TaskEntity::find()
            .filter(task::Column::UserId.eq(user_id))
            .filter(task::Column::Status.eq(status.as_str()))
            .count(&self.db)
            .await
            .map_err(AppError::from)
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
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            title: Set(title),
            description: Set(description),
            status: Set(status.as_str().to_string()),
            priority: Set(priority.as_str().to_string()),
            due_date: Set(due_date),
            user_id: Set(user_id),
            created_at: Set(chrono::Utc::now()),
        };

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(Task::from(model))
    }

    async fn update(&self, updated: Task) -> AppResult<Task> {
        let existing = TaskEntity::find_by_id(updated.id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::missing(format!("Task not found with id: {}", updated.id)))?;

        let mut active: ActiveModel = existing.into();
        active.title = Set(updated.title);
        active.description = Set(updated.description);
        active.status = Set(updated.status.as_str().to_string());
        active.priority = Set(updated.priority.as_str().to_string());
        active.due_date = Set(updated.due_date);

        let model = active.update(&self.db).await.map_err(AppError::from)?;

        Ok(Task::from(model))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = TaskEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::missing(format!("Task not found with id: {}", id)));
        }

        Ok(())
    }
}
