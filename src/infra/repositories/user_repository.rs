//! User repository implementation.
//!
//! Username and email lookups compare case-insensitively; the matching
//! unique indexes on `lower(username)` / `lower(email)` keep concurrent
//! writers honest.

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, Func, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, Set,
};
use uuid::Uuid;

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use crate::domain::{NewUser, User};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Find user by username, ignoring case
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;

    /// Find user by email, ignoring case
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// List all users
    async fn list(&self) -> AppResult<Vec<User>>;

    /// Case-insensitive substring match over full names
    async fn search_by_full_name(&self, fragment: &str) -> AppResult<Vec<User>>;

    /// Check whether a username is taken, ignoring case
    async fn username_exists(&self, username: &str) -> AppResult<bool>;

    /// Check whether an email is taken, ignoring case
    async fn email_exists(&self, email: &str) -> AppResult<bool>;

    /// Total user count
    async fn count(&self) -> AppResult<u64>;

    /// Create a new user
    async fn create(&self, user: NewUser) -> AppResult<User>;

    /// Overwrite the mutable fields of an existing user
    async fn update(&self, user: User) -> AppResult<User>;

    /// Delete user by ID
    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of UserRepository
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// `lower(column) = lower(value)` filter expression
fn eq_ignore_case(column: user::Column, value: &str) -> SimpleExpr {
    Expr::expr(Func::lower(Expr::col(column))).eq(value.to_lowercase())
}

/// `lower(column) LIKE %lower(fragment)%` filter expression
fn contains_ignore_case(column: user::Column, fragment: &str) -> SimpleExpr {
    Expr::expr(Func::lower(Expr::col(column))).like(format!("%{}%", fragment.to_lowercase()))
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let result = UserEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(User::from))
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .filter(eq_ignore_case(user::Column::Username, username))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(User::from))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .filter(eq_ignore_case(user::Column::Email, email))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(User::from))
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        let models = UserEntity::find()
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(User::from).collect())
    }

    async fn search_by_full_name(&self, fragment: &str) -> AppResult<Vec<User>> {
        let models = UserEntity::find()
            .filter(contains_ignore_case(user::Column::FullName, fragment))
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(User::from).collect())
    }

    async fn username_exists(&self, username: &str) -> AppResult<bool> {
        let count = UserEntity::find()
            .filter(eq_ignore_case(user::Column::Username, username))
            .count(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(count > 0)
    }

    async fn email_exists(&self, email: &str) -> AppResult<bool> {
        let count = UserEntity::find()
            .filter(eq_ignore_case(user::Column::Email, email))
            .count(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(count > 0)
    }

    async fn count(&self) -> AppResult<u64> {
        UserEntity::find()
            .count(&self.db)
            .await
            .map_err(AppError::from)
    }

    async fn create(&self, new_user: NewUser) -> AppResult<User> {
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            username: Set(new_user.username),
            email: Set(new_user.email),
            full_name: Set(new_user.full_name),
            created_at: Set(chrono::Utc::now()),
        };

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(User::from(model))
    }

    async fn update(&self, updated: User) -> AppResult<User> {
        let existing = UserEntity::find_by_id(updated.id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::missing(format!("User not found with id: {}", updated.id)))?;

        let mut active: ActiveModel = existing.into();
        active.username = Set(updated.username);
        active.email = Set(updated.email);
        active.full_name = Set(updated.full_name);

        let model = active.update(&self.db).await.map_err(AppError::from)?;

        Ok(User::from(model))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = UserEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::missing(format!("User not found with id: {}", id)));
        }

        Ok(())
    }
}
