//! User service - Handles user-related business logic.
//!
//! Enforces the uniqueness invariants on username and email (both
//! case-insensitive) before delegating to the repository.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{NewUser, User};
use crate::errors::{AppError, AppResult};
use crate::infra::UserRepository;

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Create a new user; fails with a conflict if the username or email
    /// is already taken (ignoring case)
    async fn create_user(&self, user: NewUser) -> AppResult<User>;

    /// Find user by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Find user by username, ignoring case
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;

    /// Find user by email, ignoring case
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// List all users
    async fn list_users(&self) -> AppResult<Vec<User>>;

    /// Overwrite a user's fields. Uniqueness is re-checked only for
    /// fields that actually changed, so a user never conflicts with
    /// themselves.
    async fn update_user(
        &self,
        id: Uuid,
        username: String,
        email: String,
        full_name: String,
    ) -> AppResult<User>;

    /// Delete a user; fails if the id is unknown
    async fn delete_user(&self, id: Uuid) -> AppResult<()>;

    /// Case-insensitive substring search over full names
    async fn search_by_full_name(&self, fragment: &str) -> AppResult<Vec<User>>;

    /// Check whether a username is taken, ignoring case
    async fn username_exists(&self, username: &str) -> AppResult<bool>;

    /// Check whether an email is taken, ignoring case
    async fn email_exists(&self, email: &str) -> AppResult<bool>;

    /// Total user count
    async fn user_count(&self) -> AppResult<u64>;
}

/// Concrete implementation of UserService using the repository pattern.
pub struct UserManager {
    repo: Arc<dyn UserRepository>,
}

impl UserManager {
    /// Create new user service instance
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl UserService for UserManager {
    async fn create_user(&self, user: NewUser) -> AppResult<User> {
        if self.repo.username_exists(&user.username).await? {
            return Err(AppError::conflict(format!(
                "Username already exists: {}",
                user.username
            )));
        }

        if self.repo.email_exists(&user.email).await? {
            return Err(AppError::conflict(format!(
                "Email already exists: {}",
                user.email
            )));
        }

        self.repo.create(user).await
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        self.repo.find_by_id(id).await
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        self.repo.find_by_username(username).await
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        self.repo.find_by_email(email).await
    }

    async fn list_users(&self) -> AppResult<Vec<User>> {
        self.repo.list().await
    }

    async fn update_user(
        &self,
        id: Uuid,
        username: String,
        email: String,
        full_name: String,
    ) -> AppResult<User> {
        let current = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::missing(format!("User not found with id: {}", id)))?;

        if !current.has_username(&username) && self.repo.username_exists(&username).await? {
            return Err(AppError::conflict(format!(
                "Username already exists: {}",
                username
            )));
        }

        if !current.has_email(&email) && self.repo.email_exists(&email).await? {
            return Err(AppError::conflict(format!("Email already exists: {}", email)));
        }

        self.repo
            .update(User {
                id,
                username,
                email,
                full_name,
                created_at: current.created_at,
            })
            .await
    }

    async fn delete_user(&self, id: Uuid) -> AppResult<()> {
        if self.repo.find_by_id(id).await?.is_none() {
            return Err(AppError::missing(format!("User not found with id: {}", id)));
        }

        self.repo.delete(id).await
    }

    async fn search_by_full_name(&self, fragment: &str) -> AppResult<Vec<User>> {
        self.repo.search_by_full_name(fragment).await
    }

    async fn username_exists(&self, username: &str) -> AppResult<bool> {
        self.repo.username_exists(username).await
    }

    async fn email_exists(&self, email: &str) -> AppResult<bool> {
        self.repo.email_exists(email).await
    }

    async fn user_count(&self) -> AppResult<u64> {
        self.repo.count().await
    }
}
