//! Service Container - Centralized service access.
//!
//! Wires repositories into services so callers depend on the service
//! traits, not the implementations.

use std::sync::Arc;

use super::{TaskService, UserService};
use crate::infra::{TaskStore, UserStore};

/// Service container trait for dependency injection.
pub trait ServiceContainer: Send + Sync {
    /// Get user service
    fn users(&self) -> Arc<dyn UserService>;

    /// Get task service
    fn tasks(&self) -> Arc<dyn TaskService>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    user_service: Arc<dyn UserService>,
    task_service: Arc<dyn TaskService>,
}

impl Services {
    /// Create a new service container with manually injected services
    pub fn new(user_service: Arc<dyn UserService>, task_service: Arc<dyn TaskService>) -> Self {
        Self {
            user_service,
            task_service,
        }
    }

    /// Create service container from a database connection
    pub fn from_connection(db: sea_orm::DatabaseConnection) -> Self {
        use super::{TaskManager, UserManager};

        let user_repo = Arc::new(UserStore::new(db.clone()));
        let task_repo = Arc::new(TaskStore::new(db));
        let user_service = Arc::new(UserManager::new(user_repo.clone()));
        let task_service = Arc::new(TaskManager::new(task_repo, user_repo));

        Self {
            user_service,
            task_service,
        }
    }
}

impl ServiceContainer for Services {
    fn users(&self) -> Arc<dyn UserService> {
        self.user_service.clone()
    }

    fn tasks(&self) -> Arc<dyn TaskService> {
        self.task_service.clone()
    }
}
