//! Application state - Dependency injection container.
//!
//! Provides centralized access to all application services and infrastructure.

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::services::{ServiceContainer, Services, TaskService, UserService};

/// Application state containing all services (DI container).
#[derive(Clone)]
pub struct AppState {
    /// User service
    pub user_service: Arc<dyn UserService>,
    /// Task service
    pub task_service: Arc<dyn TaskService>,
    /// Database connection (health checks)
    pub db: DatabaseConnection,
}

impl AppState {
    /// Create application state from a database connection.
    ///
    /// This is the recommended way to create AppState as it uses
    /// the ServiceContainer for centralized service wiring.
    pub fn from_connection(db: DatabaseConnection) -> Self {
        let container = Services::from_connection(db.clone());

        Self {
            user_service: container.users(),
            task_service: container.tasks(),
            db,
        }
    }

    /// Create new application state with manually injected services.
    pub fn new(
        user_service: Arc<dyn UserService>,
        task_service: Arc<dyn TaskService>,
        db: DatabaseConnection,
    ) -> Self {
        Self {
            user_service,
            task_service,
            db,
        }
    }
}
