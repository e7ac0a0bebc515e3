//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::OpenApi;

use crate::api::handlers::{dashboard_handler, task_handler, user_handler};
use crate::domain::{TaskPriority, TaskResponse, TaskStatistics, TaskStatus, UserResponse};
use crate::types::MessageResponse;

/// OpenAPI documentation for TaskHub
#[derive(OpenApi)]
#[openapi(
    info(
        title = "TaskHub",
        version = "0.1.0",
        description = "Task management REST API with Axum, SeaORM, and clean architecture",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        // User endpoints
        user_handler::list_users,
        user_handler::get_user,
        user_handler::get_user_by_username,
        user_handler::get_user_by_email,
        user_handler::create_user,
        user_handler::update_user,
        user_handler::delete_user,
        user_handler::search_users,
        user_handler::check_username,
        user_handler::check_email,
        user_handler::user_count,
        // Task endpoints
        task_handler::list_tasks,
        task_handler::get_task,
        task_handler::tasks_by_user,
        task_handler::tasks_by_status,
        task_handler::tasks_by_priority,
        task_handler::tasks_by_user_and_status,
        task_handler::overdue_tasks,
        task_handler::create_task,
        task_handler::create_task_for_user,
        task_handler::update_task,
        task_handler::update_task_status,
        task_handler::update_task_priority,
        task_handler::complete_task,
        task_handler::set_task_due_date,
        task_handler::delete_task,
        task_handler::search_by_title,
        task_handler::search_by_description,
        task_handler::tasks_due_between,
        task_handler::high_priority_tasks,
        task_handler::task_statistics,
        // Dashboard
        dashboard_handler::dashboard,
    ),
    components(
        schemas(
            // Domain types
            TaskStatus,
            TaskPriority,
            UserResponse,
            TaskResponse,
            TaskStatistics,
            MessageResponse,
            // Request types
            user_handler::UserRequest,
            task_handler::CreateTaskRequest,
            task_handler::UpdateTaskRequest,
            task_handler::UserRef,
            // Dashboard
            dashboard_handler::DashboardResponse,
        )
    ),
    tags(
        (name = "Users", description = "User management operations"),
        (name = "Tasks", description = "Task management operations"),
        (name = "Dashboard", description = "Aggregate statistics")
    )
)]
pub struct ApiDoc;
