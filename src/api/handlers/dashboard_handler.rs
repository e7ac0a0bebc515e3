//! Dashboard handler - aggregate counts across users and tasks.

use axum::{extract::State, response::Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::api::AppState;
use crate::domain::TaskStatus;
use crate::errors::AppResult;

/// Dashboard aggregate counts
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub total_users: u64,
    pub total_tasks: u64,
    pub completed_tasks: u64,
    pub overdue_tasks: u64,
}

/// Aggregate counts: total users, total tasks, completed tasks, overdue tasks
#[utoipa::path(
    get,
    path = "/api/dashboard",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Aggregate counts", body = DashboardResponse)
    )
)]
pub async fn dashboard(State(state): State<AppState>) -> AppResult<Json<DashboardResponse>> {
    let total_users = state.user_service.user_count().await?;
    let total_tasks = state.task_service.list_tasks().await?.len() as u64;
    let completed_tasks = state
        .task_service
        .find_by_status(TaskStatus::Completed)
        .await?
        .len() as u64;
    let overdue_tasks = state.task_service.find_overdue_tasks().await?.len() as u64;

    Ok(Json(DashboardResponse {
        total_users,
        total_tasks,
        completed_tasks,
        overdue_tasks,
    }))
}
