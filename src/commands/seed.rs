//! Seed command - Sample data bootstrap.
//!
//! Inserts an illustrative data set through the public services, and only
//! when the store is empty. Never runs unless explicitly invoked.

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::api::AppState;
use crate::config::Config;
use crate::domain::TaskPriority;
use crate::errors::AppResult;
use crate::infra::Database;

/// Execute the seed command
pub async fn execute(config: Config) -> AppResult<()> {
    let db = Database::connect(&config).await;
    let state = AppState::from_connection(db.get_connection());

    run(&state).await
}

/// Seed sample users and tasks if no users exist yet
pub async fn run(state: &AppState) -> AppResult<()> {
    if state.user_service.user_count().await? > 0 {
        tracing::info!("Store already contains users, skipping sample data");
        return Ok(());
    }

    tracing::info!("Seeding sample data...");

    let john = create_user(state, "john_doe", "john.doe@example.com", "John Doe").await?;
    let jane = create_user(state, "jane_smith", "jane.smith@example.com", "Jane Smith").await?;
    let bob = create_user(state, "bob_wilson", "bob.wilson@example.com", "Bob Wilson").await?;
    let alice = create_user(state, "alice_brown", "alice.brown@example.com", "Alice Brown").await?;

    // Tasks for John
    create_task(
        state,
        john,
        "Complete project proposal",
        "Write and submit the project proposal for the new client",
        TaskPriority::High,
    )
    .await?;
    create_task(
        state,
        john,
        "Review code changes",
        "Review the latest pull requests from the development team",
        TaskPriority::Medium,
    )
    .await?;
    create_task(
        state,
        john,
        "Update documentation",
        "Update API documentation with new endpoints",
        TaskPriority::Low,
    )
    .await?;

    // Tasks for Jane
    create_task(
        state,
        jane,
        "Design new UI mockups",
        "Create wireframes and mockups for the mobile app",
        TaskPriority::High,
    )
    .await?;
    create_task(
        state,
        jane,
        "Conduct user research",
        "Interview 5 users to gather feedback on current interface",
        TaskPriority::Medium,
    )
    .await?;
    let presentation = create_task(
        state,
        jane,
        "Prepare presentation",
        "Prepare slides for the quarterly review meeting",
        TaskPriority::Urgent,
    )
    .await?;
    state
        .task_service
        .set_task_due_date(presentation, Utc::now() + Duration::days(1))
        .await?;

    // Tasks for Bob
    create_task(
        state,
        bob,
        "Fix critical bug in payment system",
        "Investigate and fix the payment processing issue reported by users",
        TaskPriority::Urgent,
    )
    .await?;
    create_task(
        state,
        bob,
        "Write unit tests",
        "Add unit tests for the new authentication module",
        TaskPriority::Medium,
    )
    .await?;
    create_task(
        state,
        bob,
        "Database optimization",
        "Optimize database queries for better performance",
        TaskPriority::Low,
    )
    .await?;

    // Tasks for Alice
    create_task(
        state,
        alice,
        "Plan team building event",
        "Organize a team building event for next month",
        TaskPriority::Low,
    )
    .await?;
    create_task(
        state,
        alice,
        "Update employee handbook",
        "Review and update the company employee handbook",
        TaskPriority::Medium,
    )
    .await?;
    let budget_report = create_task(
        state,
        alice,
        "Prepare budget report",
        "Compile monthly budget report for management review",
        TaskPriority::High,
    )
    .await?;
    // One task already overdue
    state
        .task_service
        .set_task_due_date(budget_report, Utc::now() - Duration::days(2))
        .await?;

    // Mark one task per early user as completed
    for user_id in [john, jane] {
        if let Some(task) = state.task_service.find_by_user(user_id).await?.first() {
            state.task_service.complete_task(task.id).await?;
        }
    }

    let users = state.user_service.user_count().await?;
    let tasks = state.task_service.list_tasks().await?.len();
    tracing::info!("Sample data initialized: {} users, {} tasks", users, tasks);

    Ok(())
}

async fn create_user(
    state: &AppState,
    username: &str,
    email: &str,
    full_name: &str,
) -> AppResult<Uuid> {
    let user = state
        .user_service
        .create_user(crate::domain::NewUser {
            username: username.to_string(),
            email: email.to_string(),
            full_name: full_name.to_string(),
        })
        .await?;

    Ok(user.id)
}

async fn create_task(
    state: &AppState,
    user_id: Uuid,
    title: &str,
    description: &str,
    priority: TaskPriority,
) -> AppResult<Uuid> {
    let task = state
        .task_service
        .create_task_for_user(
            user_id,
            title.to_string(),
            Some(description.to_string()),
            Some(priority),
        )
        .await?;

    Ok(task.id)
}
