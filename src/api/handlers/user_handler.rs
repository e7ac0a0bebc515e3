//! User endpoint handlers.

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{NewUser, UserResponse};
use crate::errors::{AppError, AppResult};
use crate::types::{Created, MessageResponse};

/// User creation/update request body
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserRequest {
    /// Login name, unique ignoring case
    #[validate(length(min = 1, message = "Username is required"))]
    #[schema(example = "john_doe")]
    pub username: String,
    /// Email address, unique ignoring case
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "john.doe@example.com")]
    pub email: String,
    /// Display name
    #[validate(length(min = 1, message = "Full name is required"))]
    #[schema(example = "John Doe")]
    pub full_name: String,
}

/// Full-name search query parameters
#[derive(Debug, Deserialize)]
pub struct NameQuery {
    pub name: String,
}

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/count", get(user_count))
        .route("/search", get(search_users))
        .route("/username/:username", get(get_user_by_username))
        .route("/email/:email", get(get_user_by_email))
        .route("/check-username/:username", get(check_username))
        .route("/check-email/:email", get(check_email))
        .route("/:id", get(get_user).put(update_user).delete(delete_user))
}

/// List all users
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    responses(
        (status = 200, description = "All users", body = [UserResponse])
    )
)]
pub async fn list_users(State(state): State<AppState>) -> AppResult<Json<Vec<UserResponse>>> {
    let users = state.user_service.list_users().await?;

    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Get user by ID
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = Uuid, Path, description = "User identifier")),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 404, description = "No user with that id")
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<UserResponse>> {
    let user = state
        .user_service
        .find_by_id(id)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(UserResponse::from(user)))
}

/// Get user by username (case-insensitive)
#[utoipa::path(
    get,
    path = "/api/users/username/{username}",
    tag = "Users",
    params(("username" = String, Path, description = "Username to look up")),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 404, description = "No user with that username")
    )
)]
pub async fn get_user_by_username(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<Json<UserResponse>> {
    let user = state
        .user_service
        .find_by_username(&username)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(UserResponse::from(user)))
}

/// Get user by email (case-insensitive)
#[utoipa::path(
    get,
    path = "/api/users/email/{email}",
    tag = "Users",
    params(("email" = String, Path, description = "Email to look up")),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 404, description = "No user with that email")
    )
)]
pub async fn get_user_by_email(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> AppResult<Json<UserResponse>> {
    let user = state
        .user_service
        .find_by_email(&email)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(UserResponse::from(user)))
}

/// Create a new user
#[utoipa::path(
    post,
    path = "/api/users",
    tag = "Users",
    request_body = UserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Validation error or duplicate username/email", body = MessageResponse)
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<UserRequest>,
) -> AppResult<Created<UserResponse>> {
    let user = state
        .user_service
        .create_user(NewUser {
            username: payload.username,
            email: payload.email,
            full_name: payload.full_name,
        })
        .await?;

    Ok(Created(UserResponse::from(user)))
}

/// Update an existing user
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = Uuid, Path, description = "User identifier")),
    request_body = UserRequest,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, description = "Unknown user or duplicate username/email", body = MessageResponse)
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UserRequest>,
) -> AppResult<Json<UserResponse>> {
    let user = state
        .user_service
        .update_user(id, payload.username, payload.email, payload.full_name)
        .await?;

    Ok(Json(UserResponse::from(user)))
}

/// Delete a user
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = Uuid, Path, description = "User identifier")),
    responses(
        (status = 200, description = "User deleted", body = MessageResponse),
        (status = 400, description = "Unknown user or user still owns tasks", body = MessageResponse)
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    state.user_service.delete_user(id).await?;

    Ok(Json(MessageResponse::new("User deleted successfully")))
}

/// Search users by full name
#[utoipa::path(
    get,
    path = "/api/users/search",
    tag = "Users",
    params(("name" = String, Query, description = "Full-name fragment")),
    responses(
        (status = 200, description = "Matching users", body = [UserResponse])
    )
)]
pub async fn search_users(
    State(state): State<AppState>,
    Query(query): Query<NameQuery>,
) -> AppResult<Json<Vec<UserResponse>>> {
    let users = state.user_service.search_by_full_name(&query.name).await?;

    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Check whether a username is taken
#[utoipa::path(
    get,
    path = "/api/users/check-username/{username}",
    tag = "Users",
    params(("username" = String, Path, description = "Username to check")),
    responses(
        (status = 200, description = "Existence flag", body = bool)
    )
)]
pub async fn check_username(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<Json<bool>> {
    let exists = state.user_service.username_exists(&username).await?;

    Ok(Json(exists))
}

/// Check whether an email is taken
#[utoipa::path(
    get,
    path = "/api/users/check-email/{email}",
    tag = "Users",
    params(("email" = String, Path, description = "Email to check")),
    responses(
        (status = 200, description = "Existence flag", body = bool)
    )
)]
pub async fn check_email(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> AppResult<Json<bool>> {
    let exists = state.user_service.email_exists(&email).await?;

    Ok(Json(exists))
}

/// Total user count
#[utoipa::path(
    get,
    path = "/api/users/count",
    tag = "Users",
    responses(
        (status = 200, description = "Number of users", body = u64)
    )
)]
pub async fn user_count(State(state): State<AppState>) -> AppResult<Json<u64>> {
    let count = state.user_service.user_count().await?;

    Ok(Json(count))
}
