// src/handlers/users.rs

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppError,
    models::user::{UpdateUserRequest, User},
    utils::hash::hash_password,
};

/// Lists all users in the system.
#[utoipa::path(
    get,
    path = "/api/users",
    responses((status = 200, description = "All users", body = [User]))
)]
pub async fn list_users(State(pool): State<PgPool>) -> Result<impl IntoResponse, AppError> {
    let users = sqlx::query_as::<_, User>(
        r#"
        SELECT id, name, email, password, profile_picture_url, created_at
        FROM users
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(&pool)
    .await
    .map_err(|e| AppError::persistence("get all users", e))?;

    Ok(Json(json!({ "users": users })))
}

/// Retrieves a single user by ID.
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = Uuid, Path, description = "Id of the user")),
    responses(
        (status = 200, description = "The user", body = User),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    State(pool): State<PgPool>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let user = fetch_user(&pool, id).await?;
    Ok(Json(json!({ "user": user })))
}

/// Updates name, password or profile picture. Absent fields are left untouched.
#[utoipa::path(
    patch,
    path = "/api/users/{id}",
    params(("id" = Uuid, Path, description = "Id of the user")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated user", body = User),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "User not found")
    )
)]
pub async fn update_user(
    State(pool): State<PgPool>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let hashed_password = payload
        .password
        .as_deref()
        .map(hash_password)
        .transpose()?;

    let user = sqlx::query_as::<_, User>(
        r#"
        UPDATE users SET
            name = COALESCE($1, name),
            password = COALESCE($2, password),
            profile_picture_url = COALESCE($3, profile_picture_url)
        WHERE id = $4
        RETURNING id, name, email, password, profile_picture_url, created_at
        "#,
    )
    .bind(payload.name)
    .bind(hashed_password)
    .bind(payload.profile_picture_url)
    .bind(id)
    .fetch_optional(&pool)
    .await
    .map_err(|e| AppError::persistence("update user", e))?
    .ok_or(AppError::NotFound("Unable to update user".to_string()))?;

    Ok(Json(json!({ "user": user })))
}

/// Deletes a user by ID.
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(("id" = Uuid, Path, description = "Id of the user")),
    responses(
        (status = 200, description = "User deleted"),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_user(
    State(pool): State<PgPool>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await
        .map_err(|e| AppError::persistence("delete user", e))?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Unable to delete user".to_string()));
    }

    tracing::info!(user = %id, "Deleted user");

    Ok(Json(json!({ "message": "User deleted" })))
}

async fn fetch_user(pool: &PgPool, id: Uuid) -> Result<User, AppError> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, name, email, password, profile_picture_url, created_at
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(|e| AppError::persistence("get user", e))?
    .ok_or(AppError::NotFound("Unable to get user".to_string()))
}
