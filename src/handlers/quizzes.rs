// src/handlers/quizzes.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppError,
    models::quiz::{CreateQuizRequest, Quiz, UpdateQuizRequest},
    utils::html::clean_text,
};

/// Lists all quizzes, newest first.
#[utoipa::path(
    get,
    path = "/api/quizzes",
    responses((status = 200, description = "All quizzes", body = [Quiz]))
)]
pub async fn list_quizzes(State(pool): State<PgPool>) -> Result<impl IntoResponse, AppError> {
    let quizzes = sqlx::query_as::<_, Quiz>(
        r#"
        SELECT id, name, description, user_id, created_at
        FROM quizzes
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(&pool)
    .await
    .map_err(|e| AppError::persistence("get all quizzes", e))?;

    Ok(Json(json!({ "quizzes": quizzes })))
}

/// Creates a quiz owned by `user`.
#[utoipa::path(
    post,
    path = "/api/quizzes",
    request_body = CreateQuizRequest,
    responses(
        (status = 201, description = "Quiz created", body = Quiz),
        (status = 400, description = "Invalid payload")
    )
)]
pub async fn create_quiz(
    State(pool): State<PgPool>,
    Json(payload): Json<CreateQuizRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let quiz = sqlx::query_as::<_, Quiz>(
        r#"
        INSERT INTO quizzes (id, name, description, user_id)
        VALUES ($1, $2, $3, $4)
        RETURNING id, name, description, user_id, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(clean_text(&payload.name))
    .bind(payload.description.as_deref().map(clean_text))
    .bind(payload.user)
    .fetch_one(&pool)
    .await
    .map_err(|e| AppError::persistence("create quiz", e))?;

    tracing::info!(quiz = %quiz.id, owner = %quiz.user_id, "Created quiz");

    Ok((StatusCode::CREATED, Json(json!({ "quiz": quiz }))))
}

/// Retrieves a single quiz by ID.
#[utoipa::path(
    get,
    path = "/api/quizzes/{id}",
    params(("id" = Uuid, Path, description = "Id of the quiz")),
    responses(
        (status = 200, description = "The quiz", body = Quiz),
        (status = 404, description = "Quiz not found")
    )
)]
pub async fn get_quiz(
    State(pool): State<PgPool>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let quiz = sqlx::query_as::<_, Quiz>(
        r#"
        SELECT id, name, description, user_id, created_at
        FROM quizzes
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(&pool)
    .await
    .map_err(|e| AppError::persistence("get quiz", e))?
    .ok_or(AppError::NotFound("Unable to get quiz".to_string()))?;

    Ok(Json(json!({ "quiz": quiz })))
}

/// Updates name and/or description. The owner cannot be changed.
#[utoipa::path(
    patch,
    path = "/api/quizzes/{id}",
    params(("id" = Uuid, Path, description = "Id of the quiz")),
    request_body = UpdateQuizRequest,
    responses(
        (status = 200, description = "Updated quiz", body = Quiz),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Quiz not found")
    )
)]
pub async fn update_quiz(
    State(pool): State<PgPool>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateQuizRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let quiz = sqlx::query_as::<_, Quiz>(
        r#"
        UPDATE quizzes SET
            name = COALESCE($1, name),
            description = COALESCE($2, description)
        WHERE id = $3
        RETURNING id, name, description, user_id, created_at
        "#,
    )
    .bind(payload.name.as_deref().map(clean_text))
    .bind(payload.description.as_deref().map(clean_text))
    .bind(id)
    .fetch_optional(&pool)
    .await
    .map_err(|e| AppError::persistence("update quiz", e))?
    .ok_or(AppError::NotFound("Unable to update quiz".to_string()))?;

    Ok(Json(json!({ "quiz": quiz })))
}

/// Deletes a quiz and its questions. Recorded attempts are kept.
#[utoipa::path(
    delete,
    path = "/api/quizzes/{id}",
    params(("id" = Uuid, Path, description = "Id of the quiz")),
    responses(
        (status = 200, description = "Quiz deleted"),
        (status = 404, description = "Quiz not found")
    )
)]
pub async fn delete_quiz(
    State(pool): State<PgPool>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let result = sqlx::query("DELETE FROM quizzes WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await
        .map_err(|e| AppError::persistence("delete quiz", e))?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Unable to delete quiz".to_string()));
    }

    tracing::info!(quiz = %id, "Deleted quiz");

    Ok(Json(json!({ "message": "Quiz deleted" })))
}
