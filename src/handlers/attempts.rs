// src/handlers/attempts.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::AppError,
    models::attempt::{Attempt, SubmitAttemptRequest},
    recorder::submit_attempt,
};

/// Grades a submission against the quiz's current questions and records it.
///
/// Returns the stored attempt. Missing questions or answers are reported
/// with `kind` set to `no_questions` / `no_answers`.
#[utoipa::path(
    post,
    path = "/api/attempts",
    request_body = SubmitAttemptRequest,
    responses(
        (status = 201, description = "Attempt graded and recorded", body = Attempt),
        (status = 400, description = "No questions for the quiz, or no answers submitted")
    )
)]
pub async fn attempt_quiz(
    State(pool): State<PgPool>,
    Json(submission): Json<SubmitAttemptRequest>,
) -> Result<impl IntoResponse, AppError> {
    let attempt = submit_attempt(&pool, &pool, submission).await?;

    tracing::info!(
        attempt = %attempt.id,
        quiz = %attempt.quiz_id,
        user = %attempt.user_id,
        score = attempt.grade.score,
        total = attempt.grade.total,
        "Recorded attempt"
    );

    Ok((StatusCode::CREATED, Json(attempt)))
}

/// Lists all attempts of a quiz.
#[utoipa::path(
    get,
    path = "/api/attempts/quiz/{quiz}",
    params(("quiz" = Uuid, Path, description = "Id of the quiz")),
    responses((status = 200, description = "Attempts of the quiz", body = [Attempt]))
)]
pub async fn list_quiz_attempts(
    State(pool): State<PgPool>,
    Path(quiz_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let attempts = sqlx::query_as::<_, Attempt>(
        r#"
        SELECT id, quiz_id, user_id, score, total, created_at
        FROM attempts
        WHERE quiz_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(quiz_id)
    .fetch_all(&pool)
    .await
    .map_err(|e| AppError::persistence("get quiz attempts", e))?;

    Ok(Json(json!({ "attempts": attempts })))
}

/// Lists all attempts made by a user.
#[utoipa::path(
    get,
    path = "/api/attempts/user/{user}",
    params(("user" = Uuid, Path, description = "Id of the user")),
    responses((status = 200, description = "Attempts of the user", body = [Attempt]))
)]
pub async fn list_user_attempts(
    State(pool): State<PgPool>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let attempts = sqlx::query_as::<_, Attempt>(
        r#"
        SELECT id, quiz_id, user_id, score, total, created_at
        FROM attempts
        WHERE user_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(&pool)
    .await
    .map_err(|e| AppError::persistence("get user attempts", e))?;

    Ok(Json(json!({ "attempts": attempts })))
}

/// Lists a user's attempts at one quiz.
#[utoipa::path(
    get,
    path = "/api/attempts/quiz/{quiz}/user/{user}",
    params(
        ("quiz" = Uuid, Path, description = "Id of the quiz"),
        ("user" = Uuid, Path, description = "Id of the user")
    ),
    responses((status = 200, description = "Attempts of the user at the quiz", body = [Attempt]))
)]
pub async fn list_user_quiz_attempts(
    State(pool): State<PgPool>,
    Path((quiz_id, user_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, AppError> {
    let attempts = sqlx::query_as::<_, Attempt>(
        r#"
        SELECT id, quiz_id, user_id, score, total, created_at
        FROM attempts
        WHERE quiz_id = $1 AND user_id = $2
        ORDER BY created_at DESC
        "#,
    )
    .bind(quiz_id)
    .bind(user_id)
    .fetch_all(&pool)
    .await
    .map_err(|e| AppError::persistence("get user quiz attempts", e))?;

    Ok(Json(json!({ "attempts": attempts })))
}

/// Retrieves a single attempt by ID.
#[utoipa::path(
    get,
    path = "/api/attempts/{id}",
    params(("id" = Uuid, Path, description = "Id of the attempt")),
    responses(
        (status = 200, description = "The attempt", body = Attempt),
        (status = 404, description = "Attempt not found")
    )
)]
pub async fn get_attempt(
    State(pool): State<PgPool>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let attempt = sqlx::query_as::<_, Attempt>(
        r#"
        SELECT id, quiz_id, user_id, score, total, created_at
        FROM attempts
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(&pool)
    .await
    .map_err(|e| AppError::persistence("get attempt", e))?
    .ok_or(AppError::NotFound("Unable to get attempt".to_string()))?;

    Ok(Json(json!({ "attempt": attempt })))
}
