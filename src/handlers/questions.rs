// src/handlers/questions.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use sqlx::{PgPool, types::Json as DbJson};
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppError,
    grading::QuestionSource,
    models::question::{
        CreateQuestionRequest, Question, UpdateQuestionRequest, build_options, clean_question_text,
    },
};

/// Lists the questions of a quiz, oldest first.
#[utoipa::path(
    get,
    path = "/api/questions/quiz/{id}",
    params(("id" = Uuid, Path, description = "Id of the quiz")),
    responses((status = 200, description = "Questions of the quiz", body = [Question]))
)]
pub async fn list_quiz_questions(
    State(pool): State<PgPool>,
    Path(quiz_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let questions = pool.questions_for_quiz(quiz_id).await?;
    Ok(Json(json!({ "questions": questions })))
}

/// Retrieves a single question by ID.
#[utoipa::path(
    get,
    path = "/api/questions/{id}",
    params(("id" = Uuid, Path, description = "Id of the question")),
    responses(
        (status = 200, description = "The question", body = Question),
        (status = 404, description = "Question not found")
    )
)]
pub async fn get_question(
    State(pool): State<PgPool>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let question = sqlx::query_as::<_, Question>(
        r#"
        SELECT id, text, quiz_id, options, created_at
        FROM questions
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(&pool)
    .await
    .map_err(|e| AppError::persistence("get question", e))?
    .ok_or(AppError::NotFound("Unable to get question".to_string()))?;

    Ok(Json(json!({ "question": question })))
}

/// Creates a question after validating its option set.
#[utoipa::path(
    post,
    path = "/api/questions",
    request_body = CreateQuestionRequest,
    responses(
        (status = 201, description = "Question created", body = Question),
        (status = 400, description = "Invalid payload or option set"),
        (status = 404, description = "Quiz not found")
    )
)]
pub async fn create_question(
    State(pool): State<PgPool>,
    Json(payload): Json<CreateQuestionRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let text = clean_question_text(&payload.text)?;
    let options = build_options(&payload.options)?;

    let question = sqlx::query_as::<_, Question>(
        r#"
        INSERT INTO questions (id, text, quiz_id, options)
        VALUES ($1, $2, $3, $4)
        RETURNING id, text, quiz_id, options, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(text)
    .bind(payload.quiz)
    .bind(DbJson(options))
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        if e.as_database_error().is_some_and(|db| db.is_foreign_key_violation()) {
            AppError::NotFound(format!("Quiz '{}' not found", payload.quiz))
        } else {
            AppError::persistence("create question", e)
        }
    })?;

    tracing::info!(question = %question.id, quiz = %question.quiz_id, "Created question");

    Ok((StatusCode::CREATED, Json(json!({ "question": question }))))
}

/// Updates a question. The full option set must be supplied and is replaced.
#[utoipa::path(
    patch,
    path = "/api/questions/{id}",
    params(("id" = Uuid, Path, description = "Id of the question")),
    request_body = UpdateQuestionRequest,
    responses(
        (status = 200, description = "Updated question", body = Question),
        (status = 400, description = "Invalid payload or option set"),
        (status = 404, description = "Question not found")
    )
)]
pub async fn update_question(
    State(pool): State<PgPool>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateQuestionRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let text = payload.text.as_deref().map(clean_question_text).transpose()?;
    let options = build_options(&payload.options)?;

    let question = sqlx::query_as::<_, Question>(
        r#"
        UPDATE questions SET
            text = COALESCE($1, text),
            options = $2
        WHERE id = $3
        RETURNING id, text, quiz_id, options, created_at
        "#,
    )
    .bind(text)
    .bind(DbJson(options))
    .bind(id)
    .fetch_optional(&pool)
    .await
    .map_err(|e| AppError::persistence("update question", e))?
    .ok_or(AppError::NotFound("Unable to update question".to_string()))?;

    Ok(Json(json!({ "question": question })))
}

/// Deletes a question by ID.
#[utoipa::path(
    delete,
    path = "/api/questions/{id}",
    params(("id" = Uuid, Path, description = "Id of the question")),
    responses(
        (status = 200, description = "Question deleted"),
        (status = 404, description = "Question not found")
    )
)]
pub async fn delete_question(
    State(pool): State<PgPool>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let result = sqlx::query("DELETE FROM questions WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await
        .map_err(|e| AppError::persistence("delete question", e))?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Unable to delete question".to_string()));
    }

    Ok(Json(json!({ "message": "Question deleted" })))
}
