// src/recorder.rs

//! Persists graded submissions and drives the submit flow.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::AppError,
    grading::{self, Grade, QuestionSource},
    models::attempt::{Attempt, SubmitAttemptRequest},
};

/// Stores immutable attempt records.
#[async_trait]
pub trait AttemptRecorder: Send + Sync {
    async fn record_attempt(
        &self,
        quiz_id: Uuid,
        user_id: Uuid,
        grade: Grade,
    ) -> Result<Attempt, AppError>;
}

#[async_trait]
impl AttemptRecorder for PgPool {
    async fn record_attempt(
        &self,
        quiz_id: Uuid,
        user_id: Uuid,
        grade: Grade,
    ) -> Result<Attempt, AppError> {
        sqlx::query_as::<_, Attempt>(
            r#"
            INSERT INTO attempts (id, quiz_id, user_id, score, total, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, quiz_id, user_id, score, total, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(quiz_id)
        .bind(user_id)
        .bind(grade.score)
        .bind(grade.total)
        .bind(Utc::now())
        .fetch_one(self)
        .await
        .map_err(|e| AppError::persistence("attempt quiz", e))
    }
}

/// Fetches the quiz's questions, grades the answers, and records the attempt.
///
/// Validation failures surface before anything is written.
pub async fn submit_attempt<S, R>(
    source: &S,
    recorder: &R,
    submission: SubmitAttemptRequest,
) -> Result<Attempt, AppError>
where
    S: QuestionSource + ?Sized,
    R: AttemptRecorder + ?Sized,
{
    let questions = source.questions_for_quiz(submission.quiz).await?;
    let grade = grading::grade(submission.quiz, &questions, &submission.answers)?;

    tracing::debug!(
        quiz = %submission.quiz,
        user = %submission.user,
        score = grade.score,
        total = grade.total,
        "Graded attempt"
    );

    recorder
        .record_attempt(submission.quiz, submission.user, grade)
        .await
}
