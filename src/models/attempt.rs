// src/models/attempt.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::grading::{AnswerMap, Grade};

/// Represents the 'attempts' table in the database.
/// One immutable row per graded submission.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize, ToSchema)]
pub struct Attempt {
    pub id: Uuid,
    pub quiz_id: Uuid,
    pub user_id: Uuid,

    /// Stored as the `score` and `total` columns.
    #[sqlx(flatten)]
    pub grade: Grade,

    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// DTO for submitting a quiz attempt.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SubmitAttemptRequest {
    /// Id of the attempted quiz.
    pub quiz: Uuid,
    /// Id of the user attempting it.
    pub user: Uuid,
    /// Question id -> chosen option id.
    pub answers: AnswerMap,
}
