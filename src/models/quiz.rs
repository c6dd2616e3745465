// src/models/quiz.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Represents the 'quizzes' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, ToSchema)]
pub struct Quiz {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,

    /// Owner of the quiz. Never changes after creation.
    pub user_id: Uuid,

    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// DTO for creating a new quiz.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateQuizRequest {
    #[validate(length(min = 1, max = 200, message = "Name length must be between 1 and 200 chars"))]
    pub name: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    /// Id of the user creating the quiz.
    pub user: Uuid,
}

/// DTO for updating a quiz. Fields are optional; ownership cannot change.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateQuizRequest {
    #[validate(length(min = 1, max = 200, message = "Name length must be between 1 and 200 chars"))]
    pub name: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
}
