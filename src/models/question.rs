// src/models/question.rs

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::{prelude::FromRow, types::Json};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{error::AppError, grading::ValidationError, utils::html::clean_text};

pub const MIN_OPTIONS: usize = 2;
pub const MAX_OPTIONS: usize = 5;

/// One selectable choice. Owned by its question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AnswerOption {
    pub id: Uuid,
    pub text: String,
    pub is_answer: bool,
}

/// Represents the 'questions' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, ToSchema)]
pub struct Question {
    pub id: Uuid,

    /// The prompt shown to the user.
    pub text: String,

    pub quiz_id: Uuid,

    /// Ordered options, stored as a JSON array in the database.
    #[schema(value_type = Vec<AnswerOption>)]
    pub options: Json<Vec<AnswerOption>>,

    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// DTO for creating a new question.
///
/// Options are taken as raw JSON so malformed entries can be counted and
/// reported instead of failing deserialization.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateQuestionRequest {
    #[validate(length(min = 1, max = 1000, message = "Question text must be between 1 and 1000 chars"))]
    pub text: String,
    /// Id of the quiz the question belongs to.
    pub quiz: Uuid,
    #[schema(value_type = Vec<Object>)]
    pub options: Vec<Value>,
}

/// DTO for updating a question. The option set is always replaced whole.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateQuestionRequest {
    #[validate(length(min = 1, max = 1000, message = "Question text must be between 1 and 1000 chars"))]
    pub text: Option<String>,
    #[schema(value_type = Vec<Object>)]
    pub options: Vec<Value>,
}

/// Sanitizes question text, rejecting text that cleans down to nothing.
pub fn clean_question_text(text: &str) -> Result<String, AppError> {
    let cleaned = clean_text(text);
    if cleaned.is_empty() {
        return Err(AppError::BadRequest("Question text must not be empty".to_string()));
    }
    Ok(cleaned)
}

/// Extracts `(text, is_answer)` from a well-formed option entry.
///
/// The text is sanitized first; markup that cleans down to nothing counts as
/// missing text. Accepts both `is_answer` and `isAnswer` keys.
fn option_fields(option: &Value) -> Option<(String, bool)> {
    let object = option.as_object()?;
    let text = object
        .get("text")
        .and_then(Value::as_str)
        .map(clean_text)
        .filter(|text| !text.is_empty())?;
    let is_answer = object
        .get("is_answer")
        .or_else(|| object.get("isAnswer"))
        .and_then(Value::as_bool)?;
    Some((text, is_answer))
}

/// Checks an incoming option set: size, shape, and at least one correct answer.
pub fn validate_options(options: &[Value]) -> Result<(), ValidationError> {
    if !(MIN_OPTIONS..=MAX_OPTIONS).contains(&options.len()) {
        return Err(ValidationError::OptionCountOutOfRange);
    }

    let invalid = options
        .iter()
        .filter(|option| option_fields(option).is_none())
        .count();
    if invalid > 0 {
        return Err(ValidationError::MalformedOption(invalid));
    }

    let has_answer = options
        .iter()
        .filter_map(option_fields)
        .any(|(_, is_answer)| is_answer);
    if !has_answer {
        return Err(ValidationError::NoCorrectAnswer);
    }

    Ok(())
}

/// Validates `options` and assigns each a fresh id.
///
/// This is the only way an option set reaches storage.
pub fn build_options(options: &[Value]) -> Result<Vec<AnswerOption>, ValidationError> {
    validate_options(options)?;

    Ok(options
        .iter()
        .filter_map(option_fields)
        .map(|(text, is_answer)| AnswerOption {
            id: Uuid::new_v4(),
            text,
            is_answer,
        })
        .collect())
}
