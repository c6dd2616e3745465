// src/handlers/docs.rs

use axum::{Json, response::IntoResponse};
use utoipa::OpenApi;

use crate::{
    grading::{AnswerMap, Grade},
    handlers::{attempts, auth, questions, quizzes, users},
    models::{
        attempt::{Attempt, SubmitAttemptRequest},
        question::{AnswerOption, CreateQuestionRequest, Question, UpdateQuestionRequest},
        quiz::{CreateQuizRequest, Quiz, UpdateQuizRequest},
        user::{AuthenticatedUser, LoginRequest, RegisterRequest, UpdateUserRequest, User},
    },
};

#[derive(OpenApi)]
#[openapi(
    info(title = "Quiz API", description = "Quizzes, questions and graded attempts"),
    paths(
        auth::register,
        auth::login,
        users::list_users,
        users::get_user,
        users::update_user,
        users::delete_user,
        quizzes::list_quizzes,
        quizzes::create_quiz,
        quizzes::get_quiz,
        quizzes::update_quiz,
        quizzes::delete_quiz,
        questions::list_quiz_questions,
        questions::get_question,
        questions::create_question,
        questions::update_question,
        questions::delete_question,
        attempts::attempt_quiz,
        attempts::list_quiz_attempts,
        attempts::list_user_attempts,
        attempts::list_user_quiz_attempts,
        attempts::get_attempt,
    ),
    components(schemas(
        AnswerMap,
        Grade,
        Attempt,
        SubmitAttemptRequest,
        AnswerOption,
        Question,
        CreateQuestionRequest,
        UpdateQuestionRequest,
        Quiz,
        CreateQuizRequest,
        UpdateQuizRequest,
        User,
        AuthenticatedUser,
        RegisterRequest,
        LoginRequest,
        UpdateUserRequest,
    ))
)]
pub struct ApiDoc;

/// Serves the OpenAPI document.
pub async fn openapi() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}
