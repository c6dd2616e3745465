// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method},
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::{
    handlers::{attempts, auth, docs, questions, quizzes, users},
    state::AppState,
};

/// Assembles the main application router.
///
/// * Merges all sub-routers (auth, users, quizzes, questions, attempts, docs).
/// * Serves profile pictures from the configured directory.
/// * Applies global middleware (Trace, CORS).
pub fn create_router(state: AppState) -> Router {
    let origins: Vec<HeaderValue> = state
        .config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login));

    let user_routes = Router::new()
        .route("/", get(users::list_users))
        .route(
            "/{id}",
            get(users::get_user)
                .patch(users::update_user)
                .delete(users::delete_user),
        );

    let quiz_routes = Router::new()
        .route("/", get(quizzes::list_quizzes).post(quizzes::create_quiz))
        .route(
            "/{id}",
            get(quizzes::get_quiz)
                .patch(quizzes::update_quiz)
                .delete(quizzes::delete_quiz),
        );

    let question_routes = Router::new()
        .route("/", post(questions::create_question))
        .route("/quiz/{id}", get(questions::list_quiz_questions))
        .route(
            "/{id}",
            get(questions::get_question)
                .patch(questions::update_question)
                .delete(questions::delete_question),
        );

    let attempt_routes = Router::new()
        .route("/", post(attempts::attempt_quiz))
        .route("/quiz/{quiz}", get(attempts::list_quiz_attempts))
        .route("/user/{user}", get(attempts::list_user_attempts))
        .route(
            "/quiz/{quiz}/user/{user}",
            get(attempts::list_user_quiz_attempts),
        )
        .route("/{id}", get(attempts::get_attempt));

    let pictures = ServeDir::new(&state.config.pictures_dir);

    Router::new()
        .nest("/api/auth", auth_routes)
        .nest("/api/users", user_routes)
        .nest("/api/quizzes", quiz_routes)
        .nest("/api/questions", question_routes)
        .nest("/api/attempts", attempt_routes)
        .route("/api/docs/openapi.json", get(docs::openapi))
        .nest_service("/profile-pictures", pictures)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
