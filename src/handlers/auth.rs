// src/handlers/auth.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::{
    config::Config,
    error::AppError,
    models::user::{AuthenticatedUser, LoginRequest, RegisterRequest, User},
    utils::{
        hash::{hash_password, verify_password},
        jwt::sign_jwt,
    },
};

const INVALID_CREDENTIALS: &str = "Invalid email and/or password";

/// Registers a new user.
///
/// Hashes the password using Argon2 before storing it.
/// Returns 201 Created with the user's details and a signed token.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = AuthenticatedUser),
        (status = 400, description = "Invalid payload"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn register(
    State(pool): State<PgPool>,
    State(config): State<Config>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let hashed_password = hash_password(&payload.password)?;

    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (id, name, email, password)
        VALUES ($1, $2, $3, $4)
        RETURNING id, name, email, password, profile_picture_url, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&payload.name)
    .bind(payload.email.to_lowercase())
    .bind(hashed_password)
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        if e.as_database_error().is_some_and(|db| db.is_unique_violation()) {
            AppError::Conflict(format!("Email '{}' is already registered", payload.email))
        } else {
            AppError::persistence("register user", e)
        }
    })?;

    tracing::info!(user = %user.id, "Registered user");

    let response = authenticated(user, &config)?;
    Ok((StatusCode::CREATED, Json(json!({ "user": response }))))
}

/// Authenticates a user and returns a JWT token.
///
/// Unknown email and wrong password produce the same response.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = AuthenticatedUser),
        (status = 400, description = "Invalid email and/or password")
    )
)]
pub async fn login(
    State(pool): State<PgPool>,
    State(config): State<Config>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.validate().is_err() {
        return Err(AppError::BadRequest(INVALID_CREDENTIALS.to_string()));
    }

    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, name, email, password, profile_picture_url, created_at
        FROM users
        WHERE email = $1
        "#,
    )
    .bind(payload.email.to_lowercase())
    .fetch_optional(&pool)
    .await
    .map_err(|e| AppError::persistence("log in", e))?
    .ok_or_else(|| AppError::BadRequest(INVALID_CREDENTIALS.to_string()))?;

    if !verify_password(&payload.password, &user.password)? {
        return Err(AppError::BadRequest(INVALID_CREDENTIALS.to_string()));
    }

    let response = authenticated(user, &config)?;
    Ok(Json(json!({ "user": response })))
}

fn authenticated(user: User, config: &Config) -> Result<AuthenticatedUser, AppError> {
    let token = sign_jwt(user.id, &config.jwt_secret, config.jwt_expiration)?;

    Ok(AuthenticatedUser {
        id: user.id,
        name: user.name,
        email: user.email,
        token,
    })
}
