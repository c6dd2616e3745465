// src/models/user.rs

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use url::Url;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

static ALPHANUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9]+$").expect("valid regex"));

/// Represents the 'users' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: Uuid,

    /// Display name, at least 5 characters.
    pub name: String,

    /// Unique login email.
    pub email: String,

    /// Argon2 password hash.
    /// Skipped during serialization to prevent leaking sensitive data.
    #[serde(skip)]
    pub password: String,

    pub profile_picture_url: Option<String>,

    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// User details returned with a freshly issued token.
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub token: String,
}

/// DTO for creating a new user (Registration).
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(length(
        min = 5,
        max = 100,
        message = "Name length must be between 5 and 100 characters."
    ))]
    pub name: String,
    #[validate(email(message = "Email address is not valid."))]
    pub email: String,
    #[validate(
        length(
            min = 6,
            max = 128,
            message = "Password length must be between 6 and 128 characters."
        ),
        regex(path = *ALPHANUMERIC, message = "Password must be alphanumeric.")
    )]
    pub password: String,
}

/// DTO for user login.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6, max = 128))]
    pub password: String,
}

/// DTO for updating a user. Fields are optional.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    #[validate(length(
        min = 5,
        max = 100,
        message = "Name length must be between 5 and 100 characters."
    ))]
    pub name: Option<String>,
    #[validate(
        length(min = 6, max = 128),
        regex(path = *ALPHANUMERIC, message = "Password must be alphanumeric.")
    )]
    pub password: Option<String>,
    #[validate(length(max = 500), custom(function = validate_url_string))]
    pub profile_picture_url: Option<String>,
}

/// Validates that a string is a correctly formatted URL.
fn validate_url_string(url: &str) -> Result<(), validator::ValidationError> {
    if Url::parse(url).is_err() {
        return Err(validator::ValidationError::new("invalid_url"));
    }
    Ok(())
}
