use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Serialize;

use crate::domain::user::models::User;
use crate::user::errors::UserError;

pub mod create_user;
pub mod delete_user;
pub mod get_user;
pub mod list_users;
pub mod login;
pub mod update_user;

/// HTTP-facing error with the status it maps to.
///
/// Internal failure detail never reaches the body; it is logged where the
/// `UserError` is converted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    Unauthorized(String),
}

impl ApiError {
    fn into_parts(self) -> (StatusCode, String) {
        match self {
            ApiError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.into_parts();
        (status, Json(ErrorBody { message })).into_response()
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(_) => ApiError::NotFound("User not found".to_string()),
            UserError::AlreadyExists(_)
            | UserError::UsernameAlreadyExists(_)
            | UserError::ConcurrentModification(_) => ApiError::Conflict(err.to_string()),
            UserError::InvalidCredentials => {
                ApiError::Unauthorized("Invalid credentials".to_string())
            }
            UserError::InvalidUsername(_)
            | UserError::InvalidEmail(_)
            | UserError::InvalidField(_) => ApiError::BadRequest(err.to_string()),
            UserError::PasswordHashing(_)
            | UserError::TokenIssuance(_)
            | UserError::DatabaseError(_) => {
                tracing::error!(error = %err, "Internal error while handling request");
                ApiError::InternalServerError("Internal server error".to_string())
            }
        }
    }
}

/// Error body shared by every endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub message: String,
}

/// Variant of [`ApiError`] for the create endpoint, whose success response
/// carries a structured envelope; its failures flag `success: false`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvelopedApiError(pub ApiError);

impl IntoResponse for EnvelopedApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.0.into_parts();
        (status, Json(EnvelopedErrorBody { success: false, message })).into_response()
    }
}

impl From<UserError> for EnvelopedApiError {
    fn from(err: UserError) -> Self {
        Self(ApiError::from(err))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct EnvelopedErrorBody {
    success: bool,
    message: String,
}

/// Serialized user record.
///
/// The password field holds the stored hash; the plaintext is gone the
/// moment the record crosses the service boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponseData {
    pub user_id: i32,
    pub name: String,
    pub last_name: String,
    pub user_name: String,
    pub password: String,
    pub email: String,
    pub phone_number: i64,
}

impl From<&User> for UserResponseData {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id.0,
            name: user.name.clone(),
            last_name: user.last_name.clone(),
            user_name: user.username.as_str().to_string(),
            password: user.password_hash.clone(),
            email: user.email.as_str().to_string(),
            phone_number: user.phone_number,
        }
    }
}
