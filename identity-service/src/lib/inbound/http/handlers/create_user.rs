use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::header;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use super::ApiError;
use super::EnvelopedApiError;
use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::domain::user::ports::UserRepository;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::router::AppState;
use crate::user::errors::EmailError;
use crate::user::errors::FieldError;
use crate::user::errors::UsernameError;

pub async fn create_user<R: UserRepository>(
    State(state): State<AppState<R>>,
    body: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<CreateUserResponse, EnvelopedApiError> {
    let Json(body) = body
        .map_err(|e| EnvelopedApiError(ApiError::BadRequest(e.body_text())))?;

    state
        .user_service
        .create_user(body.try_into_command()?)
        .await
        .map_err(EnvelopedApiError::from)
        .map(|ref user| CreateUserResponse::new(user))
}

/// HTTP request body for creating a user (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    user_id: i32,
    name: String,
    last_name: String,
    user_name: String,
    password: String,
    email: String,
    phone_number: i64,
}

#[derive(Debug, Clone, Error)]
enum ParseCreateUserRequestError {
    #[error("Invalid username: {0}")]
    Username(#[from] UsernameError),

    #[error("Invalid email: {0}")]
    Email(#[from] EmailError),

    #[error("Invalid field: {0}")]
    Field(#[from] FieldError),
}

impl CreateUserRequest {
    fn try_into_command(self) -> Result<CreateUserCommand, ParseCreateUserRequestError> {
        let username = Username::new(self.user_name)?;
        let email = EmailAddress::new(self.email)?;
        let command = CreateUserCommand::new(
            UserId(self.user_id),
            self.name,
            self.last_name,
            username,
            self.password,
            email,
            self.phone_number,
        )?;
        Ok(command)
    }
}

impl From<ParseCreateUserRequestError> for EnvelopedApiError {
    fn from(err: ParseCreateUserRequestError) -> Self {
        EnvelopedApiError(ApiError::BadRequest(err.to_string()))
    }
}

/// 201 response: success envelope with the public view, plus a Location
/// header pointing at the created record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateUserResponse {
    location: String,
    body: CreateUserResponseBody,
}

impl CreateUserResponse {
    fn new(user: &User) -> Self {
        Self {
            location: format!("/users/{}", user.id),
            body: CreateUserResponseBody {
                success: true,
                user: user.into(),
            },
        }
    }
}

impl IntoResponse for CreateUserResponse {
    fn into_response(self) -> Response {
        (
            StatusCode::CREATED,
            [(header::LOCATION, self.location)],
            Json(self.body),
        )
            .into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateUserResponseBody {
    pub success: bool,
    pub user: PublicUserData,
}

/// Public view of a created user. Deliberately has no password field at
/// all, not even an empty one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUserData {
    pub user_id: i32,
    pub name: String,
    pub last_name: String,
    pub user_name: String,
    pub email: String,
    pub phone_number: i64,
}

impl From<&User> for PublicUserData {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id.0,
            name: user.name.clone(),
            last_name: user.last_name.clone(),
            user_name: user.username.as_str().to_string(),
            email: user.email.as_str().to_string(),
            phone_number: user.phone_number,
        }
    }
}
