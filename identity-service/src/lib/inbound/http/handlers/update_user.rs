use axum::extract::rejection::JsonRejection;
use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use thiserror::Error;

use super::ApiError;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::domain::user::ports::UserRepository;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::router::AppState;
use crate::user::errors::EmailError;
use crate::user::errors::FieldError;
use crate::user::errors::UsernameError;

/// HTTP request body for replacing a user (raw JSON, full record)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub user_id: i32,
    pub name: String,
    pub last_name: String,
    pub user_name: String,
    pub password: String,
    pub email: String,
    pub phone_number: i64,
}

#[derive(Debug, Clone, Error)]
enum ParseUpdateUserRequestError {
    #[error("Invalid username: {0}")]
    Username(#[from] UsernameError),

    #[error("Invalid email: {0}")]
    Email(#[from] EmailError),

    #[error("Invalid field: {0}")]
    Field(#[from] FieldError),
}

impl UpdateUserRequest {
    fn try_into_command(self) -> Result<UpdateUserCommand, ParseUpdateUserRequestError> {
        let username = Username::new(self.user_name)?;
        let email = EmailAddress::new(self.email)?;
        let command = UpdateUserCommand::new(
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

impl From<ParseUpdateUserRequestError> for ApiError {
    fn from(err: ParseUpdateUserRequestError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

pub async fn update_user<R: UserRepository>(
    State(state): State<AppState<R>>,
    Path(id): Path<i32>,
    body: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(body) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    // Full-replace semantics: the body must target the record in the path.
    if body.user_id != id {
        return Err(ApiError::BadRequest("Mismatched user ID".to_string()));
    }

    let command = body.try_into_command()?;

    state
        .user_service
        .update_user(UserId(id), command)
        .await
        .map_err(ApiError::from)
        .map(|_| StatusCode::NO_CONTENT)
}
