use axum::extract::State;
use axum::Json;

use super::ApiError;
use super::UserResponseData;
use crate::domain::user::ports::UserRepository;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::router::AppState;

pub async fn list_users<R: UserRepository>(
    State(state): State<AppState<R>>,
) -> Result<Json<Vec<UserResponseData>>, ApiError> {
    state
        .user_service
        .list_users()
        .await
        .map_err(ApiError::from)
        .map(|users| Json(users.iter().map(UserResponseData::from).collect()))
}
