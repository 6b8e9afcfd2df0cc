use axum::extract::Path;
use axum::extract::State;
use axum::Json;

use super::ApiError;
use super::UserResponseData;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserRepository;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::router::AppState;

pub async fn get_user<R: UserRepository>(
    State(state): State<AppState<R>>,
    Path(id): Path<i32>,
) -> Result<Json<UserResponseData>, ApiError> {
    state
        .user_service
        .get_user(UserId(id))
        .await
        .map_err(ApiError::from)
        .map(|ref user| Json(user.into()))
}
