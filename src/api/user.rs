use axum::extract::State;

use crate::{
    AppState,
    api::{
        ApiPath,
        dto::{AdminUserDto, UserDto},
        response::ApiResponse,
    },
    error::{AppError, AppResult},
    middleware::auth::CurrentUser,
};

/// The caller, re-read from the store so claims-derived principals see
/// current data.
pub async fn me(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
) -> AppResult<ApiResponse<UserDto>> {
    let user = state
        .auth_service()
        .find_by_id(principal.id())
        .await?
        .ok_or_else(|| AppError::not_found("User"))?;

    Ok(ApiResponse::new("200-1", "OK", UserDto::from(&user)))
}

pub async fn list(State(state): State<AppState>) -> AppResult<ApiResponse<Vec<AdminUserDto>>> {
    let users = state.user_service().list().await?;
    Ok(ApiResponse::new(
        "200-1",
        "OK",
        users.iter().map(AdminUserDto::from).collect(),
    ))
}

pub async fn get_one(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<ApiResponse<AdminUserDto>> {
    let user = state.user_service().get(id).await?;
    Ok(ApiResponse::new("200-1", "OK", AdminUserDto::from(&user)))
}

pub async fn remove(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<ApiResponse<()>> {
    state.user_service().delete(id).await?;
    Ok(ApiResponse::message_only("200-1", format!("User {id} deleted")))
}
