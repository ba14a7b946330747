use axum::{
    Json,
    extract::{Query, State},
    http::header::AUTHORIZATION,
    response::IntoResponse,
};
use serde::Deserialize;
use tower_cookies::Cookies;
use validator::Validate;

use crate::{
    AppState,
    api::{ValidatedJson, dto::UserDto, not_blank, response::ApiResponse},
    error::{AppError, AppResult},
    services::{
        auth_service::JoinRequest,
        cookie_service::{ACCESS_TOKEN_COOKIE, CookieService, REFRESH_TOKEN_COOKIE},
    },
};

#[derive(Deserialize, Validate)]
pub struct JoinBody {
    #[validate(length(min = 2, max = 30, message = "must be 2 to 30 characters"))]
    pub username: String,
    #[validate(length(min = 2, max = 30, message = "must be 2 to 30 characters"))]
    pub password: String,
    #[validate(length(min = 2, max = 30, message = "must be 2 to 30 characters"))]
    pub nickname: String,
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(custom(function = "not_blank", message = "must not be blank"))]
    pub address: String,
}

#[derive(Deserialize, Validate)]
pub struct LoginBody {
    #[validate(custom(function = "not_blank", message = "must not be blank"))]
    pub username: String,
    #[validate(custom(function = "not_blank", message = "must not be blank"))]
    pub password: String,
}

#[derive(Deserialize)]
pub struct UsernameQuery {
    #[serde(default)]
    pub username: String,
}

#[derive(Deserialize)]
pub struct EmailQuery {
    #[serde(default)]
    pub email: String,
}

pub async fn join(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<JoinBody>,
) -> AppResult<ApiResponse<UserDto>> {
    let user = state
        .auth_service()
        .join(JoinRequest {
            username: &body.username,
            password: &body.password,
            nickname: &body.nickname,
            email: &body.email,
            address: &body.address,
        })
        .await?;

    Ok(ApiResponse::new(
        "201-1",
        format!("Welcome, {}!", user.nickname),
        UserDto::from(&user),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    cookies: Cookies,
    ValidatedJson(body): ValidatedJson<LoginBody>,
) -> AppResult<ApiResponse<UserDto>> {
    let outcome = state
        .auth_service()
        .login(&body.username, &body.password)
        .await?;

    CookieService::new(&cookies, &state.config.cookies).set_auth_cookies(
        &outcome.access_token,
        &outcome.refresh_token,
        &outcome.user.api_key,
    );

    Ok(ApiResponse::new(
        "200-1",
        format!("{} logged in", outcome.user.nickname),
        UserDto::from(&outcome.user),
    ))
}

pub async fn logout(
    State(state): State<AppState>,
    cookies: Cookies,
) -> AppResult<ApiResponse<()>> {
    let cookie_service = CookieService::new(&cookies, &state.config.cookies);
    let refresh_token = cookie_service.get_cookie_value(REFRESH_TOKEN_COOKIE, "");
    if !refresh_token.is_empty() {
        state.auth_service().logout(&refresh_token).await?;
    }
    cookie_service.clear_auth_cookies();

    Ok(ApiResponse::message_only("200-1", "Logged out"))
}

/// Explicit form of the refresh upgrade the authentication middleware does
/// implicitly.
pub async fn refresh(
    State(state): State<AppState>,
    cookies: Cookies,
) -> AppResult<impl IntoResponse> {
    let cookie_service = CookieService::new(&cookies, &state.config.cookies);
    let refresh_token = cookie_service.get_cookie_value(REFRESH_TOKEN_COOKIE, "");
    if refresh_token.is_empty() {
        return Err(AppError::MissingRefreshToken);
    }

    let (user, access_token) = match state
        .auth_service()
        .exchange_refresh_token(&refresh_token)
        .await
    {
        Ok(renewed) => renewed,
        Err(err) => {
            cookie_service.clear_after_refresh_failure(&err);
            return Err(err);
        }
    };
    cookie_service.set_cookie(ACCESS_TOKEN_COOKIE, &access_token);

    Ok((
        [(AUTHORIZATION, format!("Bearer {access_token}"))],
        ApiResponse::new("200-1", "Access token renewed", UserDto::from(&user)),
    ))
}

pub async fn check_username(
    State(state): State<AppState>,
    Query(query): Query<UsernameQuery>,
) -> AppResult<Json<bool>> {
    if query.username.trim().is_empty() {
        return Err(AppError::BadRequest("username is required".into()));
    }
    Ok(Json(state.auth_service().is_username_available(&query.username).await?))
}

pub async fn check_email(
    State(state): State<AppState>,
    Query(query): Query<EmailQuery>,
) -> AppResult<Json<bool>> {
    if query.email.trim().is_empty() {
        return Err(AppError::BadRequest("email is required".into()));
    }
    Ok(Json(state.auth_service().is_email_available(&query.email).await?))
}
