use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::{error, warn};
use validator::ValidationErrors;

use crate::api::response::ApiResponse;

pub type AppResult<T> = Result<T, AppError>;

/// Every failure a request can end in. Each variant has a stable result code
/// whose numeric prefix is the HTTP status.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Validation(String),

    #[error("Authorization header must use the Bearer scheme")]
    MalformedAuthorization,

    #[error("Please log in first")]
    Unauthenticated,

    #[error("Password does not match")]
    PasswordMismatch,

    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("Invalid refresh token, please log in again")]
    RefreshTokenMismatch,

    #[error("Refresh token owner no longer exists, please log in again")]
    RefreshUserNotFound,

    #[error("Refresh token has expired, please log in again")]
    RefreshTokenExpired,

    #[error("Unknown username")]
    UnknownUsername,

    #[error("Refresh token is missing, please log in again")]
    MissingRefreshToken,

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Username is already taken")]
    UsernameTaken,

    #[error("Email is already in use")]
    EmailTaken,

    #[error("{0}")]
    Conflict(String),

    #[error("Internal server error")]
    Internal(String),
}

impl AppError {
    pub fn code(&self) -> &'static str {
        match self {
            AppError::BadRequest(_) => "400-0",
            AppError::Validation(_) => "400-1",
            AppError::MalformedAuthorization => "400-2",
            AppError::Unauthenticated => "401-1",
            AppError::PasswordMismatch => "401-2",
            AppError::InvalidApiKey => "401-3",
            AppError::RefreshTokenMismatch => "401-4",
            AppError::RefreshUserNotFound => "401-5",
            AppError::RefreshTokenExpired => "401-6",
            AppError::UnknownUsername => "401-7",
            AppError::MissingRefreshToken => "401-8",
            AppError::Forbidden(_) => "403-1",
            AppError::NotFound(_) => "404-1",
            AppError::UsernameTaken => "409-1",
            AppError::EmailTaken => "409-2",
            AppError::Conflict(_) => "409-3",
            AppError::Internal(_) => "500-1",
        }
    }

    pub fn not_found(what: &str) -> Self {
        AppError::NotFound(format!("{what} not found"))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Internal(detail) => error!(code = self.code(), detail = %detail, "Request failed"),
            _ => warn!(code = self.code(), message = %self, "Request rejected"),
        }
        ApiResponse::<()>::message_only(self.code(), self.to_string()).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::NotFound("Entity not found".into()),
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                AppError::Conflict("Entity already exists".into())
            }
            _ => AppError::Internal(err.to_string()),
        }
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(err: bcrypt::BcryptError) -> Self {
        AppError::Internal(format!("bcrypt: {err}"))
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        AppError::Internal(format!("jwt: {err}"))
    }
}

impl From<JsonRejection> for AppError {
    fn from(err: JsonRejection) -> Self {
        AppError::Validation(format!("Request body is malformed: {}", err.body_text()))
    }
}

impl From<PathRejection> for AppError {
    fn from(err: PathRejection) -> Self {
        AppError::BadRequest(format!("Invalid path parameter: {}", err.body_text()))
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::Validation(validation_message(&errors))
    }
}

/// One `field-code-message` line per violation, sorted so the output does not
/// depend on map iteration order.
pub fn validation_message(errors: &ValidationErrors) -> String {
    let mut lines: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                format!(
                    "{}-{}-{}",
                    field,
                    e.code,
                    e.message.as_deref().unwrap_or("is invalid")
                )
            })
        })
        .collect();
    lines.sort();
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Body {
        #[validate(length(min = 2, message = "too short"))]
        name: String,
        #[validate(range(min = 1, message = "must be positive"))]
        amount: i64,
    }

    #[test]
    fn validation_lines_are_sorted() {
        let errors = Body {
            name: "x".into(),
            amount: 0,
        }
        .validate()
        .unwrap_err();

        assert_eq!(
            validation_message(&errors),
            "amount-range-must be positive\nname-length-too short"
        );
    }

    #[test]
    fn codes_carry_status_prefix() {
        assert_eq!(AppError::RefreshTokenMismatch.code(), "401-4");
        assert_eq!(AppError::not_found("Product").code(), "404-1");
        assert_eq!(AppError::MalformedAuthorization.code(), "400-2");
    }
}
