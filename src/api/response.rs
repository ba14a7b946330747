use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Envelope wrapped around every JSON payload: `{resultCode, message, data}`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub result_code: String,
    pub message: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(result_code: &str, message: impl Into<String>, data: T) -> Self {
        Self {
            result_code: result_code.to_string(),
            message: message.into(),
            data: Some(data),
        }
    }

    pub fn message_only(result_code: &str, message: impl Into<String>) -> Self {
        Self {
            result_code: result_code.to_string(),
            message: message.into(),
            data: None,
        }
    }

    /// HTTP status is the numeric part before the first `-` of the result code.
    pub fn status(&self) -> StatusCode {
        self.result_code
            .split('-')
            .next()
            .and_then(|prefix| prefix.parse::<u16>().ok())
            .and_then(|code| StatusCode::from_u16(code).ok())
            .unwrap_or(StatusCode::OK)
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}
