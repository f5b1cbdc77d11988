use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use entities::ValidationError;
use serde::Serialize;
use serde_with::skip_serializing_none;

/// JSON error body for `/api/*` callers: `{"error": .., "error_description": ..}`.
#[skip_serializing_none]
#[derive(Serialize, Debug)]
pub struct ApiError {
    pub error: String,
    #[serde(rename = "error_description")]
    pub description: Option<String>,
    #[serde(skip_serializing)]
    pub status_code: StatusCode,
}

impl ApiError {
    pub fn new(error: &str, status_code: StatusCode) -> Self {
        ApiError {
            error: String::from(error),
            description: None,
            status_code,
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(String::from(description));
        self
    }

    pub fn unauthenticated() -> Self {
        Self::new("This method requires an authenticated user", StatusCode::UNAUTHORIZED)
    }

    pub fn not_found() -> Self {
        Self::new("Record not found", StatusCode::NOT_FOUND)
    }

    pub fn invalid_grant() -> Self {
        Self::new("invalid_grant", StatusCode::UNAUTHORIZED)
            .with_description("Invalid username or password")
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::new(err.message(), StatusCode::UNPROCESSABLE_ENTITY)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code, Json(self)).into_response()
    }
}
