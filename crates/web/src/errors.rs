use std::fmt;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Failure inside a handler or middleware that the caller can't fix.
/// The cause goes to the log, the client only sees a bare 500.
pub struct AppError(anyhow::Error);

impl AppError {
    pub fn cause(&self) -> &anyhow::Error {
        &self.0
    }
}

impl fmt::Debug for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#}", self.0)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        log::error!("Request failed: {:#}", self.0);
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
