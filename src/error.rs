use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::{
    backend::BackendError,
    response::{ApiResponse, Meta},
};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not Found")]
    NotFound,

    #[error("Bad Request {0}")]
    BadRequest(String),

    #[error("Unauthorized {0}")]
    Unauthorized(String),

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error("Template Error {0}")]
    Template(#[from] askama::Error),

    #[error("Internal Server Error")]
    Internal(#[from] anyhow::Error),
}

#[derive(Serialize)]
struct ErrorData {
    error: String,
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Backend(BackendError::Unauthorized) => StatusCode::UNAUTHORIZED,
            AppError::Backend(BackendError::Rejected(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Backend(BackendError::Status { status, .. })
                if (400..500).contains(status) =>
            {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::Backend(_) => StatusCode::BAD_GATEWAY,
            AppError::Template(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Text shown to the operator in the banner, toast or alert.
    pub fn user_message(&self) -> String {
        match self {
            AppError::BadRequest(message) | AppError::Unauthorized(message) => message.clone(),
            AppError::Backend(err) => err.user_message(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() || status == StatusCode::BAD_GATEWAY {
            tracing::error!(error = %self, "request failed");
        }

        let body = ApiResponse {
            message: self.user_message(),
            data: Some(ErrorData {
                error: self.to_string(),
            }),
            meta: Some(Meta::empty()),
        };

        (status, axum::Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_unauthorized_is_not_worker_specific() {
        let err = AppError::from(BackendError::Unauthorized);
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.user_message(), "Session expired. Please login again.");
    }

    #[test]
    fn caller_supplied_session_message_wins() {
        let err = AppError::Unauthorized("Your worker session expired.".into());
        assert_eq!(err.user_message(), "Your worker session expired.");
        assert_eq!(err.into_response().status(), StatusCode::UNAUTHORIZED);
    }
}
