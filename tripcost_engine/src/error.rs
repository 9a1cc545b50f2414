//! Errors surfaced by the HTTP API.

use crate::invoice::NotifyError;
use crate::store::StoreError;
use crate::validation::ValidationError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Notify(#[from] NotifyError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::NotFound(_) | ApiError::Store(StoreError::UnknownCustomer(_)) => {
                StatusCode::NOT_FOUND
            }
            ApiError::Notify(NotifyError::MissingRecipient) => StatusCode::BAD_REQUEST,
            ApiError::Store(_) | ApiError::Notify(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let missing = ApiError::from(ValidationError::MissingField { field: "email" });
        assert_eq!(missing.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(missing.to_string(), "email is required");

        let unknown = ApiError::from(StoreError::UnknownCustomer("c1".into()));
        assert_eq!(unknown.status(), StatusCode::NOT_FOUND);

        let down = ApiError::from(StoreError::Unavailable("poisoned".into()));
        assert_eq!(down.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
