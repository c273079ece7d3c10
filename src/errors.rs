use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("This time slot is already booked")]
    SlotTaken,

    #[error("not found: {0}")]
    NotFound(String),

    #[error("database not available")]
    StorageUnavailable,

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("mail delivery error: {0}")]
    Mail(String),

    #[error("unauthorized")]
    Unauthorized,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::SlotTaken => StatusCode::CONFLICT,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::StorageUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Mail(_) => StatusCode::BAD_GATEWAY,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Internal failures are logged in full but leave the process as a generic message.
        let message = match &self {
            AppError::Database(e) => {
                tracing::error!(error = %e, "storage error");
                "internal error".to_string()
            }
            AppError::Mail(e) => {
                tracing::error!(error = %e, "mail delivery failed");
                "failed to send message".to_string()
            }
            other => other.to_string(),
        };

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}
