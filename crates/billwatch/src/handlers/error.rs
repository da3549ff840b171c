use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use billwatch_core::sync::{retry_after_seconds, sync_error_to_status_code, SyncError};

pub struct AppError(pub anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let Some(sync_error) = self.0.downcast_ref::<SyncError>() else {
            tracing::error!(error = %self.0, "Unhandled error");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "internal_error", "message": self.0.to_string() })),
            )
                .into_response();
        };

        let status = StatusCode::from_u16(sync_error_to_status_code(sync_error))
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            tracing::error!(error = %sync_error, "Request failed");
        }

        let body = Json(json!({
            "error": sync_error.kind(),
            "message": sync_error.to_string(),
        }));
        let mut response = (status, body).into_response();

        if let Some(seconds) = retry_after_seconds(sync_error) {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(seconds));
        }
        response
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
