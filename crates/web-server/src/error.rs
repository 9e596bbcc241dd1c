use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Gateway(#[from] database::GatewayError),
    #[error("Invalid request: {0}")]
    Validation(#[from] core_types::CoreError),
    #[error("Malformed request body: {0}")]
    MalformedBody(String),
}

/// Converts our custom `AppError` into an HTTP response.
///
/// Client errors carry no body detail. Gateway failures carry the failure
/// message and the stage that produced it.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Gateway(gateway_err) => {
                tracing::error!(error = %gateway_err, stage = %gateway_err.stage, "Database error.");
                let body = Json(json!({
                    "error": gateway_err.to_string(),
                    "stage": gateway_err.stage,
                }));
                (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
            }
            AppError::Validation(validation_err) => {
                tracing::debug!(error = %validation_err, "Rejected request.");
                StatusCode::BAD_REQUEST.into_response()
            }
            AppError::MalformedBody(message) => {
                tracing::debug!(error = %message, "Rejected request body.");
                StatusCode::BAD_REQUEST.into_response()
            }
        }
    }
}
