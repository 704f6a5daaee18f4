use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::acquisition::AcquisitionError;
use crate::provider::ProviderError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<AcquisitionError> for AppError {
    fn from(err: AcquisitionError) -> Self {
        match err {
            AcquisitionError::InvalidInput(msg) => AppError::Validation(msg),
            AcquisitionError::Provider(e) => AppError::Provider(e),
            AcquisitionError::Task(e) => {
                AppError::Internal(anyhow::anyhow!("keyword fetch task failed: {e}"))
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Provider(ProviderError::Unauthorized) => {
                tracing::error!("Image provider rejected the configured access key");
                (
                    StatusCode::BAD_GATEWAY,
                    "PROVIDER_AUTH_ERROR",
                    "The image provider rejected our credentials".to_string(),
                )
            }
            AppError::Provider(ProviderError::RateLimited) => (
                StatusCode::TOO_MANY_REQUESTS,
                "PROVIDER_RATE_LIMITED",
                "The image provider rate limit was reached, try again later".to_string(),
            ),
            AppError::Provider(e @ ProviderError::Http { .. }) => {
                tracing::error!("Provider HTTP error: {e}");
                (
                    StatusCode::BAD_GATEWAY,
                    "PROVIDER_HTTP_ERROR",
                    "The image provider returned an error".to_string(),
                )
            }
            AppError::Provider(e @ ProviderError::Network(_)) => {
                tracing::error!("Provider network error: {e}");
                (
                    StatusCode::BAD_GATEWAY,
                    "PROVIDER_NETWORK_ERROR",
                    "The image provider could not be reached".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_maps_to_validation() {
        let err: AppError = AcquisitionError::InvalidInput("empty".to_string()).into();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_provider_status_codes() {
        let cases = [
            (ProviderError::Unauthorized, StatusCode::BAD_GATEWAY),
            (ProviderError::RateLimited, StatusCode::TOO_MANY_REQUESTS),
            (
                ProviderError::Http {
                    status: 500,
                    message: "boom".to_string(),
                },
                StatusCode::BAD_GATEWAY,
            ),
            (ProviderError::Network("reset".to_string()), StatusCode::BAD_GATEWAY),
        ];

        for (err, expected) in cases {
            let response = AppError::from(AcquisitionError::Provider(err)).into_response();
            assert_eq!(response.status(), expected);
        }
    }

    #[test]
    fn test_validation_is_bad_request() {
        let response = AppError::Validation("max_width must be positive".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
