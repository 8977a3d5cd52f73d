use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Error response type
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Response type for health check endpoint
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

/// Response type for unhealthy status
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct UnhealthyResponse {
    pub status: String,
    pub error: String,
}

pub const USER_NOT_FOUND: &str = "User not found";

/// Custom error type for API endpoints
///
/// Maps every failure to an HTTP status and a JSON `{"error": ...}` body.
/// Store failures are logged in full but answered with a generic message.
#[derive(Debug)]
pub enum ApiError {
    /// No preference document exists for the user
    UserNotFound(String),
    /// Request body is missing, not JSON, or not a JSON object
    MalformedRequest(String),
    /// Document store operation failed
    StoreError(anyhow::Error),
    /// Document store did not answer within the configured timeout
    StoreTimeout(&'static str),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::UserNotFound(user_id) => {
                tracing::info!("Preferences not found for user: {}", user_id);
                (StatusCode::NOT_FOUND, USER_NOT_FOUND.to_string())
            }
            ApiError::MalformedRequest(reason) => {
                tracing::warn!("Rejected malformed request body: {}", reason);
                (
                    StatusCode::BAD_REQUEST,
                    format!("Malformed request body: {}", reason),
                )
            }
            ApiError::StoreError(err) => {
                tracing::error!("Document store error: {:#}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            ApiError::StoreTimeout(operation) => {
                tracing::error!("Document store timed out during {}", operation);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Document store unavailable".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_message,
        });

        (status, body).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::StoreError(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::MalformedRequest(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn into_parts(err: ApiError) -> (StatusCode, ErrorResponse) {
        let response = err.into_response();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_user_not_found_body() {
        let (status, body) = into_parts(ApiError::UserNotFound("u1".to_string())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.error, "User not found");
    }

    #[tokio::test]
    async fn test_store_error_does_not_leak_details() {
        let err = anyhow::anyhow!("connection refused to 10.0.0.7:9010");
        let (status, body) = into_parts(ApiError::from(err)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error, "Internal server error");
        assert!(!body.error.contains("10.0.0.7"));
    }

    #[tokio::test]
    async fn test_store_timeout_is_server_error() {
        let (status, body) = into_parts(ApiError::StoreTimeout("get")).await;
        assert!(status.is_server_error());
        assert_eq!(body.error, "Document store unavailable");
    }

    #[tokio::test]
    async fn test_malformed_request_is_client_error() {
        let (status, body) =
            into_parts(ApiError::MalformedRequest("expected value".to_string())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.error.starts_with("Malformed request body"));
    }
}
