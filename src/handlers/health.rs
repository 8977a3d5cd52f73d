use crate::error::{ApiError, HealthResponse, UnhealthyResponse};
use crate::routes;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};

/// GET /health handler - Health check endpoint
///
/// Asks the document store to prove it is reachable.
/// Returns 200 OK if it is, 503 Service Unavailable otherwise.
#[utoipa::path(
    get,
    path = routes::HEALTH,
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 503, description = "Service is unhealthy", body = UnhealthyResponse)
    ),
    tag = "health"
)]
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<HealthResponse>), (StatusCode, Json<UnhealthyResponse>)> {
    let error = match state.store_call("health check", state.store.health_check()).await {
        Ok(()) => {
            tracing::debug!("Health check passed");
            return Ok((
                StatusCode::OK,
                Json(HealthResponse {
                    status: "healthy".to_string(),
                }),
            ));
        }
        Err(ApiError::StoreError(e)) => format!("Cannot connect to document store: {}", e),
        Err(ApiError::StoreTimeout(_)) => "Document store timed out".to_string(),
        Err(e) => format!("Health check failed: {:?}", e),
    };

    tracing::error!("Health check failed: {}", error);
    Err((
        StatusCode::SERVICE_UNAVAILABLE,
        Json(UnhealthyResponse {
            status: "unhealthy".to_string(),
            error,
        }),
    ))
}

#[cfg(test)]
mod tests {
    use crate::error::{HealthResponse, UnhealthyResponse};
    use crate::test_support::*;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_health_endpoint_healthy() {
        let app = setup_test_app();

        let response = send(&app, get("/health")).await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let response_json: HealthResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(response_json.status, "healthy");
    }

    #[tokio::test]
    async fn test_health_endpoint_unhealthy() {
        let app = failing_app();

        let response = send(&app, get("/health")).await;

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let response_json: UnhealthyResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(response_json.status, "unhealthy");
        assert!(response_json.error.contains("Cannot connect"));
    }

    #[tokio::test]
    async fn test_health_endpoint_stalled_store() {
        let app = stalled_app();

        let response = send(&app, get("/health")).await;

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
