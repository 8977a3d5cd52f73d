use crate::error::{ApiError, ErrorResponse};
use crate::routes;
use crate::state::AppState;
use crate::store::{Document, USER_PREFERENCE};
use axum::{extract::Path, extract::State, http::StatusCode, Json};

/// GET /preferences/:user_id handler - Retrieve a user's preference document
///
/// Answers 404 with `{"error": "User not found"}` when no document exists.
#[utoipa::path(
    get,
    path = routes::PREFERENCES,
    params(
        ("user_id" = String, Path, description = "Opaque user identifier")
    ),
    responses(
        (status = 200, description = "Stored preference document", body = serde_json::Value),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Document store error", body = ErrorResponse),
        (status = 503, description = "Document store timed out", body = ErrorResponse)
    ),
    tag = "preferences"
)]
pub async fn get_preferences_handler(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<(StatusCode, Json<Document>), ApiError> {
    let document = state
        .store_call("get preferences", state.store.get(USER_PREFERENCE, &user_id))
        .await?;

    match document {
        Some(data) => {
            tracing::info!("Successfully retrieved preferences for user: {}", user_id);
            Ok((StatusCode::OK, Json(data)))
        }
        None => Err(ApiError::UserNotFound(user_id)),
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::*;
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_get_returns_stored_document() {
        let app = setup_test_app();
        let prefs = json!({
            "diet": "vegan",
            "allergies": ["peanut", "shellfish"],
            "max_minutes": 30,
            "notifications": {"email": true, "push": false}
        });

        let response = send(&app, post_json("/preferences/u1", &prefs)).await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = send(&app, get("/preferences/u1")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(read_json(response).await, prefs);
    }

    #[tokio::test]
    async fn test_get_missing_user_is_not_found() {
        let app = setup_test_app();

        let response = send(&app, get("/preferences/nobody")).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(read_json(response).await, json!({"error": "User not found"}));
    }

    #[tokio::test]
    async fn test_get_preserves_key_order() {
        let app = setup_test_app();
        let raw = r#"{"zeta":1,"alpha":2,"mid":3}"#;

        send(&app, post_raw("/preferences/ordered", raw)).await;
        let response = send(&app, get("/preferences/ordered")).await;
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        assert_eq!(std::str::from_utf8(&body).unwrap(), raw);
    }

    #[tokio::test]
    async fn test_get_store_failure_is_server_error() {
        let app = failing_app();

        let response = send(&app, get("/preferences/u1")).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = read_json(response).await;
        assert_eq!(body, json!({"error": "Internal server error"}));
    }

    #[tokio::test]
    async fn test_get_store_timeout() {
        let app = stalled_app();

        let response = send(&app, get("/preferences/u1")).await;

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
