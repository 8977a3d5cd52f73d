use crate::error::{ApiError, ErrorResponse};
use crate::models::{MessageResponse, PREFERENCES_UPDATED};
use crate::routes;
use crate::state::AppState;
use crate::store::{Document, USER_PREFERENCE};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};

/// POST /preferences/:user_id handler - Replace a user's preference document
///
/// The body is stored verbatim. Fields from an earlier document that are
/// absent from the new body are gone afterwards.
#[utoipa::path(
    post,
    path = routes::PREFERENCES,
    params(
        ("user_id" = String, Path, description = "Opaque user identifier")
    ),
    request_body = serde_json::Value,
    responses(
        (status = 200, description = "Preferences stored", body = MessageResponse),
        (status = 400, description = "Body is not a JSON object", body = ErrorResponse),
        (status = 500, description = "Document store error", body = ErrorResponse),
        (status = 503, description = "Document store timed out", body = ErrorResponse)
    ),
    tag = "preferences"
)]
pub async fn update_preferences_handler(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    payload: Result<Json<Document>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let Json(data) = payload?;

    state
        .store_call("update preferences", state.store.set(USER_PREFERENCE, &user_id, data))
        .await?;

    tracing::info!("Successfully stored preferences for user: {}", user_id);
    Ok((StatusCode::OK, Json(MessageResponse::new(PREFERENCES_UPDATED))))
}
