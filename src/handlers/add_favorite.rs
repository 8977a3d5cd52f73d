use crate::error::{ApiError, ErrorResponse};
use crate::models::{AddFavoriteResponse, FAVORITE_ADDED};
use crate::routes;
use crate::state::AppState;
use crate::store::{Document, FAVORITES_RECIPE, USER_PREFERENCE};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};

/// POST /preferences/:user_id/favorites handler - Add a favorite
///
/// The store generates the favorite's identifier. The parent preference
/// document does not need to exist.
#[utoipa::path(
    post,
    path = routes::FAVORITES,
    params(
        ("user_id" = String, Path, description = "Opaque user identifier")
    ),
    request_body = serde_json::Value,
    responses(
        (status = 200, description = "Favorite stored", body = AddFavoriteResponse),
        (status = 400, description = "Body is not a JSON object", body = ErrorResponse),
        (status = 500, description = "Document store error", body = ErrorResponse),
        (status = 503, description = "Document store timed out", body = ErrorResponse)
    ),
    tag = "favorites"
)]
pub async fn add_favorite_handler(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    payload: Result<Json<Document>, JsonRejection>,
) -> Result<(StatusCode, Json<AddFavoriteResponse>), ApiError> {
    let Json(data) = payload?;

    let favorite_id = state
        .store_call(
            "add favorite",
            state
                .store
                .create_child(USER_PREFERENCE, &user_id, FAVORITES_RECIPE, data),
        )
        .await?;

    tracing::info!("Added favorite {} for user: {}", favorite_id, user_id);
    Ok((
        StatusCode::OK,
        Json(AddFavoriteResponse {
            message: FAVORITE_ADDED.to_string(),
            favorite_id,
        }),
    ))
}
