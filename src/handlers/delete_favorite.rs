use crate::error::{ApiError, ErrorResponse};
use crate::models::{MessageResponse, FAVORITE_DELETED};
use crate::routes;
use crate::state::AppState;
use crate::store::{FAVORITES_RECIPE, USER_PREFERENCE};
use axum::{extract::Path, extract::State, http::StatusCode, Json};

/// DELETE /preferences/:user_id/favorites/:recipe_id handler - Remove a favorite
///
/// Succeeds whether or not the favorite existed.
#[utoipa::path(
    delete,
    path = routes::FAVORITE_ITEM,
    params(
        ("user_id" = String, Path, description = "Opaque user identifier"),
        ("recipe_id" = String, Path, description = "Identifier returned when the favorite was added")
    ),
    responses(
        (status = 200, description = "Favorite removed (or was already absent)", body = MessageResponse),
        (status = 500, description = "Document store error", body = ErrorResponse),
        (status = 503, description = "Document store timed out", body = ErrorResponse)
    ),
    tag = "favorites"
)]
pub async fn delete_favorite_handler(
    State(state): State<AppState>,
    Path((user_id, recipe_id)): Path<(String, String)>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    state
        .store_call(
            "delete favorite",
            state
                .store
                .delete_child(USER_PREFERENCE, &user_id, FAVORITES_RECIPE, &recipe_id),
        )
        .await?;

    tracing::info!("Deleted favorite {} for user: {}", recipe_id, user_id);
    Ok((StatusCode::OK, Json(MessageResponse::new(FAVORITE_DELETED))))
}
