use crate::error::{ApiError, ErrorResponse};
use crate::models::FavoritesResponse;
use crate::routes;
use crate::state::AppState;
use crate::store::{FAVORITES_RECIPE, USER_PREFERENCE};
use axum::{extract::Path, extract::State, http::StatusCode, Json};

/// GET /preferences/:user_id/favorites handler - List a user's favorites
///
/// Order is whatever the store yields. A user with no favorites, or no
/// preference document at all, gets an empty list.
#[utoipa::path(
    get,
    path = routes::FAVORITES,
    params(
        ("user_id" = String, Path, description = "Opaque user identifier")
    ),
    responses(
        (status = 200, description = "Favorite documents", body = FavoritesResponse),
        (status = 500, description = "Document store error", body = ErrorResponse),
        (status = 503, description = "Document store timed out", body = ErrorResponse)
    ),
    tag = "favorites"
)]
pub async fn list_favorites_handler(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<(StatusCode, Json<FavoritesResponse>), ApiError> {
    let favorites = state
        .store_call(
            "list favorites",
            state
                .store
                .list_children(USER_PREFERENCE, &user_id, FAVORITES_RECIPE),
        )
        .await?;

    tracing::info!("Listed {} favorites for user: {}", favorites.len(), user_id);
    Ok((StatusCode::OK, Json(FavoritesResponse { favorites })))
}
