use utoipa::OpenApi;

use crate::error::{ErrorResponse, HealthResponse, UnhealthyResponse};
use crate::handlers;
use crate::models::{AddFavoriteResponse, FavoritesResponse, MessageResponse};

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "preference-service API",
        version = "1.0.0",
        description = "User preferences and favorite recipes over a hierarchical document store"
    ),
    paths(
        handlers::health::health_handler,
        handlers::get_preferences::get_preferences_handler,
        handlers::update_preferences::update_preferences_handler,
        handlers::list_favorites::list_favorites_handler,
        handlers::add_favorite::add_favorite_handler,
        handlers::delete_favorite::delete_favorite_handler
    ),
    components(
        schemas(
            MessageResponse,
            FavoritesResponse,
            AddFavoriteResponse,
            ErrorResponse,
            HealthResponse,
            UnhealthyResponse
        )
    ),
    tags(
        (name = "health", description = "Health check operations"),
        (name = "preferences", description = "Per-user preference documents"),
        (name = "favorites", description = "Favorite recipes nested under a user")
    )
)]
pub struct ApiDoc;
